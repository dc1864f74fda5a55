//! Core business logic, independent of the HTTP layer.
//!
//! Each submodule owns one slice of the domain. `balance` is pure
//! computation over already-fetched rows; everything else talks to the
//! database through `SeaORM`.

/// Balance computation for shared expenses - pure, no I/O
pub mod balance;
/// Chat conversations, messages, and polls
pub mod chat;
/// Colocation and member management
pub mod colocation;
/// Calendar events
pub mod event;
/// Shared expense recording
pub mod expense;
/// Settlement payments between members
pub mod payment;
/// Shared shopping list
pub mod shopping;
/// Household chores
pub mod task;
