//! Unified error type for the crate.
//!
//! Every fallible operation returns [`Result`]. Core services use the typed
//! not-found and validation variants so callers (the HTTP layer in
//! particular) can distinguish caller mistakes from infrastructure failures.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or parsing failed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// A request carried invalid data (empty title, bad status value, ...)
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable description of the problem
        message: String,
    },

    /// An amount was zero, negative, or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// JSON (de)serialization error for encoded columns
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No colocation with this id
    #[error("Colocation not found: {id}")]
    ColocationNotFound {
        /// The colocation id that was looked up
        id: i64,
    },

    /// No colocation carries this invite code
    #[error("Unknown invite code: {code}")]
    InviteCodeNotFound {
        /// The rejected invite code
        code: String,
    },

    /// No member with this email
    #[error("Member not found: {email}")]
    MemberNotFound {
        /// The email that was looked up
        email: String,
    },

    /// No expense with this id
    #[error("Expense not found: {id}")]
    ExpenseNotFound {
        /// The expense id that was looked up
        id: i64,
    },

    /// No payment with this id
    #[error("Payment not found: {id}")]
    PaymentNotFound {
        /// The payment id that was looked up
        id: i64,
    },

    /// The payment has already been confirmed or rejected
    #[error("Payment {id} is '{status}', expected 'pending'")]
    InvalidPaymentStatus {
        /// The payment id
        id: i64,
        /// The status the payment actually has
        status: String,
    },

    /// No task with this id
    #[error("Task not found: {id}")]
    TaskNotFound {
        /// The task id that was looked up
        id: i64,
    },

    /// No shopping item with this id
    #[error("Shopping item not found: {id}")]
    ShoppingItemNotFound {
        /// The item id that was looked up
        id: i64,
    },

    /// No conversation with this id
    #[error("Conversation not found: {id}")]
    ConversationNotFound {
        /// The conversation id that was looked up
        id: i64,
    },

    /// No message with this id
    #[error("Message not found: {id}")]
    MessageNotFound {
        /// The message id that was looked up
        id: i64,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
