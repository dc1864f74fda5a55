//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod colocation;
pub mod conversation;
pub mod event;
pub mod expense;
pub mod expense_share;
pub mod member;
pub mod message;
pub mod payment;
pub mod shopping_item;
pub mod task;

// Re-export specific types to avoid conflicts
pub use colocation::{Column as ColocationColumn, Entity as Colocation, Model as ColocationModel};
pub use conversation::{
    Column as ConversationColumn, Entity as Conversation, Model as ConversationModel,
};
pub use event::{Column as EventColumn, Entity as Event, Model as EventModel};
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use expense_share::{
    Column as ExpenseShareColumn, Entity as ExpenseShare, Model as ExpenseShareModel,
};
pub use member::{Column as MemberColumn, Entity as Member, Model as MemberModel};
pub use message::{Column as MessageColumn, Entity as Message, Model as MessageModel};
pub use payment::{Column as PaymentColumn, Entity as Payment, Model as PaymentModel};
pub use shopping_item::{
    Column as ShoppingItemColumn, Entity as ShoppingItem, Model as ShoppingItemModel,
};
pub use task::{Column as TaskColumn, Entity as Task, Model as TaskModel};
