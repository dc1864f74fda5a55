//! Expense share entity - Snapshot of the equal split at creation time.
//!
//! One row per household member per expense, recording the share that member
//! owed when the expense was created (zero for the payer). Informational
//! only: balance recomputation always redivides by the current member count
//! and never reads these rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense share database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expense_shares")]
pub struct Model {
    /// Unique identifier for the share row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Expense this share belongs to
    pub expense_id: i64,
    /// Email of the participant
    pub email: String,
    /// Amount this participant owed at creation time (0 for the payer)
    pub amount_owed: f64,
}

/// Defines relationships between `ExpenseShare` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each share belongs to one expense
    #[sea_orm(
        belongs_to = "super::expense::Entity",
        from = "Column::ExpenseId",
        to = "super::expense::Column::Id"
    )]
    Expense,
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expense.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
