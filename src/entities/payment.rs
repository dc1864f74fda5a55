//! Payment entity - Represents a settlement attempt between two members.
//!
//! A payment records money handed from `from_user` to `to_user` for a given
//! settlement month. It starts `"pending"` and transitions exactly once to
//! `"confirmed"` or `"rejected"` by recipient action. Only confirmed payments
//! reduce computed debt.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Colocation this payment belongs to
    pub colocation_id: i64,
    /// Email of the member who paid
    pub from_user: String,
    /// Email of the member being reimbursed
    pub to_user: String,
    /// Amount transferred, in euros; always positive
    pub amount: f64,
    /// Monthly settlement bucket this payment applies to ("YYYY-MM")
    pub month_year: String,
    /// Lifecycle status: `"pending"`, `"confirmed"`, or `"rejected"`
    pub status: String,
    /// When the payer declared the payment
    pub created_date: DateTimeUtc,
    /// When the recipient confirmed or rejected it
    pub confirmed_date: Option<DateTimeUtc>,
}

/// Defines relationships between Payment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one colocation
    #[sea_orm(
        belongs_to = "super::colocation::Entity",
        from = "Column::ColocationId",
        to = "super::colocation::Column::Id"
    )]
    Colocation,
}

impl Related<super::colocation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Colocation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
