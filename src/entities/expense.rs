//! Expense entity - Represents a shared household expense.
//!
//! Each expense is paid in full by one member and split equally across all
//! members of the colocation at creation time. The `month_year` key buckets
//! expenses into monthly settlement periods. Expenses are created once and
//! never structurally edited afterwards.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Colocation this expense belongs to
    pub colocation_id: i64,
    /// Human-readable title (e.g., "Courses Carrefour")
    pub title: String,
    /// Full amount paid, in euros; always positive
    pub amount: f64,
    /// Category label: `"courses"`, `"factures"`, `"loisirs"`, `"transport"`,
    /// `"menage"`, or `"autre"`
    pub category: String,
    /// Day the expense was made
    pub date: Date,
    /// Monthly settlement bucket, formatted "YYYY-MM" (derived from `date`)
    pub month_year: String,
    /// Email of the member who paid
    pub paid_by: String,
    /// Optional URL of an uploaded receipt (opaque string, storage is external)
    pub receipt_url: Option<String>,
    /// Whether the expense is split equally (always true today)
    pub split_equally: bool,
    /// When the expense was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense belongs to one colocation
    #[sea_orm(
        belongs_to = "super::colocation::Entity",
        from = "Column::ColocationId",
        to = "super::colocation::Column::Id"
    )]
    Colocation,
    /// One expense has many participant shares
    #[sea_orm(has_many = "super::expense_share::Entity")]
    Shares,
}

impl Related<super::colocation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Colocation.def()
    }
}

impl Related<super::expense_share::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shares.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
