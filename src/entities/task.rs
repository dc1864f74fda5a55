//! Task entity - Represents a household chore.
//!
//! Tasks are assigned to a member by email, optionally bucketed into a week
//! ("YYYY-Www"), and move through `"todo"`, `"in_progress"`, `"completed"`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Task database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    /// Unique identifier for the task
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Colocation this task belongs to
    pub colocation_id: i64,
    /// Short description of the chore (e.g., "Sortir les poubelles")
    pub title: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Email of the member responsible for the task
    pub assigned_to: String,
    /// Day the task is due (defaults to tomorrow when not provided)
    pub due_date: Option<Date>,
    /// Weekly bucket the task belongs to, when scheduled by week
    pub week_year: Option<String>,
    /// Lifecycle status: `"todo"`, `"in_progress"`, or `"completed"`
    pub status: String,
    /// When the task was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Task and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each task belongs to one colocation
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
