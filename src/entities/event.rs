//! Event entity - Represents a household calendar entry.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    /// Unique identifier for the event
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Colocation this event belongs to
    pub colocation_id: i64,
    /// Event title (e.g., "Soirée jeux")
    pub title: String,
    /// Optional longer description
    pub description: Option<String>,
    /// When the event starts
    pub date: DateTimeUtc,
    /// When the event ends, for multi-hour or multi-day events
    pub end_date: Option<DateTimeUtc>,
    /// Where the event takes place
    pub location: Option<String>,
    /// Event type label: `"soiree"`, `"repas"`, `"reunion"`, or `"autre"`
    pub event_type: String,
    /// Email of the member who created the event
    pub created_by: String,
    /// JSON-encoded array of participant emails; starts as `[created_by]`
    pub participants: String,
}

/// Defines relationships between Event and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each event belongs to one colocation
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
