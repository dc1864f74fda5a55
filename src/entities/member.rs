//! Member entity - Represents a person using the app.
//!
//! Identity is the email string throughout the system; expenses, payments,
//! tasks, and messages all reference members by email rather than by numeric
//! foreign key. `colocation_id` is None until the member creates or joins a
//! household.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Member database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    /// Unique identifier for the member row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Email address - the identity key used by every other record
    #[sea_orm(unique)]
    pub email: String,
    /// Full display name
    pub full_name: String,
    /// Optional given name, preferred for display when present
    pub first_name: Option<String>,
    /// Optional family name
    pub last_name: Option<String>,
    /// Household this member belongs to, None while unaffiliated
    pub colocation_id: Option<i64>,
}

/// Defines relationships between Member and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each member belongs to at most one colocation
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
