//! Colocation entity - Represents a shared household.
//!
//! A colocation groups members and scopes every other record in the system
//! (expenses, payments, tasks, shopping items, events, conversations).
//! New members join by presenting the colocation's invite code.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Colocation database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "colocations")]
pub struct Model {
    /// Unique identifier for the colocation
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name of the household (e.g., "Coloc Rue Oberkampf")
    pub name: String,
    /// Optional postal address
    pub address: Option<String>,
    /// Six-character uppercase join token shared with new roommates
    pub invite_code: String,
    /// Email of the member who created the colocation
    pub created_by: String,
}

/// Defines relationships between Colocation and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One colocation has many members
    #[sea_orm(has_many = "super::member::Entity")]
    Members,
    /// One colocation has many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
    /// One colocation has many payments
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
    /// One colocation has many tasks
    #[sea_orm(has_many = "super::task::Entity")]
    Tasks,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
