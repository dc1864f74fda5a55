//! Conversation entity - Represents a chat thread within a colocation.
//!
//! The `last_message_*` columns are denormalized copies of the most recent
//! message, updated on every post so conversation lists can be rendered
//! without a join.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Conversation database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "conversations")]
pub struct Model {
    /// Unique identifier for the conversation
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Colocation this conversation belongs to
    pub colocation_id: i64,
    /// Optional thread title; None for the household's default thread
    pub title: Option<String>,
    /// Content of the most recent message
    pub last_message_content: Option<String>,
    /// Timestamp of the most recent message
    pub last_message_date: Option<DateTimeUtc>,
    /// Sender of the most recent message
    pub last_message_sender: Option<String>,
    /// When the conversation was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Conversation and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One conversation has many messages
    #[sea_orm(has_many = "super::message::Entity")]
    Messages,
}

impl Related<super::message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
