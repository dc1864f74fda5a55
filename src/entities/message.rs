//! Message entity - Represents a single chat message.
//!
//! `message_type` distinguishes plain text, file/image attachments (URL
//! only), and polls. Poll options and votes are JSON-encoded columns managed
//! by the chat service.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Message database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    /// Unique identifier for the message
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Colocation this message belongs to
    pub colocation_id: i64,
    /// Conversation this message belongs to
    pub conversation_id: i64,
    /// Email of the sender
    pub sender: String,
    /// Message text, or a placeholder label for attachments and polls
    pub content: String,
    /// Kind of message: `"message"`, `"image"`, `"file"`, or `"poll"`
    pub message_type: String,
    /// Attachment URL for image/file messages (opaque string)
    pub file_url: Option<String>,
    /// Original attachment file name
    pub file_name: Option<String>,
    /// JSON-encoded array of poll option labels, for poll messages
    pub poll_options: Option<String>,
    /// JSON-encoded map of voter email to chosen option index, for poll messages
    pub poll_votes: Option<String>,
    /// When the message was posted
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Message and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each message belongs to one conversation
    #[sea_orm(
        belongs_to = "super::conversation::Entity",
        from = "Column::ConversationId",
        to = "super::conversation::Column::Id"
    )]
    Conversation,
}

impl Related<super::conversation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Conversation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
