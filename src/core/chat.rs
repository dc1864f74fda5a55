//! Conversations, messages, and polls.
//!
//! Each colocation has one or more conversations. Every post denormalizes a
//! `last_message_*` summary onto its conversation inside the same
//! transaction, so conversation lists render without touching the messages
//! table. Clients refresh by asking for messages after the newest timestamp
//! they have seen.

use crate::{
    core::colocation::get_colocation_member,
    entities::{Conversation, Message, conversation, message},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::BTreeMap;

/// Plain text message
pub const TYPE_MESSAGE: &str = "message";
/// Image attachment, URL carried in `file_url`
pub const TYPE_IMAGE: &str = "image";
/// Arbitrary file attachment
pub const TYPE_FILE: &str = "file";
/// Poll with options and one vote per member
pub const TYPE_POLL: &str = "poll";

/// Creates a conversation for a colocation.
pub async fn create_conversation(
    db: &DatabaseConnection,
    colocation_id: i64,
    title: Option<String>,
) -> Result<conversation::Model> {
    let conv = conversation::ActiveModel {
        colocation_id: Set(colocation_id),
        title: Set(title),
        last_message_content: Set(None),
        last_message_date: Set(None),
        last_message_sender: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    conv.insert(db).await.map_err(Into::into)
}

/// Returns the colocation's first conversation, creating one when none
/// exists yet.
pub async fn ensure_conversation(
    db: &DatabaseConnection,
    colocation_id: i64,
) -> Result<conversation::Model> {
    let existing = Conversation::find()
        .filter(conversation::Column::ColocationId.eq(colocation_id))
        .order_by_asc(conversation::Column::Id)
        .one(db)
        .await?;
    match existing {
        Some(conv) => Ok(conv),
        None => create_conversation(db, colocation_id, None).await,
    }
}

/// Retrieves a conversation by ID.
pub async fn get_conversation_by_id(
    db: &DatabaseConnection,
    conversation_id: i64,
) -> Result<Option<conversation::Model>> {
    Conversation::find_by_id(conversation_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists a colocation's conversations, most recently active first.
pub async fn list_conversations(
    db: &DatabaseConnection,
    colocation_id: i64,
) -> Result<Vec<conversation::Model>> {
    Conversation::find()
        .filter(conversation::Column::ColocationId.eq(colocation_id))
        .order_by_desc(conversation::Column::LastMessageDate)
        .order_by_desc(conversation::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Posts a plain text message.
pub async fn post_message(
    db: &DatabaseConnection,
    conversation_id: i64,
    sender: &str,
    content: &str,
) -> Result<message::Model> {
    if content.trim().is_empty() {
        return Err(Error::Validation {
            message: "Message content cannot be empty".to_string(),
        });
    }
    insert_message(db, conversation_id, sender, content, TYPE_MESSAGE, None, None, None).await
}

/// Posts an image or file attachment. The content doubles as caption and
/// conversation preview.
pub async fn post_attachment(
    db: &DatabaseConnection,
    conversation_id: i64,
    sender: &str,
    message_type: &str,
    file_url: &str,
    file_name: Option<String>,
    content: &str,
) -> Result<message::Model> {
    if message_type != TYPE_IMAGE && message_type != TYPE_FILE {
        return Err(Error::Validation {
            message: format!("Unknown attachment type: {message_type}"),
        });
    }
    if file_url.trim().is_empty() {
        return Err(Error::Validation {
            message: "Attachment URL cannot be empty".to_string(),
        });
    }
    insert_message(
        db,
        conversation_id,
        sender,
        content,
        message_type,
        Some(file_url.to_string()),
        file_name,
        None,
    )
    .await
}

/// Posts a poll. The content is the question; at least two non-empty options
/// are required. Votes start empty.
pub async fn post_poll(
    db: &DatabaseConnection,
    conversation_id: i64,
    sender: &str,
    question: &str,
    options: &[String],
) -> Result<message::Model> {
    if question.trim().is_empty() {
        return Err(Error::Validation {
            message: "Poll question cannot be empty".to_string(),
        });
    }
    let options: Vec<String> = options
        .iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();
    if options.len() < 2 {
        return Err(Error::Validation {
            message: "A poll needs at least two options".to_string(),
        });
    }
    insert_message(
        db,
        conversation_id,
        sender,
        question,
        TYPE_POLL,
        None,
        None,
        Some(options),
    )
    .await
}

#[allow(clippy::too_many_arguments)]
async fn insert_message(
    db: &DatabaseConnection,
    conversation_id: i64,
    sender: &str,
    content: &str,
    message_type: &str,
    file_url: Option<String>,
    file_name: Option<String>,
    poll_options: Option<Vec<String>>,
) -> Result<message::Model> {
    let conv = get_conversation_by_id(db, conversation_id)
        .await?
        .ok_or(Error::ConversationNotFound { id: conversation_id })?;

    get_colocation_member(db, conv.colocation_id, sender)
        .await?
        .ok_or_else(|| Error::MemberNotFound {
            email: sender.to_string(),
        })?;

    let now = Utc::now();
    let poll_options_json = match poll_options {
        Some(opts) => Some(serde_json::to_string(&opts)?),
        None => None,
    };
    let poll_votes_json = if message_type == TYPE_POLL {
        Some("{}".to_string())
    } else {
        None
    };

    let txn = db.begin().await?;

    let msg = message::ActiveModel {
        colocation_id: Set(conv.colocation_id),
        conversation_id: Set(conversation_id),
        sender: Set(sender.to_string()),
        content: Set(content.trim().to_string()),
        message_type: Set(message_type.to_string()),
        file_url: Set(file_url),
        file_name: Set(file_name),
        poll_options: Set(poll_options_json),
        poll_votes: Set(poll_votes_json),
        created_at: Set(now),
        ..Default::default()
    };
    let msg = msg.insert(&txn).await?;

    let mut conv_active: conversation::ActiveModel = conv.into();
    conv_active.last_message_content = Set(Some(msg.content.clone()));
    conv_active.last_message_date = Set(Some(now));
    conv_active.last_message_sender = Set(Some(sender.to_string()));
    conv_active.update(&txn).await?;

    txn.commit().await?;
    Ok(msg)
}

/// Retrieves a message by ID.
pub async fn get_message_by_id(
    db: &DatabaseConnection,
    message_id: i64,
) -> Result<Option<message::Model>> {
    Message::find_by_id(message_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists a conversation's messages in posting order.
pub async fn list_messages(
    db: &DatabaseConnection,
    conversation_id: i64,
) -> Result<Vec<message::Model>> {
    Message::find()
        .filter(message::Column::ConversationId.eq(conversation_id))
        .order_by_asc(message::Column::CreatedAt)
        .order_by_asc(message::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists messages posted strictly after a timestamp, in posting order.
/// Serves the client's fixed-interval refresh.
pub async fn messages_after(
    db: &DatabaseConnection,
    conversation_id: i64,
    after: DateTime<Utc>,
) -> Result<Vec<message::Model>> {
    Message::find()
        .filter(message::Column::ConversationId.eq(conversation_id))
        .filter(message::Column::CreatedAt.gt(after))
        .order_by_asc(message::Column::CreatedAt)
        .order_by_asc(message::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Decoded poll state of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    /// The options voters choose between
    pub options: Vec<String>,
    /// One vote per member email, holding the chosen option index
    pub votes: BTreeMap<String, usize>,
}

/// Decodes the poll columns of a message. Fails on non-poll messages.
pub fn poll_state(msg: &message::Model) -> Result<PollState> {
    let options = msg
        .poll_options
        .as_deref()
        .ok_or_else(|| Error::Validation {
            message: format!("Message {} is not a poll", msg.id),
        })?;
    let votes = msg.poll_votes.as_deref().unwrap_or("{}");
    Ok(PollState {
        options: serde_json::from_str(options)?,
        votes: serde_json::from_str(votes)?,
    })
}

/// Records a member's vote on a poll. A member votes at most once; voting
/// again replaces the earlier choice.
pub async fn vote_poll(
    db: &DatabaseConnection,
    message_id: i64,
    voter: &str,
    option_index: usize,
) -> Result<message::Model> {
    let msg = get_message_by_id(db, message_id)
        .await?
        .ok_or(Error::MessageNotFound { id: message_id })?;

    if msg.message_type != TYPE_POLL {
        return Err(Error::Validation {
            message: format!("Message {message_id} is not a poll"),
        });
    }
    get_colocation_member(db, msg.colocation_id, voter)
        .await?
        .ok_or_else(|| Error::MemberNotFound {
            email: voter.to_string(),
        })?;

    let mut state = poll_state(&msg)?;
    if option_index >= state.options.len() {
        return Err(Error::Validation {
            message: format!(
                "Poll option {option_index} is out of range (the poll has {} options)",
                state.options.len()
            ),
        });
    }
    state.votes.insert(voter.to_string(), option_index);

    let encoded = serde_json::to_string(&state.votes)?;
    let mut active: message::ActiveModel = msg.into();
    active.poll_votes = Set(Some(encoded));
    active.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    async fn household_with_conversation()
    -> Result<(sea_orm::DatabaseConnection, i64, conversation::Model)> {
        let (db, coloc) = setup_household().await?;
        let conv = ensure_conversation(&db, coloc.id).await?;
        Ok((db, coloc.id, conv))
    }

    #[tokio::test]
    async fn test_ensure_conversation_is_idempotent() -> Result<()> {
        let (db, coloc) = setup_household().await?;

        let first = ensure_conversation(&db, coloc.id).await?;
        let second = ensure_conversation(&db, coloc.id).await?;
        assert_eq!(first.id, second.id);
        assert_eq!(list_conversations(&db, coloc.id).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_post_message_denormalizes_summary() -> Result<()> {
        let (db, _coloc_id, conv) = household_with_conversation().await?;

        post_message(&db, conv.id, "u1@coloc.fr", "Salut !").await?;
        let msg = post_message(&db, conv.id, "u2@coloc.fr", "Hello").await?;
        assert_eq!(msg.message_type, TYPE_MESSAGE);

        let refreshed = get_conversation_by_id(&db, conv.id).await?.unwrap();
        assert_eq!(refreshed.last_message_content.as_deref(), Some("Hello"));
        assert_eq!(refreshed.last_message_sender.as_deref(), Some("u2@coloc.fr"));
        assert!(refreshed.last_message_date.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_post_message_validation() -> Result<()> {
        let (db, _coloc_id, conv) = household_with_conversation().await?;

        let empty = post_message(&db, conv.id, "u1@coloc.fr", "  ").await;
        assert!(matches!(empty, Err(Error::Validation { .. })));

        let stranger = post_message(&db, conv.id, "ghost@elsewhere.fr", "Hi").await;
        assert!(matches!(stranger, Err(Error::MemberNotFound { .. })));

        let missing = post_message(&db, 999, "u1@coloc.fr", "Hi").await;
        assert!(matches!(missing, Err(Error::ConversationNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_post_attachment() -> Result<()> {
        let (db, _coloc_id, conv) = household_with_conversation().await?;

        let img = post_attachment(
            &db,
            conv.id,
            "u1@coloc.fr",
            TYPE_IMAGE,
            "https://files.example/photo.jpg",
            Some("photo.jpg".to_string()),
            "Regardez !",
        )
        .await?;
        assert_eq!(img.message_type, TYPE_IMAGE);
        assert_eq!(img.file_url.as_deref(), Some("https://files.example/photo.jpg"));

        let bad_type = post_attachment(
            &db, conv.id, "u1@coloc.fr", "video", "https://x", None, "",
        )
        .await;
        assert!(matches!(bad_type, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_poll_lifecycle() -> Result<()> {
        let (db, _coloc_id, conv) = household_with_conversation().await?;

        let options = vec!["Pizza".to_string(), "Sushi".to_string(), " ".to_string()];
        let poll = post_poll(&db, conv.id, "u1@coloc.fr", "On mange quoi ?", &options).await?;
        assert_eq!(poll.message_type, TYPE_POLL);

        let state = poll_state(&poll)?;
        // Blank options are dropped
        assert_eq!(state.options, vec!["Pizza".to_string(), "Sushi".to_string()]);
        assert!(state.votes.is_empty());

        vote_poll(&db, poll.id, "u2@coloc.fr", 0).await?;
        let revoted = vote_poll(&db, poll.id, "u2@coloc.fr", 1).await?;
        let state = poll_state(&revoted)?;
        assert_eq!(state.votes.len(), 1);
        assert_eq!(state.votes["u2@coloc.fr"], 1);

        let out_of_range = vote_poll(&db, poll.id, "u3@coloc.fr", 5).await;
        assert!(matches!(out_of_range, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_post_poll_needs_two_options() -> Result<()> {
        let (db, _coloc_id, conv) = household_with_conversation().await?;

        let one = post_poll(
            &db,
            conv.id,
            "u1@coloc.fr",
            "On mange quoi ?",
            &["Pizza".to_string(), "  ".to_string()],
        )
        .await;
        assert!(matches!(one, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_vote_on_non_poll_fails() -> Result<()> {
        let (db, _coloc_id, conv) = household_with_conversation().await?;
        let msg = post_message(&db, conv.id, "u1@coloc.fr", "Salut").await?;

        let result = vote_poll(&db, msg.id, "u2@coloc.fr", 0).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_messages_after_timestamp() -> Result<()> {
        let (db, _coloc_id, conv) = household_with_conversation().await?;

        let first = post_message(&db, conv.id, "u1@coloc.fr", "Premier").await?;
        post_message(&db, conv.id, "u2@coloc.fr", "Deuxieme").await?;

        let newer = messages_after(&db, conv.id, first.created_at).await?;
        assert_eq!(newer.len(), 1);
        assert_eq!(newer[0].content, "Deuxieme");

        let all = list_messages(&db, conv.id).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].content, "Premier");
        Ok(())
    }

    #[tokio::test]
    async fn test_conversations_ordered_by_activity() -> Result<()> {
        let (db, coloc) = setup_household().await?;
        let quiet = create_conversation(&db, coloc.id, Some("Quiet".to_string())).await?;
        let busy = create_conversation(&db, coloc.id, Some("Busy".to_string())).await?;

        post_message(&db, busy.id, "u1@coloc.fr", "Du monde ici").await?;

        let list = list_conversations(&db, coloc.id).await?;
        assert_eq!(list[0].id, busy.id);
        assert_eq!(list[1].id, quiet.id);
        Ok(())
    }
}
