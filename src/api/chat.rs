//! Conversation and message endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use super::AppState;
use crate::{core::chat, errors::Result};

pub async fn list_conversations(
    State(state): State<AppState>,
    Path(colocation_id): Path<i64>,
) -> Result<impl IntoResponse> {
    info!("GET /api/colocations/{colocation_id}/conversations");
    let conversations = chat::list_conversations(&state.db, colocation_id).await?;
    Ok(Json(conversations))
}

/// Body of `POST /api/colocations/:id/conversations`
#[derive(Debug, Default, Deserialize)]
pub struct CreateConversationRequest {
    /// Optional conversation title
    pub title: Option<String>,
}

pub async fn create_conversation(
    State(state): State<AppState>,
    Path(colocation_id): Path<i64>,
    Json(req): Json<CreateConversationRequest>,
) -> Result<impl IntoResponse> {
    info!("POST /api/colocations/{colocation_id}/conversations");
    let conv = chat::create_conversation(&state.db, colocation_id, req.title).await?;
    Ok((StatusCode::CREATED, Json(conv)))
}

/// Query parameters for the message list endpoint
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    /// Only messages posted strictly after this instant; serves the
    /// client's periodic refresh
    pub after: Option<DateTime<Utc>>,
}

pub async fn list_messages(
    State(state): State<AppState>,
    Path(conversation_id): Path<i64>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    info!("GET /api/conversations/{conversation_id}/messages - after: {:?}", query.after);
    let messages = match query.after {
        Some(after) => chat::messages_after(&state.db, conversation_id, after).await?,
        None => chat::list_messages(&state.db, conversation_id).await?,
    };
    Ok(Json(messages))
}

/// Body of `POST /api/conversations/:id/messages`.
///
/// Dispatches on content: `poll_options` makes a poll (content is the
/// question), `file_url` makes an attachment, anything else is a plain text
/// message.
#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    /// Email of the posting member
    pub sender: String,
    /// Message text, poll question, or attachment caption
    #[serde(default)]
    pub content: String,
    /// `"image"` or `"file"` for attachments; defaults to `"file"`
    pub message_type: Option<String>,
    /// Attachment URL
    pub file_url: Option<String>,
    /// Attachment file name
    pub file_name: Option<String>,
    /// Poll options; at least two required
    pub poll_options: Option<Vec<String>>,
}

pub async fn post_message(
    State(state): State<AppState>,
    Path(conversation_id): Path<i64>,
    Json(req): Json<PostMessageRequest>,
) -> Result<impl IntoResponse> {
    info!("POST /api/conversations/{conversation_id}/messages - sender: {}", req.sender);

    let message = if let Some(options) = req.poll_options {
        chat::post_poll(&state.db, conversation_id, &req.sender, &req.content, &options).await?
    } else if let Some(file_url) = req.file_url {
        let message_type = req.message_type.as_deref().unwrap_or(chat::TYPE_FILE);
        chat::post_attachment(
            &state.db,
            conversation_id,
            &req.sender,
            message_type,
            &file_url,
            req.file_name,
            &req.content,
        )
        .await?
    } else {
        chat::post_message(&state.db, conversation_id, &req.sender, &req.content).await?
    };

    Ok((StatusCode::CREATED, Json(message)))
}

/// Body of `POST /api/messages/:id/vote`
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    /// Email of the voting member
    pub voter: String,
    /// Index into the poll's option list
    pub option_index: usize,
}

pub async fn vote_poll(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
    Json(req): Json<VoteRequest>,
) -> Result<impl IntoResponse> {
    info!("POST /api/messages/{message_id}/vote - voter: {}", req.voter);
    let message = chat::vote_poll(&state.db, message_id, &req.voter, req.option_index).await?;
    Ok(Json(message))
}
