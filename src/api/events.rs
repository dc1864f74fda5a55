//! Calendar event endpoints.

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
use crate::{core::event, errors::Result};

/// Query parameters for the event list endpoint
#[derive(Debug, Deserialize)]
pub struct EventQuery {
    /// Only events starting now or later
    #[serde(default)]
    pub upcoming: bool,
    /// Only events starting within this calendar month ("YYYY-MM")
    pub month: Option<String>,
}

pub async fn list_events(
    State(state): State<AppState>,
    Path(colocation_id): Path<i64>,
    Query(query): Query<EventQuery>,
) -> Result<impl IntoResponse> {
    info!("GET /api/colocations/{colocation_id}/events - query: {query:?}");
    let events = if let Some(month) = query.month {
        event::list_events_for_month(&state.db, colocation_id, &month).await?
    } else if query.upcoming {
        event::upcoming_events(&state.db, colocation_id).await?
    } else {
        event::list_events(&state.db, colocation_id).await?
    };
    Ok(Json(events))
}

/// Body of `POST /api/colocations/:id/events`
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    /// Event title
    pub title: String,
    /// Longer description
    pub description: Option<String>,
    /// Start of the event
    pub date: DateTime<Utc>,
    /// End of the event, must not precede the start
    pub end_date: Option<DateTime<Utc>>,
    /// Where it happens
    pub location: Option<String>,
    /// Kind of event; defaults to `"autre"`
    pub event_type: Option<String>,
    /// Email of the creating member
    pub created_by: String,
}

pub async fn create_event(
    State(state): State<AppState>,
    Path(colocation_id): Path<i64>,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse> {
    info!("POST /api/colocations/{colocation_id}/events - title: {}", req.title);
    let created = event::create_event(
        &state.db,
        colocation_id,
        &req.title,
        req.description,
        req.date,
        req.end_date,
        req.location,
        req.event_type,
        &req.created_by,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Body of `POST /api/events/:id/join`
#[derive(Debug, Deserialize)]
pub struct JoinEventRequest {
    /// Email of the joining member
    pub email: String,
}

pub async fn join_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<JoinEventRequest>,
) -> Result<impl IntoResponse> {
    info!("POST /api/events/{event_id}/join - email: {}", req.email);
    let joined = event::join_event(&state.db, event_id, &req.email).await?;
    Ok(Json(joined))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse> {
    info!("DELETE /api/events/{event_id}");
    event::delete_event(&state.db, event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
