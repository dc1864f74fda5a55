//! Chore endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use super::AppState;
use crate::{core::task, errors::Result};

/// Query parameters for the task list endpoint
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    /// Include completed tasks; off by default
    #[serde(default)]
    pub include_completed: bool,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Path(colocation_id): Path<i64>,
    Query(query): Query<TaskQuery>,
) -> Result<impl IntoResponse> {
    info!("GET /api/colocations/{colocation_id}/tasks");
    let tasks = task::list_tasks(&state.db, colocation_id, query.include_completed).await?;
    Ok(Json(tasks))
}

/// Body of `POST /api/colocations/:id/tasks`
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// What needs doing
    pub title: String,
    /// Longer description
    pub description: Option<String>,
    /// Email of the member responsible
    pub assigned_to: String,
    /// When it is due; defaults to tomorrow
    pub due_date: Option<NaiveDate>,
}

pub async fn create_task(
    State(state): State<AppState>,
    Path(colocation_id): Path<i64>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse> {
    info!("POST /api/colocations/{colocation_id}/tasks - title: {}", req.title);
    let created = task::create_task(
        &state.db,
        colocation_id,
        &req.title,
        req.description,
        &req.assigned_to,
        req.due_date,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Body of `PATCH /api/tasks/:id`
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    /// New lifecycle status
    pub status: Option<String>,
    /// Email of the member to hand the task to
    pub assigned_to: Option<String>,
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<impl IntoResponse> {
    info!("PATCH /api/tasks/{task_id} - {req:?}");
    let mut updated = None;
    if let Some(status) = req.status {
        updated = Some(task::update_task_status(&state.db, task_id, &status).await?);
    }
    if let Some(assignee) = req.assigned_to {
        updated = Some(task::reassign_task(&state.db, task_id, &assignee).await?);
    }
    match updated {
        Some(t) => Ok(Json(t).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
) -> Result<impl IntoResponse> {
    info!("DELETE /api/tasks/{task_id}");
    task::delete_task(&state.db, task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
