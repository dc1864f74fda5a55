//! Colocation lifecycle endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::info;

use super::AppState;
use crate::{
    core::colocation,
    errors::{Error, Result},
};

/// Body of `POST /api/colocations`
#[derive(Debug, Deserialize)]
pub struct CreateColocationRequest {
    /// Household name
    pub name: String,
    /// Street address, free text
    pub address: Option<String>,
    /// Email of the creating member
    pub created_by: String,
}

pub async fn create_colocation(
    State(state): State<AppState>,
    Json(req): Json<CreateColocationRequest>,
) -> Result<impl IntoResponse> {
    info!("POST /api/colocations - name: {}", req.name);
    let coloc =
        colocation::create_colocation(&state.db, &req.name, req.address, &req.created_by).await?;
    Ok((StatusCode::CREATED, Json(coloc)))
}

/// Body of `POST /api/colocations/join`
#[derive(Debug, Deserialize)]
pub struct JoinColocationRequest {
    /// Invite code, case-insensitive
    pub invite_code: String,
    /// Email of the joining member
    pub email: String,
}

pub async fn join_colocation(
    State(state): State<AppState>,
    Json(req): Json<JoinColocationRequest>,
) -> Result<impl IntoResponse> {
    info!("POST /api/colocations/join - email: {}", req.email);
    let member = colocation::join_colocation(&state.db, &req.invite_code, &req.email).await?;
    Ok(Json(member))
}

pub async fn leave_colocation(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse> {
    info!("POST /api/members/{email}/leave");
    let member = colocation::leave_colocation(&state.db, &email).await?;
    Ok(Json(member))
}

pub async fn list_members(
    State(state): State<AppState>,
    Path(colocation_id): Path<i64>,
) -> Result<impl IntoResponse> {
    info!("GET /api/colocations/{colocation_id}/members");
    colocation::get_colocation_by_id(&state.db, colocation_id)
        .await?
        .ok_or(Error::ColocationNotFound { id: colocation_id })?;
    let members = colocation::list_members(&state.db, colocation_id).await?;
    Ok(Json(members))
}
