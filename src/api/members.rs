//! Member profile endpoints.

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

/// Body of `POST /api/members`
#[derive(Debug, Deserialize)]
pub struct RegisterMemberRequest {
    /// Member email, the identity key
    pub email: String,
    /// Display name; defaults to the email local part
    pub full_name: Option<String>,
}

pub async fn register_member(
    State(state): State<AppState>,
    Json(req): Json<RegisterMemberRequest>,
) -> Result<impl IntoResponse> {
    info!("POST /api/members - email: {}", req.email);
    let member = colocation::register_member(&state.db, &req.email, req.full_name).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn get_member(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse> {
    info!("GET /api/members/{email}");
    let member = colocation::get_member_by_email(&state.db, &email)
        .await?
        .ok_or(Error::MemberNotFound { email })?;
    Ok(Json(member))
}

/// Body of `PATCH /api/members/:email`
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    /// New display name
    pub full_name: Option<String>,
    /// New first name
    pub first_name: Option<String>,
    /// New last name
    pub last_name: Option<String>,
}

pub async fn update_member(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(req): Json<UpdateMemberRequest>,
) -> Result<impl IntoResponse> {
    info!("PATCH /api/members/{email}");
    let member = colocation::update_member_profile(
        &state.db,
        &email,
        req.full_name,
        req.first_name,
        req.last_name,
    )
    .await?;
    Ok(Json(member))
}
