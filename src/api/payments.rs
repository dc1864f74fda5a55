//! Settlement payment endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::info;

use super::AppState;
use crate::{
    core::{balance, payment},
    errors::Result,
};

/// Query parameters for the payment list endpoint
#[derive(Debug, Deserialize)]
pub struct PaymentQuery {
    /// Settlement month filter ("YYYY-MM")
    pub month: Option<String>,
    /// When given, list only pending payments awaiting this recipient
    pub pending_for: Option<String>,
}

pub async fn list_payments(
    State(state): State<AppState>,
    Path(colocation_id): Path<i64>,
    Query(query): Query<PaymentQuery>,
) -> Result<impl IntoResponse> {
    info!("GET /api/colocations/{colocation_id}/payments - query: {query:?}");
    let payments = if let Some(recipient) = query.pending_for {
        payment::pending_payments_for(&state.db, colocation_id, &recipient).await?
    } else if let Some(month) = query.month {
        payment::list_payments_for_month(&state.db, colocation_id, &month).await?
    } else {
        payment::list_payments(&state.db, colocation_id).await?
    };
    Ok(Json(payments))
}

/// Body of `POST /api/colocations/:id/payments`
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// Email of the paying member
    pub from_user: String,
    /// Email of the member being reimbursed
    pub to_user: String,
    /// Amount in euros, must be positive
    pub amount: f64,
    /// Settlement month the payment applies to; defaults to the current month
    pub month_year: Option<String>,
}

pub async fn create_payment(
    State(state): State<AppState>,
    Path(colocation_id): Path<i64>,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse> {
    info!(
        "POST /api/colocations/{colocation_id}/payments - {} -> {}: {}",
        req.from_user, req.to_user, req.amount
    );
    let month = req.month_year.unwrap_or_else(balance::current_month);
    let created = payment::create_payment(
        &state.db,
        colocation_id,
        &req.from_user,
        &req.to_user,
        req.amount,
        &month,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn confirm_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<i64>,
) -> Result<impl IntoResponse> {
    info!("POST /api/payments/{payment_id}/confirm");
    let confirmed = payment::confirm_payment(&state.db, payment_id).await?;
    Ok(Json(confirmed))
}

pub async fn reject_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<i64>,
) -> Result<impl IntoResponse> {
    info!("POST /api/payments/{payment_id}/reject");
    let rejected = payment::reject_payment(&state.db, payment_id).await?;
    Ok(Json(rejected))
}
