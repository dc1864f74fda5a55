//! Balance endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AppState;
use crate::{
    core::{balance, colocation, expense, payment},
    errors::Result,
};

/// Query parameters for `GET /api/colocations/:id/balances`
#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    /// Settlement month ("YYYY-MM"); defaults to the current month
    pub month: Option<String>,
}

pub async fn month_balances(
    State(state): State<AppState>,
    Path(colocation_id): Path<i64>,
    Query(query): Query<BalanceQuery>,
) -> Result<impl IntoResponse> {
    let month = query.month.unwrap_or_else(balance::current_month);
    info!("GET /api/colocations/{colocation_id}/balances - month: {month}");

    let members = colocation::list_members(&state.db, colocation_id).await?;
    let expenses = expense::list_expenses_for_month(&state.db, colocation_id, &month).await?;
    let payments = payment::list_payments_for_month(&state.db, colocation_id, &month).await?;

    Ok(Json(balance::compute_month_balances(
        &expenses, &payments, &members,
    )))
}

/// Query parameters for `GET /api/colocations/:id/balances/overview`
#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    /// Email of the member the dashboard belongs to
    pub member: String,
    /// Anchor month ("YYYY-MM"); defaults to the current month
    pub month: Option<String>,
}

/// Response of the overview endpoint: dashboard figures plus the member's
/// outstanding debts with the pending-payment overlay applied.
#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    /// Current and carry-over figures
    #[serde(flatten)]
    pub overview: balance::MemberOverview,
    /// Per-counterparty debts with pending amounts and what remains to pay
    pub outstanding: Vec<balance::OutstandingDebt>,
}

pub async fn member_overview(
    State(state): State<AppState>,
    Path(colocation_id): Path<i64>,
    Query(query): Query<OverviewQuery>,
) -> Result<impl IntoResponse> {
    let month = query.month.unwrap_or_else(balance::current_month);
    info!(
        "GET /api/colocations/{colocation_id}/balances/overview - member: {}, month: {month}",
        query.member
    );

    let members = colocation::list_members(&state.db, colocation_id).await?;
    let expenses = expense::list_expenses(&state.db, colocation_id).await?;
    let payments = payment::list_payments(&state.db, colocation_id).await?;

    let overview = balance::member_overview(&expenses, &payments, &members, &query.member, &month);

    let monthly = balance::compute_monthly_balances(&expenses, &payments, &members);
    let outstanding = monthly
        .get(&month)
        .and_then(|m| m.balances.get(&query.member))
        .map(|b| balance::outstanding_debts(b, &payments, &query.member, &month))
        .unwrap_or_default();

    Ok(Json(OverviewResponse { overview, outstanding }))
}
