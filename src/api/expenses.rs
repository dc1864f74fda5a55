//! Expense endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

use super::AppState;
use crate::{
    core::{balance, expense},
    errors::Result,
};

/// Query parameters shared by the expense list and stats endpoints
#[derive(Debug, Deserialize)]
pub struct ExpenseQuery {
    /// Settlement month filter ("YYYY-MM"); defaults to the current month
    /// for stats and to no filter for lists
    pub month: Option<String>,
    /// Member whose personal figures the stats should report
    pub member: Option<String>,
}

pub async fn list_expenses(
    State(state): State<AppState>,
    Path(colocation_id): Path<i64>,
    Query(query): Query<ExpenseQuery>,
) -> Result<impl IntoResponse> {
    info!("GET /api/colocations/{colocation_id}/expenses - month: {:?}", query.month);
    let expenses = match query.month {
        Some(month) => expense::list_expenses_for_month(&state.db, colocation_id, &month).await?,
        None => expense::list_expenses(&state.db, colocation_id).await?,
    };
    Ok(Json(expenses))
}

/// Body of `POST /api/colocations/:id/expenses`
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// What the money was spent on
    pub title: String,
    /// Amount in euros, must be positive
    pub amount: f64,
    /// Category label
    pub category: String,
    /// Day the expense was made
    pub date: NaiveDate,
    /// Email of the paying member
    pub paid_by: String,
    /// Link to a receipt picture
    pub receipt_url: Option<String>,
}

pub async fn create_expense(
    State(state): State<AppState>,
    Path(colocation_id): Path<i64>,
    Json(req): Json<CreateExpenseRequest>,
) -> Result<impl IntoResponse> {
    info!(
        "POST /api/colocations/{colocation_id}/expenses - title: {}, amount: {}",
        req.title, req.amount
    );
    let created = expense::create_expense(
        &state.db,
        colocation_id,
        &req.title,
        req.amount,
        &req.category,
        req.date,
        &req.paid_by,
        req.receipt_url,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<i64>,
) -> Result<impl IntoResponse> {
    info!("DELETE /api/expenses/{expense_id}");
    expense::delete_expense(&state.db, expense_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Response of `GET /api/colocations/:id/expenses/stats`
#[derive(Debug, Serialize)]
pub struct ExpenseStatsResponse {
    /// Month the figures cover
    pub month: String,
    /// Sum of all expense amounts
    pub total: f64,
    /// Number of expenses
    pub count: usize,
    /// Sum of the amounts the requesting member paid
    pub my_total: f64,
    /// Totals per category label
    pub by_category: HashMap<String, f64>,
}

pub async fn expense_stats(
    State(state): State<AppState>,
    Path(colocation_id): Path<i64>,
    Query(query): Query<ExpenseQuery>,
) -> Result<impl IntoResponse> {
    let month = query.month.unwrap_or_else(balance::current_month);
    let member = query.member.unwrap_or_default();
    info!("GET /api/colocations/{colocation_id}/expenses/stats - month: {month}");

    let expenses = expense::list_expenses_for_month(&state.db, colocation_id, &month).await?;
    let stats = expense::month_stats(&expenses, &member);
    Ok(Json(ExpenseStatsResponse {
        month,
        total: stats.total,
        count: stats.count,
        my_total: stats.my_total,
        by_category: balance::category_totals(&expenses),
    }))
}
