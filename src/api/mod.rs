//! HTTP API surface.
//!
//! Thin axum handlers over the core services: extract, log, call, serialize.
//! No business logic lives here. CORS is wide open because the browser client
//! is served from a different origin.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::errors::Error;

mod balances;
mod chat;
mod colocations;
mod events;
mod expenses;
mod members;
mod payments;
mod shopping;
mod tasks;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
}

impl AppState {
    /// Creates the application state around a database connection.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl Error {
    /// The HTTP status this error translates to.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ColocationNotFound { .. }
            | Self::InviteCodeNotFound { .. }
            | Self::MemberNotFound { .. }
            | Self::ExpenseNotFound { .. }
            | Self::PaymentNotFound { .. }
            | Self::TaskNotFound { .. }
            | Self::ShoppingItemNotFound { .. }
            | Self::ConversationNotFound { .. }
            | Self::MessageNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation { .. } | Self::InvalidAmount { .. } | Self::Json(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidPaymentStatus { .. } => StatusCode::CONFLICT,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        } else {
            tracing::warn!("request rejected: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/members", post(members::register_member))
        .route(
            "/api/members/:email",
            get(members::get_member).patch(members::update_member),
        )
        .route("/api/colocations", post(colocations::create_colocation))
        .route("/api/colocations/join", post(colocations::join_colocation))
        .route("/api/members/:email/leave", post(colocations::leave_colocation))
        .route("/api/colocations/:id/members", get(colocations::list_members))
        .route(
            "/api/colocations/:id/expenses",
            get(expenses::list_expenses).post(expenses::create_expense),
        )
        .route("/api/colocations/:id/expenses/stats", get(expenses::expense_stats))
        .route("/api/expenses/:id", axum::routing::delete(expenses::delete_expense))
        .route(
            "/api/colocations/:id/payments",
            get(payments::list_payments).post(payments::create_payment),
        )
        .route("/api/payments/:id/confirm", post(payments::confirm_payment))
        .route("/api/payments/:id/reject", post(payments::reject_payment))
        .route("/api/colocations/:id/balances", get(balances::month_balances))
        .route(
            "/api/colocations/:id/balances/overview",
            get(balances::member_overview),
        )
        .route(
            "/api/colocations/:id/tasks",
            get(tasks::list_tasks).post(tasks::create_task),
        )
        .route(
            "/api/tasks/:id",
            patch(tasks::update_task).delete(tasks::delete_task),
        )
        .route(
            "/api/colocations/:id/shopping",
            get(shopping::list_items).post(shopping::add_item),
        )
        .route(
            "/api/shopping/:id",
            patch(shopping::update_item).delete(shopping::delete_item),
        )
        .route(
            "/api/colocations/:id/events",
            get(events::list_events).post(events::create_event),
        )
        .route("/api/events/:id/join", post(events::join_event))
        .route("/api/events/:id", axum::routing::delete(events::delete_event))
        .route(
            "/api/colocations/:id/conversations",
            get(chat::list_conversations).post(chat::create_conversation),
        )
        .route(
            "/api/conversations/:id/messages",
            get(chat::list_messages).post(chat::post_message),
        )
        .route("/api/messages/:id/vote", post(chat::vote_poll))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
