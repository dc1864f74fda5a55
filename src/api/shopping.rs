//! Shopping list endpoints.

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
    core::shopping::{self, NewItem},
    errors::{Error, Result},
};

/// Query parameters for the shopping list endpoint
#[derive(Debug, Deserialize)]
pub struct ShoppingQuery {
    /// Include already-purchased items; off by default
    #[serde(default)]
    pub include_purchased: bool,
    /// Restrict to one weekly bucket ("YYYY-Www")
    pub week: Option<String>,
}

pub async fn list_items(
    State(state): State<AppState>,
    Path(colocation_id): Path<i64>,
    Query(query): Query<ShoppingQuery>,
) -> Result<impl IntoResponse> {
    info!("GET /api/colocations/{colocation_id}/shopping");
    let items = match query.week {
        Some(week) => shopping::list_items_for_week(&state.db, colocation_id, &week).await?,
        None => shopping::list_items(&state.db, colocation_id, query.include_purchased).await?,
    };
    Ok(Json(items))
}

/// Body of `POST /api/colocations/:id/shopping`
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    /// Item name
    pub name: String,
    /// Free-text quantity
    pub quantity: Option<String>,
    /// Preferred brand
    pub brand: Option<String>,
    /// Category label; defaults to `"autre"`
    pub category: Option<String>,
    /// Rough price estimate in euros
    pub estimated_price: Option<f64>,
    /// Link to a product picture
    pub image_url: Option<String>,
    /// Whether the item is needed urgently
    #[serde(default)]
    pub is_urgent: bool,
    /// Email of the adding member
    pub added_by: String,
}

pub async fn add_item(
    State(state): State<AppState>,
    Path(colocation_id): Path<i64>,
    Json(req): Json<AddItemRequest>,
) -> Result<impl IntoResponse> {
    info!("POST /api/colocations/{colocation_id}/shopping - name: {}", req.name);
    let item = shopping::add_item(
        &state.db,
        colocation_id,
        &req.added_by,
        NewItem {
            name: req.name,
            quantity: req.quantity,
            brand: req.brand,
            category: req.category,
            estimated_price: req.estimated_price,
            image_url: req.image_url,
            is_urgent: req.is_urgent,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Body of `PATCH /api/shopping/:id`. Flags and descriptive fields can be
/// patched together; absent fields keep their current value.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    /// New name
    pub name: Option<String>,
    /// New quantity
    pub quantity: Option<String>,
    /// New brand
    pub brand: Option<String>,
    /// New category label
    pub category: Option<String>,
    /// New price estimate
    pub estimated_price: Option<f64>,
    /// New picture link
    pub image_url: Option<String>,
    /// New urgency flag
    pub is_urgent: Option<bool>,
    /// Mark the item purchased or put it back on the list
    pub is_purchased: Option<bool>,
    /// Email of the member taking care of the item
    pub taken_care_by: Option<String>,
    /// Release a previously claimed item
    #[serde(default)]
    pub release_care: bool,
}

impl UpdateItemRequest {
    fn touches_description(&self) -> bool {
        self.name.is_some()
            || self.quantity.is_some()
            || self.brand.is_some()
            || self.category.is_some()
            || self.estimated_price.is_some()
            || self.image_url.is_some()
            || self.is_urgent.is_some()
    }
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<impl IntoResponse> {
    info!("PATCH /api/shopping/{item_id}");

    if req.touches_description() {
        let current = shopping::get_item_by_id(&state.db, item_id)
            .await?
            .ok_or(Error::ShoppingItemNotFound { id: item_id })?;
        shopping::update_item(
            &state.db,
            item_id,
            NewItem {
                name: req.name.unwrap_or(current.name),
                quantity: req.quantity.or(current.quantity),
                brand: req.brand.or(current.brand),
                category: Some(req.category.unwrap_or(current.category)),
                estimated_price: req.estimated_price.or(current.estimated_price),
                image_url: req.image_url.or(current.image_url),
                is_urgent: req.is_urgent.unwrap_or(current.is_urgent),
            },
        )
        .await?;
    }
    if let Some(purchased) = req.is_purchased {
        shopping::set_purchased(&state.db, item_id, purchased).await?;
    }
    if let Some(email) = req.taken_care_by {
        shopping::take_care(&state.db, item_id, &email).await?;
    } else if req.release_care {
        shopping::release_care(&state.db, item_id).await?;
    }

    let item = shopping::get_item_by_id(&state.db, item_id)
        .await?
        .ok_or(Error::ShoppingItemNotFound { id: item_id })?;
    Ok(Json(item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> Result<impl IntoResponse> {
    info!("DELETE /api/shopping/{item_id}");
    shopping::delete_item(&state.db, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
