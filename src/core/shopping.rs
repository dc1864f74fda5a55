//! Shared shopping list.
//!
//! Items live on one list per colocation, bucketed by the ISO week they were
//! added in. Two independent flags track progress: a member can announce they
//! are taking care of an item, and anyone can mark it purchased.

use crate::{
    core::{colocation::get_colocation_member, task::week_key},
    entities::{ShoppingItem, shopping_item},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Category applied when the caller gives none
pub const DEFAULT_CATEGORY: &str = "autre";

/// Fields accepted when adding an item to the list.
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    /// Item name, required
    pub name: String,
    /// Free-text quantity ("2kg", "x3")
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
    pub is_urgent: bool,
}

/// Adds an item to the colocation's shopping list.
///
/// The adder must be a member; a negative or non-finite price estimate is
/// rejected. The weekly bucket is the week the item is added in.
pub async fn add_item(
    db: &DatabaseConnection,
    colocation_id: i64,
    added_by: &str,
    item: NewItem,
) -> Result<shopping_item::Model> {
    if item.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Shopping item name cannot be empty".to_string(),
        });
    }
    if let Some(price) = item.estimated_price {
        if !price.is_finite() || price < 0.0 {
            return Err(Error::InvalidAmount { amount: price });
        }
    }
    get_colocation_member(db, colocation_id, added_by)
        .await?
        .ok_or_else(|| Error::MemberNotFound {
            email: added_by.to_string(),
        })?;

    let row = shopping_item::ActiveModel {
        colocation_id: Set(colocation_id),
        name: Set(item.name.trim().to_string()),
        quantity: Set(item.quantity),
        brand: Set(item.brand),
        category: Set(item.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string())),
        estimated_price: Set(item.estimated_price),
        image_url: Set(item.image_url),
        is_urgent: Set(item.is_urgent),
        is_purchased: Set(false),
        is_taken_care: Set(false),
        taken_care_by: Set(None),
        added_by: Set(added_by.to_string()),
        week_year: Set(Some(week_key(Utc::now().date_naive()))),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    row.insert(db).await.map_err(Into::into)
}

/// Retrieves an item by ID.
pub async fn get_item_by_id(
    db: &DatabaseConnection,
    item_id: i64,
) -> Result<Option<shopping_item::Model>> {
    ShoppingItem::find_by_id(item_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists shopping items for a colocation, newest first, optionally hiding
/// already-purchased ones.
pub async fn list_items(
    db: &DatabaseConnection,
    colocation_id: i64,
    include_purchased: bool,
) -> Result<Vec<shopping_item::Model>> {
    let mut query = ShoppingItem::find().filter(shopping_item::Column::ColocationId.eq(colocation_id));
    if !include_purchased {
        query = query.filter(shopping_item::Column::IsPurchased.eq(false));
    }
    query
        .order_by_desc(shopping_item::Column::CreatedAt)
        .order_by_desc(shopping_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists items added in a given weekly bucket.
pub async fn list_items_for_week(
    db: &DatabaseConnection,
    colocation_id: i64,
    week_year: &str,
) -> Result<Vec<shopping_item::Model>> {
    ShoppingItem::find()
        .filter(shopping_item::Column::ColocationId.eq(colocation_id))
        .filter(shopping_item::Column::WeekYear.eq(week_year))
        .order_by_desc(shopping_item::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sets or clears the purchased flag.
pub async fn set_purchased(
    db: &DatabaseConnection,
    item_id: i64,
    purchased: bool,
) -> Result<shopping_item::Model> {
    let item = get_item_by_id(db, item_id)
        .await?
        .ok_or(Error::ShoppingItemNotFound { id: item_id })?;

    let mut active: shopping_item::ActiveModel = item.into();
    active.is_purchased = Set(purchased);
    active.update(db).await.map_err(Into::into)
}

/// Marks an item as taken care of by a member.
pub async fn take_care(
    db: &DatabaseConnection,
    item_id: i64,
    email: &str,
) -> Result<shopping_item::Model> {
    let item = get_item_by_id(db, item_id)
        .await?
        .ok_or(Error::ShoppingItemNotFound { id: item_id })?;

    get_colocation_member(db, item.colocation_id, email)
        .await?
        .ok_or_else(|| Error::MemberNotFound {
            email: email.to_string(),
        })?;

    let mut active: shopping_item::ActiveModel = item.into();
    active.is_taken_care = Set(true);
    active.taken_care_by = Set(Some(email.to_string()));
    active.update(db).await.map_err(Into::into)
}

/// Releases a previously claimed item back to the list.
pub async fn release_care(db: &DatabaseConnection, item_id: i64) -> Result<shopping_item::Model> {
    let item = get_item_by_id(db, item_id)
        .await?
        .ok_or(Error::ShoppingItemNotFound { id: item_id })?;

    let mut active: shopping_item::ActiveModel = item.into();
    active.is_taken_care = Set(false);
    active.taken_care_by = Set(None);
    active.update(db).await.map_err(Into::into)
}

/// Updates the descriptive fields of an item.
pub async fn update_item(
    db: &DatabaseConnection,
    item_id: i64,
    changes: NewItem,
) -> Result<shopping_item::Model> {
    if changes.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Shopping item name cannot be empty".to_string(),
        });
    }
    if let Some(price) = changes.estimated_price {
        if !price.is_finite() || price < 0.0 {
            return Err(Error::InvalidAmount { amount: price });
        }
    }
    let item = get_item_by_id(db, item_id)
        .await?
        .ok_or(Error::ShoppingItemNotFound { id: item_id })?;

    let mut active: shopping_item::ActiveModel = item.into();
    active.name = Set(changes.name.trim().to_string());
    active.quantity = Set(changes.quantity);
    active.brand = Set(changes.brand);
    if let Some(category) = changes.category {
        active.category = Set(category);
    }
    active.estimated_price = Set(changes.estimated_price);
    active.image_url = Set(changes.image_url);
    active.is_urgent = Set(changes.is_urgent);
    active.update(db).await.map_err(Into::into)
}

/// Removes an item from the list.
pub async fn delete_item(db: &DatabaseConnection, item_id: i64) -> Result<()> {
    let item = get_item_by_id(db, item_id)
        .await?
        .ok_or(Error::ShoppingItemNotFound { id: item_id })?;
    ShoppingItem::delete_by_id(item.id).exec(db).await?;
    Ok(())
}
