//! Shopping item entity - Represents an item on the shared shopping list.
//!
//! Any member can add items; a member may "take care" of an item to signal
//! they will buy it, and items are checked off with `is_purchased`. Two
//! members toggling the same item concurrently is resolved last-write-wins.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shopping item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shopping_items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Colocation this item belongs to
    pub colocation_id: i64,
    /// Item name (e.g., "Lait")
    pub name: String,
    /// Free-form quantity text (e.g., "2L")
    pub quantity: Option<String>,
    /// Preferred brand, if any
    pub brand: Option<String>,
    /// Category label, defaults to `"autre"`
    pub category: String,
    /// Rough price estimate in euros, when known
    pub estimated_price: Option<f64>,
    /// Optional product image URL (opaque string, storage is external)
    pub image_url: Option<String>,
    /// Whether the item is flagged urgent
    pub is_urgent: bool,
    /// Whether the item has been bought
    pub is_purchased: bool,
    /// Whether a member has claimed responsibility for buying it
    pub is_taken_care: bool,
    /// Email of the member who claimed it, when `is_taken_care`
    pub taken_care_by: Option<String>,
    /// Email of the member who added the item
    pub added_by: String,
    /// Weekly bucket the item was added for
    pub week_year: Option<String>,
    /// When the item was added
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `ShoppingItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item belongs to one colocation
    #[sea_orm(
        belongs_to = "super::colocation::Entity",
        from = "Column::ColocationId",
        to = "super::colocation::Column::Id"
    )]
    Colocation,
}

impl Related<super::colocation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Colocation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
