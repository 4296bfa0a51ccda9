//! Product Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::models::ProductStatus;
use surrealdb::sql::Thing;
use validator::Validate;

pub type ProductId = Thing;

/// One entry of a product's price history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: DateTime<Utc>,
    pub price: f64,
}

/// Product model
///
/// `price` is an ordered history of at most [`PRICE_HISTORY_LIMIT`] entries,
/// newest first; element 0 is always the current price. `quantity` is
/// mutated exclusively by the order workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    /// User id of the creator
    pub owner: String,
    /// Record link to organization
    pub organization: Thing,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub supplier: Option<String>,
    /// Price history, newest first, length <= 3
    pub price: Vec<PricePoint>,
    /// Current stock
    pub quantity: i64,
    /// Per-product discount applied on every line of every order
    #[serde(default)]
    pub discount_percent: f64,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub is_deleted: bool,
    pub sku: String,
    /// Image store URL (upload must succeed before the product exists)
    pub cover_img: String,
    #[serde(default)]
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Maximum number of retained price history entries
pub const PRICE_HISTORY_LIMIT: usize = 3;

fn default_low_stock_threshold() -> i64 {
    10
}

impl Product {
    /// The current unit price: head of the price history
    pub fn current_price(&self) -> f64 {
        self.price.first().map(|p| p.price).unwrap_or(0.0)
    }
}

/// Payload for adding a product
///
/// `cover_img_path` points at a staged local file; the create handler
/// uploads it to the image store before anything is persisted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub category: String,
    pub supplier: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0.0))]
    pub discount_percent: Option<f64>,
    #[validate(range(min = 0))]
    pub quantity: i64,
    pub low_stock_threshold: i64,
    pub cover_img_path: String,
    #[serde(default)]
    pub photo_paths: Vec<String>,
}

/// Payload for updating product details
///
/// Deliberately excludes `price` (see the price endpoint) and `cover_img` /
/// `photos` (image endpoints).
#[derive(Debug, Clone, Deserialize)]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    pub status: ProductStatus,
    pub low_stock_threshold: i64,
    pub category: String,
    pub discount_percent: Option<f64>,
    pub quantity: Option<i64>,
    pub supplier: Option<String>,
}
