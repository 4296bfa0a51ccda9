//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::models::OrderStatus;
use surrealdb::sql::Thing;

pub type OrderId = Thing;

/// One order line: product reference, quantity, and the unit price
/// snapshotted when the order was placed. Later price changes on the product
/// never alter this value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub product: Thing,
    pub quantity: i64,
    pub price: f64,
}

/// Requested line in a create/edit payload (price is not client-settable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemRequest {
    pub product: String,
    pub quantity: i64,
}

/// Order model
///
/// Stored in table `order_doc` (`order` is a SurrealQL keyword).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderId>,
    /// User id of the creator
    pub owner: String,
    /// Record link to organization
    pub organization: Thing,
    /// Record link to customer
    pub customer: Thing,
    pub products: Vec<LineItem>,
    /// Sum of quantity * snapshotted unit price over all lines
    pub total_price: f64,
    /// Total after each product's own discount_percent, before the
    /// order-level discount
    pub initial_discounted_price: f64,
    /// Order-level percentage discount applied once on top
    pub additional_discount_percent: f64,
    /// initial_discounted_price * (1 - additional_discount_percent/100)
    pub final_discounted_price: f64,
    pub payment_method: String,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Joined customer summary for order listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Thing>,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub company_name: Option<String>,
}

/// Joined product summary for order listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Thing>,
    pub name: String,
    pub cover_img: String,
    #[serde(default)]
    pub discount_percent: f64,
    pub quantity: i64,
}

/// Order with joined display data, as returned by the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub customer_details: CustomerSummary,
    pub product_details: Vec<ProductSummary>,
}
