//! Customer Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;
use validator::Validate;

pub type CustomerId = Thing;

/// Postal address, all fields defaulting to empty strings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub country: String,
}

/// Customer model
///
/// Email and phone number are unique (indexed). Customers are never
/// hard-deleted; the blacklist flag controls visibility in listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CustomerId>,
    /// User id of the creator
    pub owner: String,
    /// Record link to organization
    pub organization: Thing,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(default)]
    pub address: Address,
    pub company_name: Option<String>,
    #[serde(default)]
    pub black_listed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for adding a customer
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerCreate {
    pub first_name: String,
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: String,
    pub phone_number: String,
    pub address: Option<Address>,
    pub company_name: Option<String>,
}

/// Payload for updating customer details (email is immutable)
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerUpdate {
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone_number: String,
    pub address: Option<Address>,
    pub company_name: Option<String>,
}

impl Customer {
    pub fn from_create(owner: String, organization: Thing, data: CustomerCreate) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            owner,
            organization,
            first_name: data.first_name,
            last_name: data.last_name.unwrap_or_default(),
            email: data.email.to_lowercase(),
            phone_number: data.phone_number,
            address: data.address.unwrap_or_default(),
            company_name: data.company_name,
            black_listed: false,
            created_at: now,
            updated_at: now,
        }
    }
}
