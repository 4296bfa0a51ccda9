//! Organization Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

pub type OrganizationId = Thing;

/// Organization model
///
/// Slug and invite code are immutable after creation; uniqueness of both is
/// enforced by indexes defined at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrganizationId>,
    pub name: String,
    /// Unique, lowercased URL slug
    pub slug: String,
    /// User id of the creator (external identity service)
    pub owner: String,
    /// Short random join token, unique per organization
    pub invite_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    pub fn new(name: String, slug: String, owner: String, invite_code: String) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name,
            slug: slug.to_lowercase(),
            owner,
            invite_code,
            created_at: now,
            updated_at: now,
        }
    }
}
