//! Membership Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::models::{MembershipStatus, Role};
use surrealdb::sql::Thing;

pub type MembershipId = Thing;

/// Membership model — role binding of a user to an organization
///
/// At most one membership may exist per (user, organization); the pair is
/// covered by a unique index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MembershipId>,
    /// User id (external identity service)
    pub user: String,
    /// Record link to organization
    pub organization: Thing,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: MembershipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(user: String, organization: Thing, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            user,
            organization,
            role,
            status: MembershipStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }
}
