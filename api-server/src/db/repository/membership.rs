//! Membership Repository

use super::{BaseRepository, RepoError, RepoResult, make_thing};
use crate::db::models::Membership;
use shared::models::MembershipStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const MEMBERSHIP_TABLE: &str = "membership";

#[derive(Clone)]
pub struct MembershipRepository {
    base: BaseRepository,
}

impl MembershipRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a membership. A (user, organization) pair that already exists
    /// trips the unique index and maps to [`RepoError::Duplicate`].
    pub async fn create(&self, membership: Membership) -> RepoResult<Membership> {
        let created: Option<Membership> = self
            .base
            .db()
            .create(MEMBERSHIP_TABLE)
            .content(membership)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create membership".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Membership>> {
        let thing = make_thing(MEMBERSHIP_TABLE, id);
        let membership: Option<Membership> = self
            .base
            .db()
            .select((MEMBERSHIP_TABLE, thing.id.to_raw()))
            .await?;
        Ok(membership)
    }

    /// Find the membership linking this user to this organization, any status
    pub async fn find(&self, user: &str, organization_id: &str) -> RepoResult<Option<Membership>> {
        let org = make_thing("organization", organization_id);
        let found: Vec<Membership> = self
            .base
            .db()
            .query("SELECT * FROM membership WHERE user = $user AND organization = $org")
            .bind(("user", user.to_string()))
            .bind(("org", org))
            .await?
            .take(0)?;
        Ok(found.into_iter().next())
    }

    /// Like [`find`](Self::find) but only Active memberships
    pub async fn find_active(
        &self,
        user: &str,
        organization_id: &str,
    ) -> RepoResult<Option<Membership>> {
        Ok(self
            .find(user, organization_id)
            .await?
            .filter(|m| m.status == MembershipStatus::Active))
    }

    /// All memberships of an organization
    pub async fn find_by_organization(&self, organization_id: &str) -> RepoResult<Vec<Membership>> {
        let org = make_thing("organization", organization_id);
        let found: Vec<Membership> = self
            .base
            .db()
            .query("SELECT * FROM membership WHERE organization = $org ORDER BY created_at ASC")
            .bind(("org", org))
            .await?
            .take(0)?;
        Ok(found)
    }

    /// Remove a membership
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let thing = make_thing(MEMBERSHIP_TABLE, id);
        let _deleted: Option<Membership> = self
            .base
            .db()
            .delete((MEMBERSHIP_TABLE, thing.id.to_raw()))
            .await?;
        Ok(())
    }
}
