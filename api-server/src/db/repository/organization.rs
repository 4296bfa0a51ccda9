//! Organization Repository

use super::{BaseRepository, RepoError, RepoResult, make_thing};
use crate::db::models::{Membership, Organization};
use chrono::Utc;
use shared::models::Role;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ORGANIZATION_TABLE: &str = "organization";

#[derive(Clone)]
pub struct OrganizationRepository {
    base: BaseRepository,
}

impl OrganizationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find organization by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Organization>> {
        let thing = make_thing(ORGANIZATION_TABLE, id);
        let org: Option<Organization> = self
            .base
            .db()
            .select((ORGANIZATION_TABLE, thing.id.to_raw()))
            .await?;
        Ok(org)
    }

    /// Find organization by slug
    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Organization>> {
        let orgs: Vec<Organization> = self
            .base
            .db()
            .query("SELECT * FROM organization WHERE slug = $slug")
            .bind(("slug", slug.to_lowercase()))
            .await?
            .take(0)?;
        Ok(orgs.into_iter().next())
    }

    /// Find organization by invite code
    pub async fn find_by_invite_code(&self, code: &str) -> RepoResult<Option<Organization>> {
        let orgs: Vec<Organization> = self
            .base
            .db()
            .query("SELECT * FROM organization WHERE invite_code = $code")
            .bind(("code", code.to_string()))
            .await?
            .take(0)?;
        Ok(orgs.into_iter().next())
    }

    /// Whether any organization already uses this invite code
    pub async fn invite_code_exists(&self, code: &str) -> RepoResult<bool> {
        Ok(self.find_by_invite_code(code).await?.is_some())
    }

    /// Create an organization together with its Owner membership.
    ///
    /// The two writes run inside one transaction; either both land or
    /// neither does. This is the only multi-entity atomicity boundary in
    /// the system.
    pub async fn create_with_owner(&self, org: Organization) -> RepoResult<Organization> {
        let owner = org.owner.clone();
        let now = Utc::now();

        let result = self
            .base
            .db()
            .query(
                "
                BEGIN TRANSACTION;
                LET $created = (CREATE organization CONTENT $org);
                CREATE membership CONTENT {
                    user: $user,
                    organization: $created[0].id,
                    role: $role,
                    status: 'Active',
                    created_at: $now,
                    updated_at: $now
                };
                RETURN $created[0];
                COMMIT TRANSACTION;
                ",
            )
            .bind(("org", org))
            .bind(("user", owner))
            .bind(("role", Role::Owner))
            .bind(("now", now))
            .await?;

        // check() surfaces any statement failure, in which case the whole
        // transaction has been rolled back. A transaction with a RETURN
        // yields only the returned value, at slot 0.
        let mut result = result.check()?;
        let created: Option<Organization> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create organization".to_string()))
    }

    /// All organizations the user has an Active membership in, with the role
    pub async fn find_for_user(&self, user: &str) -> RepoResult<Vec<(Organization, Role)>> {
        let memberships: Vec<Membership> = self
            .base
            .db()
            .query("SELECT * FROM membership WHERE user = $user AND status = 'Active'")
            .bind(("user", user.to_string()))
            .await?
            .take(0)?;

        let mut out = Vec::with_capacity(memberships.len());
        for m in memberships {
            if let Some(org) = self.find_by_id(&m.organization.to_string()).await? {
                out.push((org, m.role));
            }
        }
        Ok(out)
    }
}
