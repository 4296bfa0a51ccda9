//! Tenancy Module
//!
//! Organizations, memberships, and the authorization checks every
//! organization-scoped operation runs through.

use crate::db::models::{Membership, Organization};
use crate::db::repository::{MembershipRepository, OrganizationRepository, RepoError};
use crate::services::MailSender;
use rand::Rng;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::Role;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const INVITE_CODE_LEN: usize = 6;
const INVITE_CODE_RETRIES: usize = 5;

/// Random 6-character uppercase alphanumeric invite code
fn generate_invite_code() -> String {
    const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();
    (0..INVITE_CODE_LEN)
        .map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char)
        .collect()
}

/// Membership service
///
/// Every operation takes the acting user id explicitly; there is no ambient
/// request state below the handler layer.
#[derive(Clone)]
pub struct MembershipService {
    organizations: OrganizationRepository,
    memberships: MembershipRepository,
    mail: Arc<dyn MailSender>,
}

impl MembershipService {
    pub fn new(db: Surreal<Db>, mail: Arc<dyn MailSender>) -> Self {
        Self {
            organizations: OrganizationRepository::new(db.clone()),
            memberships: MembershipRepository::new(db),
            mail,
        }
    }

    /// The actor's Active membership in the organization, or a permission
    /// error. Gate for every organization-scoped read.
    pub async fn require_member(&self, user: &str, organization_id: &str) -> AppResult<Membership> {
        self.memberships
            .find_active(user, organization_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::NotOrganizationMember))
    }

    /// Like [`require_member`](Self::require_member), but the membership must
    /// also carry a managing role (Owner or Admin)
    pub async fn require_manager(&self, user: &str, organization_id: &str) -> AppResult<Membership> {
        let membership = self.require_member(user, organization_id).await?;
        if !membership.role.is_manager() {
            return Err(AppError::permission_denied(
                "You are not authorized to manage members",
            ));
        }
        Ok(membership)
    }

    /// Create an organization with the actor as Owner.
    ///
    /// The organization record and the Owner membership are written in one
    /// transaction. The invite code is regenerated on collision a bounded
    /// number of times; the unique index backstops the remaining race.
    pub async fn create_organization(
        &self,
        actor: &str,
        name: &str,
        slug: &str,
    ) -> AppResult<Organization> {
        let name = name.trim();
        let slug = slug.trim().to_lowercase();
        if name.is_empty() || slug.is_empty() {
            return Err(AppError::validation("Name and Slug are required"));
        }

        if self.organizations.find_by_slug(&slug).await?.is_some() {
            return Err(AppError::new(ErrorCode::SlugExists));
        }

        let mut invite_code = generate_invite_code();
        let mut retries = 0;
        while self.organizations.invite_code_exists(&invite_code).await? {
            retries += 1;
            if retries > INVITE_CODE_RETRIES {
                return Err(AppError::internal("Could not allocate an invite code"));
            }
            invite_code = generate_invite_code();
        }

        let org = Organization::new(name.to_string(), slug, actor.to_string(), invite_code);

        self.organizations
            .create_with_owner(org)
            .await
            .map_err(|e| match e {
                RepoError::Duplicate(_) => AppError::new(ErrorCode::SlugExists),
                other => other.into(),
            })
    }

    /// Join an organization by invite code as a Member
    pub async fn join_organization(
        &self,
        actor: &str,
        invite_code: &str,
    ) -> AppResult<Organization> {
        let org = self
            .organizations
            .find_by_invite_code(invite_code.trim())
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::InviteCodeInvalid))?;

        let org_thing = org
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Organization record has no id"))?;

        if self
            .memberships
            .find(actor, &org_thing.to_string())
            .await?
            .is_some()
        {
            return Err(AppError::new(ErrorCode::MembershipExists));
        }

        let membership = Membership::new(actor.to_string(), org_thing, Role::Member);
        self.memberships
            .create(membership)
            .await
            .map_err(|e| match e {
                RepoError::Duplicate(_) => AppError::new(ErrorCode::MembershipExists),
                other => other.into(),
            })?;

        Ok(org)
    }

    /// Organizations the actor belongs to, with their role in each
    pub async fn list_for_user(&self, actor: &str) -> AppResult<Vec<(Organization, Role)>> {
        Ok(self.organizations.find_for_user(actor).await?)
    }

    /// Members of an organization; any member may look
    pub async fn list_members(
        &self,
        actor: &str,
        organization_id: &str,
    ) -> AppResult<Vec<Membership>> {
        self.require_member(actor, organization_id).await?;
        Ok(self.memberships.find_by_organization(organization_id).await?)
    }

    /// Add a user to an organization directly (manager only) and notify them
    /// by mail. A failed notification fails the request, but the membership
    /// has already been created at that point.
    pub async fn add_member(
        &self,
        actor: &str,
        organization_id: &str,
        user: &str,
        email: &str,
        role: Role,
    ) -> AppResult<Membership> {
        self.require_manager(actor, organization_id).await?;

        let org = self
            .organizations
            .find_by_id(organization_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrganizationNotFound))?;

        if self.memberships.find(user, organization_id).await?.is_some() {
            return Err(AppError::new(ErrorCode::MembershipExists));
        }

        let membership = Membership::new(
            user.to_string(),
            org.id.clone().ok_or_else(|| AppError::internal("Organization record has no id"))?,
            role,
        );
        let created = self
            .memberships
            .create(membership)
            .await
            .map_err(|e| match e {
                RepoError::Duplicate(_) => AppError::new(ErrorCode::MembershipExists),
                other => other.into(),
            })?;

        self.mail
            .send(
                email,
                &format!("You have been added to {}", org.name),
                &format!(
                    "<p>You have been added to <b>{}</b> as {}.</p>",
                    org.name, created.role
                ),
            )
            .await?;

        Ok(created)
    }

    /// Remove a member from an organization.
    ///
    /// Manager only; self-removal is rejected, and an Admin cannot remove an
    /// Owner.
    pub async fn remove_member(
        &self,
        actor: &str,
        organization_id: &str,
        membership_id: &str,
    ) -> AppResult<()> {
        let actor_membership = self.require_manager(actor, organization_id).await?;

        let org_key =
            crate::db::repository::strip_table_prefix("organization", organization_id).to_string();
        let target = self
            .memberships
            .find_by_id(membership_id)
            .await?
            .filter(|m| m.organization.id.to_raw() == org_key)
            .ok_or_else(|| AppError::new(ErrorCode::MembershipNotFound))?;

        if target.user == actor {
            return Err(AppError::validation(
                "You cannot remove yourself using this feature.",
            ));
        }
        if actor_membership.role == Role::Admin && target.role == Role::Owner {
            return Err(AppError::permission_denied("Admins cannot remove Owners"));
        }

        let id = target
            .id
            .as_ref()
            .map(|t| t.to_string())
            .ok_or_else(|| AppError::internal("Membership record has no id"))?;
        self.memberships.delete(&id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_code_shape() {
        for _ in 0..50 {
            let code = generate_invite_code();
            assert_eq!(code.len(), 6);
            assert!(
                code.chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            );
        }
    }
}
