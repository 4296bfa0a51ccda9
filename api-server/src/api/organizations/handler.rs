//! Organization API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentActor;
use crate::core::ServerState;
use crate::db::models::{Membership, Organization};
use shared::error::AppResult;
use shared::models::Role;
use shared::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct OrganizationCreate {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub invite_code: String,
}

#[derive(Debug, Deserialize)]
pub struct MemberAdd {
    /// Target user id in the identity service
    pub user: String,
    /// Address the notification mail goes to
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

/// Organization plus the requesting user's role in it
#[derive(Debug, Serialize)]
pub struct OrganizationWithRole {
    #[serde(flatten)]
    pub organization: Organization,
    pub role: Role,
}

/// POST /api/v1/organizations
pub async fn create(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Json(payload): Json<OrganizationCreate>,
) -> AppResult<ApiResponse<Organization>> {
    let org = state
        .membership()
        .create_organization(&actor.id, &payload.name, &payload.slug)
        .await?;
    Ok(ApiResponse::created(
        org,
        "Organization created successfully",
    ))
}

/// GET /api/v1/organizations — organizations the requester belongs to
pub async fn list_mine(
    State(state): State<ServerState>,
    actor: CurrentActor,
) -> AppResult<ApiResponse<Vec<OrganizationWithRole>>> {
    let orgs = state
        .membership()
        .list_for_user(&actor.id)
        .await?
        .into_iter()
        .map(|(organization, role)| OrganizationWithRole { organization, role })
        .collect();
    Ok(ApiResponse::ok(orgs, "Organizations fetched successfully"))
}

/// POST /api/v1/organizations/join
pub async fn join(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Json(payload): Json<JoinRequest>,
) -> AppResult<ApiResponse<Organization>> {
    let org = state
        .membership()
        .join_organization(&actor.id, &payload.invite_code)
        .await?;
    Ok(ApiResponse::ok(org, "Joined organization successfully"))
}

/// GET /api/v1/organizations/:id/members
pub async fn list_members(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<Membership>>> {
    let members = state.membership().list_members(&actor.id, &id).await?;
    Ok(ApiResponse::ok(members, "Members fetched successfully"))
}

/// POST /api/v1/organizations/:id/members
pub async fn add_member(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<String>,
    Json(payload): Json<MemberAdd>,
) -> AppResult<ApiResponse<Membership>> {
    let membership = state
        .membership()
        .add_member(&actor.id, &id, &payload.user, &payload.email, payload.role)
        .await?;
    Ok(ApiResponse::created(membership, "Member added successfully"))
}

/// DELETE /api/v1/organizations/:id/members/:member_id
pub async fn remove_member(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path((id, member_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<bool>> {
    state
        .membership()
        .remove_member(&actor.id, &id, &member_id)
        .await?;
    Ok(ApiResponse::ok(true, "Member removed successfully"))
}
