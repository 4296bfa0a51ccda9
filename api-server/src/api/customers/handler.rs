//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::OrgScope;
use crate::auth::CurrentActor;
use crate::core::ServerState;
use crate::db::models::{Customer, CustomerCreate, CustomerUpdate};
use crate::db::repository::{CustomerListQuery, CustomerRepository, make_thing};
use shared::ApiResponse;
use shared::error::{AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub search: Option<String>,
    pub black_listed: Option<bool>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPage {
    pub customers: Vec<Customer>,
    pub total_pages: u64,
    pub current_page: u64,
    pub total_customers: u64,
}

/// POST /api/v1/customers
pub async fn create(
    State(state): State<ServerState>,
    actor: CurrentActor,
    org: OrgScope,
    Json(payload): Json<CustomerCreate>,
) -> AppResult<ApiResponse<Customer>> {
    state.membership().require_member(&actor.id, &org.0).await?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = CustomerRepository::new(state.get_db());
    if repo
        .exists_by_contact(&payload.email, &payload.phone_number)
        .await?
    {
        return Err(AppError::new(ErrorCode::CustomerExists));
    }

    let customer = Customer::from_create(
        actor.id.clone(),
        make_thing("organization", &org.0),
        payload,
    );
    let created = repo.create(customer).await?;
    Ok(ApiResponse::created(created, "Customer added successfully"))
}

/// GET /api/v1/customers
pub async fn list(
    State(state): State<ServerState>,
    actor: CurrentActor,
    org: OrgScope,
    Query(params): Query<ListParams>,
) -> AppResult<ApiResponse<CustomerPage>> {
    state.membership().require_member(&actor.id, &org.0).await?;

    let query = CustomerListQuery {
        search: params.search.filter(|s| !s.trim().is_empty()),
        black_listed: params.black_listed,
        page: params.page,
        limit: params.limit,
    };
    let repo = CustomerRepository::new(state.get_db());
    let (customers, total) = repo.list(&org.0, &query).await?;

    Ok(ApiResponse::ok(
        CustomerPage {
            customers,
            total_pages: total.div_ceil(query.limit.max(1)),
            current_page: query.page.max(1),
            total_customers: total,
        },
        "Customers fetched successfully",
    ))
}

/// PUT /api/v1/customers/:id
pub async fn update(
    State(state): State<ServerState>,
    actor: CurrentActor,
    org: OrgScope,
    Path(id): Path<String>,
    Json(payload): Json<CustomerUpdate>,
) -> AppResult<ApiResponse<Customer>> {
    state.membership().require_member(&actor.id, &org.0).await?;

    let repo = CustomerRepository::new(state.get_db());
    load_in_org(&repo, &id, &org.0).await?;
    let updated = repo
        .update(&id, payload)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;
    Ok(ApiResponse::ok(updated, "Customer updated successfully"))
}

/// PATCH /api/v1/customers/:id/blacklist
pub async fn toggle_blacklist(
    State(state): State<ServerState>,
    actor: CurrentActor,
    org: OrgScope,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Customer>> {
    state.membership().require_member(&actor.id, &org.0).await?;

    let repo = CustomerRepository::new(state.get_db());
    load_in_org(&repo, &id, &org.0).await?;
    let updated = repo
        .toggle_blacklist(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;
    Ok(ApiResponse::ok(
        updated,
        "Customer blacklist status updated",
    ))
}

/// Load a customer and confirm it belongs to the scoped organization
async fn load_in_org(repo: &CustomerRepository, id: &str, org_id: &str) -> AppResult<Customer> {
    let org_key = crate::db::repository::strip_table_prefix("organization", org_id);
    repo.find_by_id(id)
        .await?
        .filter(|c| c.organization.id.to_raw() == org_key)
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))
}
