//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::OrgScope;
use crate::auth::CurrentActor;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::OrderListQuery;
use crate::orders::{OrderCreate, OrderEdit, OrderPage, OrderWorkflow, WorkflowCtx};
use shared::ApiResponse;
use shared::error::AppResult;
use shared::models::OrderStatus;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub status: Option<OrderStatus>,
    pub payment_method: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    /// "asc" (default) or "desc"
    pub order: Option<String>,
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

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

async fn workflow(state: &ServerState, actor: &CurrentActor, org: &OrgScope) -> AppResult<OrderWorkflow> {
    state.membership().require_member(&actor.id, &org.0).await?;
    Ok(OrderWorkflow::new(
        state.get_db(),
        WorkflowCtx {
            actor: actor.id.clone(),
            organization: org.0.clone(),
        },
    ))
}

/// POST /api/v1/orders
pub async fn create(
    State(state): State<ServerState>,
    actor: CurrentActor,
    org: OrgScope,
    Json(payload): Json<OrderCreate>,
) -> AppResult<ApiResponse<Order>> {
    let workflow = workflow(&state, &actor, &org).await?;
    let order = workflow.create_order(payload).await?;
    Ok(ApiResponse::ok(order, "Order Created Successfully"))
}

/// GET /api/v1/orders
pub async fn list(
    State(state): State<ServerState>,
    actor: CurrentActor,
    org: OrgScope,
    Query(params): Query<ListParams>,
) -> AppResult<ApiResponse<OrderPage>> {
    let workflow = workflow(&state, &actor, &org).await?;
    let page = workflow
        .list_orders(OrderListQuery {
            status: params.status,
            payment_method: params.payment_method,
            search: params.search.filter(|s| !s.trim().is_empty()),
            sort_by: params.sort,
            descending: params.order.as_deref() == Some("desc"),
            page: params.page,
            limit: params.limit,
        })
        .await?;
    Ok(ApiResponse::ok(page, "Orders fetched successfully"))
}

/// GET /api/v1/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    actor: CurrentActor,
    org: OrgScope,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let workflow = workflow(&state, &actor, &org).await?;
    let order = workflow.get_order(&id).await?;
    Ok(ApiResponse::ok(order, "Order fetched successfully"))
}

/// PATCH /api/v1/orders/:id — edit lines and totals
pub async fn edit(
    State(state): State<ServerState>,
    actor: CurrentActor,
    org: OrgScope,
    Path(id): Path<String>,
    Json(payload): Json<OrderEdit>,
) -> AppResult<ApiResponse<Order>> {
    let workflow = workflow(&state, &actor, &org).await?;
    let order = workflow.edit_order(&id, payload).await?;
    Ok(ApiResponse::ok(order, "Order updated successfully"))
}

/// PUT /api/v1/orders/:id — overwrite the status
pub async fn update_status(
    State(state): State<ServerState>,
    actor: CurrentActor,
    org: OrgScope,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<ApiResponse<Order>> {
    let workflow = workflow(&state, &actor, &org).await?;
    let order = workflow.update_status(&id, payload.status).await?;
    Ok(ApiResponse::ok(order, "Order status updated successfully"))
}
