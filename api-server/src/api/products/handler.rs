//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::OrgScope;
use crate::auth::CurrentActor;
use crate::core::ServerState;
use crate::db::models::{PricePoint, Product, ProductCreate, ProductUpdate};
use crate::db::repository::{
    ProductListQuery, ProductRepository, make_thing, strip_table_prefix,
};
use shared::ApiResponse;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::ProductStatus;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub supplier: Option<String>,
    pub status: Option<ProductStatus>,
    #[serde(default)]
    pub low_stock: bool,
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

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total_pages: u64,
    pub current_page: u64,
    pub total_products: u64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PriceUpdate {
    #[validate(range(min = 0.0))]
    pub price: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverUpdate {
    pub cover_img_path: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotosUpdate {
    pub photo_paths: Vec<String>,
}

/// POST /api/v1/products
///
/// The cover image upload must succeed before anything is persisted; a
/// rejected upload aborts the whole create.
pub async fn create(
    State(state): State<ServerState>,
    actor: CurrentActor,
    org: OrgScope,
    Json(payload): Json<ProductCreate>,
) -> AppResult<ApiResponse<Product>> {
    state.membership().require_member(&actor.id, &org.0).await?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let cover = state.image_store.upload(&payload.cover_img_path).await?;
    let mut photos = Vec::with_capacity(payload.photo_paths.len());
    for path in &payload.photo_paths {
        photos.push(state.image_store.upload(path).await?.url);
    }

    let now = Utc::now();
    let product = Product {
        id: None,
        owner: actor.id.clone(),
        organization: make_thing("organization", &org.0),
        name: payload.name.clone(),
        description: payload.description,
        category: payload.category,
        supplier: payload.supplier,
        price: vec![PricePoint {
            date: now,
            price: payload.price,
        }],
        quantity: payload.quantity,
        discount_percent: payload.discount_percent.unwrap_or(0.0),
        low_stock_threshold: payload.low_stock_threshold,
        status: ProductStatus::Active,
        is_deleted: false,
        sku: generate_sku(&payload.name),
        cover_img: cover.url,
        photos,
        created_at: now,
        updated_at: now,
    };

    let repo = ProductRepository::new(state.get_db());
    let created = repo.create(product).await?;
    Ok(ApiResponse::created(created, "Product added successfully"))
}

/// GET /api/v1/products
pub async fn list(
    State(state): State<ServerState>,
    actor: CurrentActor,
    org: OrgScope,
    Query(params): Query<ListParams>,
) -> AppResult<ApiResponse<ProductPage>> {
    state.membership().require_member(&actor.id, &org.0).await?;

    let query = ProductListQuery {
        search: params.search.filter(|s| !s.trim().is_empty()),
        category: params.category,
        supplier: params.supplier,
        status: params.status,
        low_stock: params.low_stock,
        sort_by: params.sort,
        descending: params.order.as_deref() == Some("desc"),
        page: params.page,
        limit: params.limit,
    };
    let repo = ProductRepository::new(state.get_db());
    let (products, total) = repo.list(&org.0, &query).await?;

    Ok(ApiResponse::ok(
        ProductPage {
            products,
            total_pages: total.div_ceil(query.limit.max(1)),
            current_page: query.page.max(1),
            total_products: total,
        },
        "Products fetched successfully",
    ))
}

/// PUT /api/v1/products/:id
pub async fn update(
    State(state): State<ServerState>,
    actor: CurrentActor,
    org: OrgScope,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<ApiResponse<Product>> {
    state.membership().require_member(&actor.id, &org.0).await?;

    let repo = ProductRepository::new(state.get_db());
    load_in_org(&repo, &id, &org.0).await?;
    let updated = repo
        .update_details(&id, payload)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(ApiResponse::ok(updated, "Product updated successfully"))
}

/// PUT /api/v1/products/price/:id
pub async fn update_price(
    State(state): State<ServerState>,
    actor: CurrentActor,
    org: OrgScope,
    Path(id): Path<String>,
    Json(payload): Json<PriceUpdate>,
) -> AppResult<ApiResponse<Product>> {
    state.membership().require_member(&actor.id, &org.0).await?;
    if payload.price < 0.0 {
        return Err(AppError::new(ErrorCode::InvalidPrice));
    }

    let repo = ProductRepository::new(state.get_db());
    load_in_org(&repo, &id, &org.0).await?;
    let updated = repo
        .update_price(&id, payload.price)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(ApiResponse::ok(updated, "Price updated successfully"))
}

/// PATCH /api/v1/products/:id/status
pub async fn toggle_status(
    State(state): State<ServerState>,
    actor: CurrentActor,
    org: OrgScope,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Product>> {
    state.membership().require_member(&actor.id, &org.0).await?;

    let repo = ProductRepository::new(state.get_db());
    load_in_org(&repo, &id, &org.0).await?;
    let updated = repo
        .toggle_status(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(ApiResponse::ok(updated, "Product status updated"))
}

/// DELETE /api/v1/products/:id — toggles the soft-delete flag
pub async fn toggle_deleted(
    State(state): State<ServerState>,
    actor: CurrentActor,
    org: OrgScope,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Product>> {
    state.membership().require_member(&actor.id, &org.0).await?;

    let repo = ProductRepository::new(state.get_db());
    load_in_org(&repo, &id, &org.0).await?;
    let updated = repo
        .toggle_deleted(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(ApiResponse::ok(updated, "Product delete status updated"))
}

/// PUT /api/v1/products/:id/cover
pub async fn update_cover(
    State(state): State<ServerState>,
    actor: CurrentActor,
    org: OrgScope,
    Path(id): Path<String>,
    Json(payload): Json<CoverUpdate>,
) -> AppResult<ApiResponse<Product>> {
    state.membership().require_member(&actor.id, &org.0).await?;

    let repo = ProductRepository::new(state.get_db());
    let existing = load_in_org(&repo, &id, &org.0).await?;

    let uploaded = state.image_store.upload(&payload.cover_img_path).await?;
    let updated = repo
        .update_cover(&id, uploaded.url)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    // Old image removal is best effort
    if !existing.cover_img.is_empty()
        && let Err(e) = state.image_store.delete(&existing.cover_img).await
    {
        tracing::warn!(product = %id, error = %e, "Failed to delete old cover image");
    }

    Ok(ApiResponse::ok(updated, "Cover image updated successfully"))
}

/// PUT /api/v1/products/:id/photos
pub async fn add_photos(
    State(state): State<ServerState>,
    actor: CurrentActor,
    org: OrgScope,
    Path(id): Path<String>,
    Json(payload): Json<PhotosUpdate>,
) -> AppResult<ApiResponse<Product>> {
    state.membership().require_member(&actor.id, &org.0).await?;

    let repo = ProductRepository::new(state.get_db());
    load_in_org(&repo, &id, &org.0).await?;

    let mut urls = Vec::with_capacity(payload.photo_paths.len());
    for path in &payload.photo_paths {
        urls.push(state.image_store.upload(path).await?.url);
    }
    let updated = repo
        .add_photos(&id, urls)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(ApiResponse::ok(updated, "Photos updated successfully"))
}

/// GET /api/v1/products/categories
pub async fn categories(
    State(state): State<ServerState>,
    actor: CurrentActor,
    org: OrgScope,
) -> AppResult<ApiResponse<Vec<String>>> {
    state.membership().require_member(&actor.id, &org.0).await?;
    let repo = ProductRepository::new(state.get_db());
    let values = repo.categories(&org.0).await?;
    Ok(ApiResponse::ok(values, "Categories fetched successfully"))
}

/// GET /api/v1/products/suppliers
pub async fn suppliers(
    State(state): State<ServerState>,
    actor: CurrentActor,
    org: OrgScope,
) -> AppResult<ApiResponse<Vec<String>>> {
    state.membership().require_member(&actor.id, &org.0).await?;
    let repo = ProductRepository::new(state.get_db());
    let values = repo.suppliers(&org.0).await?;
    Ok(ApiResponse::ok(values, "Suppliers fetched successfully"))
}

/// Short SKU from the product name plus a random suffix
fn generate_sku(name: &str) -> String {
    let prefix: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_uppercase();
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}",
        if prefix.is_empty() { "SKU" } else { prefix.as_str() },
        &suffix[..8]
    )
}

/// Load a product and confirm it belongs to the scoped organization
async fn load_in_org(repo: &ProductRepository, id: &str, org_id: &str) -> AppResult<Product> {
    let org_key = strip_table_prefix("organization", org_id);
    repo.find_by_id(id)
        .await?
        .filter(|p| p.organization.id.to_raw() == org_key)
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))
}
