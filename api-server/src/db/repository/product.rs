//! Product Repository
//!
//! Stock changes go through [`try_reserve`](ProductRepository::try_reserve)
//! and [`release`](ProductRepository::release); both are single conditional
//! UPDATE statements so concurrent orders can never oversell.

use super::{BaseRepository, RepoError, RepoResult, make_thing};
use crate::db::models::{PricePoint, Product, ProductUpdate};
use crate::db::models::product::PRICE_HISTORY_LIMIT;
use chrono::Utc;
use serde::Deserialize;
use shared::models::ProductStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

/// Sort fields accepted by the product listing
const SORT_FIELDS: &[&str] = &["created_at", "updated_at", "name", "quantity", "category"];

/// Filters for the paginated product listing
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub supplier: Option<String>,
    pub status: Option<ProductStatus>,
    /// Only products at or below their low stock threshold
    pub low_stock: bool,
    pub sort_by: Option<String>,
    pub descending: bool,
    pub page: u64,
    pub limit: u64,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct ValueRow {
    value: String,
}

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, product: Product) -> RepoResult<Product> {
        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let thing = make_thing(PRODUCT_TABLE, id);
        let product: Option<Product> = self
            .base
            .db()
            .select((PRODUCT_TABLE, thing.id.to_raw()))
            .await?;
        Ok(product)
    }

    /// Paginated listing of an organization's products.
    ///
    /// Soft-deleted products are always excluded. Search and filters run
    /// in-query, before pagination.
    pub async fn list(
        &self,
        organization_id: &str,
        query: &ProductListQuery,
    ) -> RepoResult<(Vec<Product>, u64)> {
        let org = make_thing("organization", organization_id);
        let mut conditions = vec![
            "organization = $org".to_string(),
            "is_deleted = false".to_string(),
        ];
        if query.search.is_some() {
            conditions.push(
                "(string::contains(string::lowercase(name), $search)
                  OR string::contains(string::lowercase(description), $search)
                  OR string::contains(string::lowercase(category), $search))"
                    .to_string(),
            );
        }
        if query.category.is_some() {
            conditions.push("category = $category".to_string());
        }
        if query.supplier.is_some() {
            conditions.push("supplier = $supplier".to_string());
        }
        if query.status.is_some() {
            conditions.push("status = $status".to_string());
        }
        if query.low_stock {
            conditions.push("quantity <= low_stock_threshold".to_string());
        }
        let where_clause = conditions.join(" AND ");

        // Sort field comes from a fixed whitelist, never from raw input
        let sort_by = query
            .sort_by
            .as_deref()
            .filter(|f| SORT_FIELDS.contains(f))
            .unwrap_or("created_at");
        let direction = if query.descending { "DESC" } else { "ASC" };

        let page = query.page.max(1);
        let limit = query.limit.max(1);
        let start = (page - 1) * limit;

        let select = format!(
            "SELECT * FROM product WHERE {where_clause}
             ORDER BY {sort_by} {direction} LIMIT $limit START $start"
        );
        let count = format!("SELECT count() AS count FROM product WHERE {where_clause} GROUP ALL");

        let mut request = self
            .base
            .db()
            .query(select)
            .query(count)
            .bind(("org", org))
            .bind(("limit", limit))
            .bind(("start", start));
        if let Some(search) = &query.search {
            request = request.bind(("search", search.to_lowercase()));
        }
        if let Some(category) = &query.category {
            request = request.bind(("category", category.clone()));
        }
        if let Some(supplier) = &query.supplier {
            request = request.bind(("supplier", supplier.clone()));
        }
        if let Some(status) = query.status {
            request = request.bind(("status", status));
        }

        let mut response = request.await?;
        let products: Vec<Product> = response.take(0)?;
        let counts: Vec<CountRow> = response.take(1)?;
        let total = counts.first().map(|c| c.count).unwrap_or(0);
        Ok((products, total))
    }

    /// Overwrite the editable product detail fields
    pub async fn update_details(
        &self,
        id: &str,
        update: ProductUpdate,
    ) -> RepoResult<Option<Product>> {
        let thing = make_thing(PRODUCT_TABLE, id);
        let mut sets = vec![
            "name = $name",
            "description = $description",
            "status = $status",
            "low_stock_threshold = $low_stock_threshold",
            "category = $category",
            "updated_at = $now",
        ];
        if update.discount_percent.is_some() {
            sets.push("discount_percent = $discount_percent");
        }
        if update.quantity.is_some() {
            sets.push("quantity = $quantity");
        }
        if update.supplier.is_some() {
            sets.push("supplier = $supplier");
        }
        let statement = format!("UPDATE $id SET {} RETURN AFTER", sets.join(", "));

        let mut request = self
            .base
            .db()
            .query(statement)
            .bind(("id", thing))
            .bind(("name", update.name))
            .bind(("description", update.description))
            .bind(("status", update.status))
            .bind(("low_stock_threshold", update.low_stock_threshold))
            .bind(("category", update.category))
            .bind(("now", Utc::now()));
        if let Some(discount) = update.discount_percent {
            request = request.bind(("discount_percent", discount));
        }
        if let Some(quantity) = update.quantity {
            request = request.bind(("quantity", quantity));
        }
        if let Some(supplier) = update.supplier {
            request = request.bind(("supplier", supplier));
        }

        let updated: Vec<Product> = request.await?.take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Record a new current price.
    ///
    /// The new entry is prepended only when it differs from the current
    /// price, and the history is trimmed to [`PRICE_HISTORY_LIMIT`] entries.
    pub async fn update_price(&self, id: &str, new_price: f64) -> RepoResult<Option<Product>> {
        let Some(product) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut history = product.price.clone();
        if history.first().map(|p| p.price) != Some(new_price) {
            history.insert(
                0,
                PricePoint {
                    date: Utc::now(),
                    price: new_price,
                },
            );
            history.truncate(PRICE_HISTORY_LIMIT);
        }

        let thing = make_thing(PRODUCT_TABLE, id);
        let updated: Vec<Product> = self
            .base
            .db()
            .query("UPDATE $id SET price = $price, updated_at = $now RETURN AFTER")
            .bind(("id", thing))
            .bind(("price", history))
            .bind(("now", Utc::now()))
            .await?
            .take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Flip Active/Inactive
    pub async fn toggle_status(&self, id: &str) -> RepoResult<Option<Product>> {
        let Some(product) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let thing = make_thing(PRODUCT_TABLE, id);
        let updated: Vec<Product> = self
            .base
            .db()
            .query("UPDATE $id SET status = $status, updated_at = $now RETURN AFTER")
            .bind(("id", thing))
            .bind(("status", product.status.toggled()))
            .bind(("now", Utc::now()))
            .await?
            .take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Flip the soft-delete flag
    pub async fn toggle_deleted(&self, id: &str) -> RepoResult<Option<Product>> {
        let thing = make_thing(PRODUCT_TABLE, id);
        let updated: Vec<Product> = self
            .base
            .db()
            .query("UPDATE $id SET is_deleted = !is_deleted, updated_at = $now RETURN AFTER")
            .bind(("id", thing))
            .bind(("now", Utc::now()))
            .await?
            .take(0)?;
        Ok(updated.into_iter().next())
    }

    pub async fn update_cover(&self, id: &str, cover_img: String) -> RepoResult<Option<Product>> {
        let thing = make_thing(PRODUCT_TABLE, id);
        let updated: Vec<Product> = self
            .base
            .db()
            .query("UPDATE $id SET cover_img = $cover_img, updated_at = $now RETURN AFTER")
            .bind(("id", thing))
            .bind(("cover_img", cover_img))
            .bind(("now", Utc::now()))
            .await?
            .take(0)?;
        Ok(updated.into_iter().next())
    }

    pub async fn add_photos(&self, id: &str, photos: Vec<String>) -> RepoResult<Option<Product>> {
        let thing = make_thing(PRODUCT_TABLE, id);
        let updated: Vec<Product> = self
            .base
            .db()
            .query(
                "UPDATE $id SET photos = array::concat(photos, $photos), updated_at = $now RETURN AFTER",
            )
            .bind(("id", thing))
            .bind(("photos", photos))
            .bind(("now", Utc::now()))
            .await?
            .take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Distinct categories in use by an organization's live products
    pub async fn categories(&self, organization_id: &str) -> RepoResult<Vec<String>> {
        self.distinct_field(organization_id, "category").await
    }

    /// Distinct suppliers in use by an organization's live products
    pub async fn suppliers(&self, organization_id: &str) -> RepoResult<Vec<String>> {
        self.distinct_field(organization_id, "supplier").await
    }

    async fn distinct_field(&self, organization_id: &str, field: &str) -> RepoResult<Vec<String>> {
        let org = make_thing("organization", organization_id);
        let rows: Vec<ValueRow> = self
            .base
            .db()
            .query(format!(
                "SELECT {field} AS value FROM product
                 WHERE organization = $org AND is_deleted = false AND {field} != NONE"
            ))
            .bind(("org", org))
            .await?
            .take(0)?;
        let mut values: Vec<String> = rows.into_iter().map(|r| r.value).collect();
        values.sort();
        values.dedup();
        Ok(values)
    }

    /// Atomically decrement stock, failing if fewer than `quantity` remain.
    ///
    /// Returns the product after the decrement, or `None` when stock was
    /// insufficient (or the product does not exist). The check and the
    /// write are one statement, so two concurrent orders cannot both take
    /// the last units.
    pub async fn try_reserve(&self, id: &str, quantity: i64) -> RepoResult<Option<Product>> {
        let thing = make_thing(PRODUCT_TABLE, id);
        let updated: Vec<Product> = self
            .base
            .db()
            .query(
                "UPDATE $id SET quantity -= $qty, updated_at = $now
                 WHERE quantity >= $qty RETURN AFTER",
            )
            .bind(("id", thing))
            .bind(("qty", quantity))
            .bind(("now", Utc::now()))
            .await?
            .take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Return previously reserved stock (order cancellation, edit, or
    /// compensation after a partial failure)
    pub async fn release(&self, id: &str, quantity: i64) -> RepoResult<Option<Product>> {
        let thing = make_thing(PRODUCT_TABLE, id);
        let updated: Vec<Product> = self
            .base
            .db()
            .query("UPDATE $id SET quantity += $qty, updated_at = $now RETURN AFTER")
            .bind(("id", thing))
            .bind(("qty", quantity))
            .bind(("now", Utc::now()))
            .await?
            .take(0)?;
        Ok(updated.into_iter().next())
    }
}
