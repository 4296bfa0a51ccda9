//! Order Repository
//!
//! Orders live in the `order_doc` table (`order` is a SurrealQL keyword).

use super::{BaseRepository, RepoError, RepoResult, make_thing};
use crate::db::models::{CustomerSummary, LineItem, Order, OrderView, ProductSummary};
use chrono::Utc;
use serde::Deserialize;
use shared::models::OrderStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

const ORDER_TABLE: &str = "order_doc";

/// Sort fields accepted by the order listing
const SORT_FIELDS: &[&str] = &[
    "created_at",
    "updated_at",
    "total_price",
    "final_discounted_price",
    "status",
    "payment_method",
];

/// Filters for the paginated order listing
#[derive(Debug, Clone, Default)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub payment_method: Option<String>,
    /// Matches the joined customer's name or company
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub descending: bool,
    pub page: u64,
    pub limit: u64,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: u64,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = make_thing(ORDER_TABLE, id);
        let order: Option<Order> = self
            .base
            .db()
            .select((ORDER_TABLE, thing.id.to_raw()))
            .await?;
        Ok(order)
    }

    /// Overwrite an order's lines and recomputed totals after an edit
    #[allow(clippy::too_many_arguments)]
    pub async fn update_lines(
        &self,
        id: &str,
        customer: Thing,
        products: Vec<LineItem>,
        total_price: f64,
        initial_discounted_price: f64,
        additional_discount_percent: f64,
        final_discounted_price: f64,
        payment_method: String,
    ) -> RepoResult<Option<Order>> {
        let thing = make_thing(ORDER_TABLE, id);
        let updated: Vec<Order> = self
            .base
            .db()
            .query(
                "UPDATE $id SET
                    customer = $customer,
                    products = $products,
                    total_price = $total_price,
                    initial_discounted_price = $initial_discounted_price,
                    additional_discount_percent = $additional_discount_percent,
                    final_discounted_price = $final_discounted_price,
                    payment_method = $payment_method,
                    updated_at = $now
                 RETURN AFTER",
            )
            .bind(("id", thing))
            .bind(("customer", customer))
            .bind(("products", products))
            .bind(("total_price", total_price))
            .bind(("initial_discounted_price", initial_discounted_price))
            .bind(("additional_discount_percent", additional_discount_percent))
            .bind(("final_discounted_price", final_discounted_price))
            .bind(("payment_method", payment_method))
            .bind(("now", Utc::now()))
            .await?
            .take(0)?;
        Ok(updated.into_iter().next())
    }

    pub async fn set_status(&self, id: &str, status: OrderStatus) -> RepoResult<Option<Order>> {
        let thing = make_thing(ORDER_TABLE, id);
        let updated: Vec<Order> = self
            .base
            .db()
            .query("UPDATE $id SET status = $status, updated_at = $now RETURN AFTER")
            .bind(("id", thing))
            .bind(("status", status))
            .bind(("now", Utc::now()))
            .await?
            .take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Paginated listing of an organization's orders with joined customer
    /// and product display data.
    ///
    /// Search traverses the customer record link in-query, so it applies to
    /// the full data set before pagination.
    pub async fn list(
        &self,
        organization_id: &str,
        query: &OrderListQuery,
    ) -> RepoResult<(Vec<OrderView>, u64)> {
        let org = make_thing("organization", organization_id);
        let mut conditions = vec!["organization = $org".to_string()];
        if query.status.is_some() {
            conditions.push("status = $status".to_string());
        }
        if query.payment_method.is_some() {
            conditions.push("payment_method = $payment_method".to_string());
        }
        if query.search.is_some() {
            conditions.push(
                "(string::contains(string::lowercase(customer.first_name ?? ''), $search)
                  OR string::contains(string::lowercase(customer.last_name ?? ''), $search)
                  OR string::contains(string::lowercase(customer.company_name ?? ''), $search))"
                    .to_string(),
            );
        }
        let where_clause = conditions.join(" AND ");

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
            "SELECT * FROM order_doc WHERE {where_clause}
             ORDER BY {sort_by} {direction} LIMIT $limit START $start"
        );
        let count = format!("SELECT count() AS count FROM order_doc WHERE {where_clause} GROUP ALL");

        let mut request = self
            .base
            .db()
            .query(select)
            .query(count)
            .bind(("org", org))
            .bind(("limit", limit))
            .bind(("start", start));
        if let Some(status) = query.status {
            request = request.bind(("status", status));
        }
        if let Some(payment_method) = &query.payment_method {
            request = request.bind(("payment_method", payment_method.clone()));
        }
        if let Some(search) = &query.search {
            request = request.bind(("search", search.to_lowercase()));
        }

        let mut response = request.await?;
        let orders: Vec<Order> = response.take(0)?;
        let counts: Vec<CountRow> = response.take(1)?;
        let total = counts.first().map(|c| c.count).unwrap_or(0);

        let mut views = Vec::with_capacity(orders.len());
        for order in orders {
            views.push(self.build_view(order).await?);
        }
        Ok((views, total))
    }

    /// Most recent orders of an organization, joined for display
    pub async fn recent(&self, organization_id: &str, limit: u64) -> RepoResult<Vec<OrderView>> {
        let org = make_thing("organization", organization_id);
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order_doc WHERE organization = $org
                 ORDER BY created_at DESC LIMIT $limit",
            )
            .bind(("org", org))
            .bind(("limit", limit.max(1)))
            .await?
            .take(0)?;

        let mut views = Vec::with_capacity(orders.len());
        for order in orders {
            views.push(self.build_view(order).await?);
        }
        Ok(views)
    }

    /// Every order of an organization, oldest first. Used for the dashboard
    /// aggregations, which run over the full history.
    pub async fn find_all_for_organization(&self, organization_id: &str) -> RepoResult<Vec<Order>> {
        let org = make_thing("organization", organization_id);
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order_doc WHERE organization = $org ORDER BY created_at ASC")
            .bind(("org", org))
            .await?
            .take(0)?;
        Ok(orders)
    }

    async fn build_view(&self, order: Order) -> RepoResult<OrderView> {
        let customers: Vec<CustomerSummary> = self
            .base
            .db()
            .query("SELECT id, first_name, last_name, company_name FROM $id")
            .bind(("id", order.customer.clone()))
            .await?
            .take(0)?;
        let customer_details = customers.into_iter().next().unwrap_or(CustomerSummary {
            id: Some(order.customer.clone()),
            first_name: String::new(),
            last_name: String::new(),
            company_name: None,
        });

        let mut product_details = Vec::with_capacity(order.products.len());
        for line in &order.products {
            let found: Vec<ProductSummary> = self
                .base
                .db()
                .query("SELECT id, name, cover_img, discount_percent, quantity FROM $id")
                .bind(("id", line.product.clone()))
                .await?
                .take(0)?;
            if let Some(summary) = found.into_iter().next() {
                product_details.push(summary);
            }
        }

        Ok(OrderView {
            order,
            customer_details,
            product_details,
        })
    }
}
