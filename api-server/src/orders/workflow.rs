//! Order workflow engine
//!
//! Stock is reserved per line through a conditional update; a partial
//! failure releases what was already taken before the error propagates, so
//! stock never leaks.

use super::pricing::{PricedLine, compute_totals};
use crate::db::models::{Customer, LineItem, LineItemRequest, Order, OrderView, Product};
use crate::db::repository::{
    CustomerRepository, OrderListQuery, OrderRepository, ProductRepository, strip_table_prefix,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::OrderStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// The acting user and the organization they operate in. Built by the
/// handler layer from the verified token and the request; nothing below it
/// reads ambient state.
#[derive(Debug, Clone)]
pub struct WorkflowCtx {
    pub actor: String,
    pub organization: String,
}

/// Payload for placing an order
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub customer: String,
    pub products: Vec<LineItemRequest>,
    pub payment_method: String,
    #[serde(default)]
    pub additional_discount_percent: f64,
}

/// Payload for editing an order's lines
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEdit {
    pub customer: String,
    pub products: Vec<LineItemRequest>,
    pub payment_method: String,
    #[serde(default)]
    pub additional_discount_percent: f64,
}

/// One page of the order listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage {
    pub orders: Vec<OrderView>,
    pub total_pages: u64,
    pub current_page: u64,
    pub total_orders: u64,
}

pub struct OrderWorkflow {
    ctx: WorkflowCtx,
    orders: OrderRepository,
    products: ProductRepository,
    customers: CustomerRepository,
}

impl OrderWorkflow {
    pub fn new(db: Surreal<Db>, ctx: WorkflowCtx) -> Self {
        Self {
            ctx,
            orders: OrderRepository::new(db.clone()),
            products: ProductRepository::new(db.clone()),
            customers: CustomerRepository::new(db),
        }
    }

    fn org_key(&self) -> &str {
        strip_table_prefix("organization", &self.ctx.organization)
    }

    fn assert_in_org(&self, record_org: &surrealdb::sql::Thing, code: ErrorCode) -> AppResult<()> {
        if record_org.id.to_raw() == self.org_key() {
            Ok(())
        } else {
            Err(AppError::new(code))
        }
    }

    /// Place an order: validate, reserve stock line by line, then persist.
    ///
    /// Reservation failure on line *k* releases lines 0..k before returning,
    /// so a rejected order leaves every quantity unchanged.
    pub async fn create_order(&self, payload: OrderCreate) -> AppResult<Order> {
        validate_lines(&payload.products)?;

        let customer = self.load_customer(&payload.customer).await?;

        let (line_items, priced) = self.reserve_lines(&payload.products).await?;

        let totals = compute_totals(&priced, payload.additional_discount_percent);
        let now = Utc::now();
        let order = Order {
            id: None,
            owner: self.ctx.actor.clone(),
            organization: surrealdb::sql::Thing::from(("organization", self.org_key())),
            customer: customer
                .id
                .clone()
                .ok_or_else(|| AppError::internal("Customer record has no id"))?,
            products: line_items.clone(),
            total_price: totals.total_price,
            initial_discounted_price: totals.initial_discounted_price,
            additional_discount_percent: payload.additional_discount_percent,
            final_discounted_price: totals.final_discounted_price,
            payment_method: payload.payment_method,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        match self.orders.create(order).await {
            Ok(created) => Ok(created),
            Err(e) => {
                self.release_lines(&line_items).await;
                Err(e.into())
            }
        }
    }

    /// Edit an order: return the old quantities to stock, reserve the new
    /// ones, and persist the recomputed totals. Any failure after the
    /// release re-reserves the old lines so stock and order stay consistent.
    pub async fn edit_order(&self, order_id: &str, payload: OrderEdit) -> AppResult<Order> {
        validate_lines(&payload.products)?;

        let existing = self.load_order(order_id).await?;
        let customer = self.load_customer(&payload.customer).await?;

        // Give back what the order currently holds
        self.release_lines(&existing.products).await;

        let (line_items, priced) = match self.reserve_lines(&payload.products).await {
            Ok(reserved) => reserved,
            Err(e) => {
                self.rereserve_lines(&existing.products).await;
                return Err(e);
            }
        };

        let totals = compute_totals(&priced, payload.additional_discount_percent);
        let updated = self
            .orders
            .update_lines(
                order_id,
                customer
                    .id
                    .clone()
                    .ok_or_else(|| AppError::internal("Customer record has no id"))?,
                line_items.clone(),
                totals.total_price,
                totals.initial_discounted_price,
                payload.additional_discount_percent,
                totals.final_discounted_price,
                payload.payment_method,
            )
            .await;

        match updated {
            Ok(Some(order)) => Ok(order),
            Ok(None) => {
                self.release_lines(&line_items).await;
                self.rereserve_lines(&existing.products).await;
                Err(AppError::new(ErrorCode::OrderNotFound))
            }
            Err(e) => {
                self.release_lines(&line_items).await;
                self.rereserve_lines(&existing.products).await;
                Err(e.into())
            }
        }
    }

    /// Overwrite the order status. No transition table: any status may
    /// follow any other, but the input must parse into [`OrderStatus`].
    pub async fn update_status(&self, order_id: &str, status: OrderStatus) -> AppResult<Order> {
        self.load_order(order_id).await?;
        self.orders
            .set_status(order_id, status)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))
    }

    pub async fn get_order(&self, order_id: &str) -> AppResult<Order> {
        self.load_order(order_id).await
    }

    /// Paginated, filtered listing of the organization's orders
    pub async fn list_orders(&self, query: OrderListQuery) -> AppResult<OrderPage> {
        let page = query.page.max(1);
        let limit = query.limit.max(1);
        let (orders, total_orders) = self.orders.list(&self.ctx.organization, &query).await?;
        Ok(OrderPage {
            orders,
            total_pages: total_orders.div_ceil(limit),
            current_page: page,
            total_orders,
        })
    }

    async fn load_order(&self, order_id: &str) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
        self.assert_in_org(&order.organization, ErrorCode::OrderNotFound)?;
        Ok(order)
    }

    async fn load_customer(&self, customer_id: &str) -> AppResult<Customer> {
        let customer = self
            .customers
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;
        self.assert_in_org(&customer.organization, ErrorCode::CustomerNotFound)?;
        Ok(customer)
    }

    async fn load_product(&self, product_id: &str) -> AppResult<Product> {
        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
        self.assert_in_org(&product.organization, ErrorCode::ProductNotFound)?;
        Ok(product)
    }

    /// Reserve stock for every requested line. On failure, everything
    /// reserved so far is released before the error returns.
    async fn reserve_lines(
        &self,
        requests: &[LineItemRequest],
    ) -> AppResult<(Vec<LineItem>, Vec<PricedLine>)> {
        let mut line_items = Vec::with_capacity(requests.len());
        let mut priced = Vec::with_capacity(requests.len());

        for request in requests {
            let product = match self.load_product(&request.product).await {
                Ok(p) => p,
                Err(e) => {
                    self.release_lines(&line_items).await;
                    return Err(e);
                }
            };

            let reserved = match self.products.try_reserve(&request.product, request.quantity).await
            {
                Ok(r) => r,
                Err(e) => {
                    self.release_lines(&line_items).await;
                    return Err(e.into());
                }
            };
            if reserved.is_none() {
                self.release_lines(&line_items).await;
                return Err(AppError::insufficient_stock(&product.name));
            }

            let unit_price = product.current_price();
            line_items.push(LineItem {
                product: product
                    .id
                    .clone()
                    .ok_or_else(|| AppError::internal("Product record has no id"))?,
                quantity: request.quantity,
                price: unit_price,
            });
            priced.push(PricedLine {
                quantity: request.quantity,
                unit_price,
                discount_percent: product.discount_percent,
            });
        }

        Ok((line_items, priced))
    }

    /// Return reserved quantities to stock. Failures are logged, not
    /// propagated: this runs on error paths that already carry an error.
    async fn release_lines(&self, lines: &[LineItem]) {
        for line in lines {
            if let Err(e) = self
                .products
                .release(&line.product.to_string(), line.quantity)
                .await
            {
                tracing::warn!(
                    product = %line.product,
                    quantity = line.quantity,
                    error = %e,
                    "Failed to release reserved stock"
                );
            }
        }
    }

    /// Take back quantities that were released at the start of an edit that
    /// subsequently failed. The stock was just released, so this normally
    /// succeeds; a concurrent claim in the window is logged.
    async fn rereserve_lines(&self, lines: &[LineItem]) {
        for line in lines {
            match self
                .products
                .try_reserve(&line.product.to_string(), line.quantity)
                .await
            {
                Ok(Some(_)) => {}
                Ok(None) => {
                    tracing::warn!(
                        product = %line.product,
                        quantity = line.quantity,
                        "Stock claimed concurrently while restoring an order edit"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        product = %line.product,
                        quantity = line.quantity,
                        error = %e,
                        "Failed to restore reserved stock"
                    );
                }
            }
        }
    }
}

fn validate_lines(lines: &[LineItemRequest]) -> AppResult<()> {
    if lines.is_empty() {
        return Err(AppError::validation("Order must contain at least one product"));
    }
    if lines.iter().any(|l| l.quantity <= 0) {
        return Err(AppError::validation("Quantity must be greater than zero"));
    }
    Ok(())
}
