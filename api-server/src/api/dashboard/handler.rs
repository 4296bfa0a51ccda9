//! Dashboard API Handlers
//!
//! Read-only rollups over the organization's data. Monthly trends are
//! aggregated in Rust over the full history, which is small enough per
//! organization that this beats pushing datetime math into the query layer.

use axum::extract::State;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::api::OrgScope;
use crate::auth::CurrentActor;
use crate::core::ServerState;
use crate::db::models::OrderView;
use crate::db::repository::{OrderRepository, make_thing};
use shared::ApiResponse;
use shared::error::{AppError, AppResult};
use shared::models::OrderStatus;

const RECENT_ORDER_COUNT: u64 = 5;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub month: &'static str,
    pub value: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersByStatus {
    pub pending: u64,
    pub completed: u64,
    pub cancelled: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_customers: u64,
    pub total_products: u64,
    pub total_orders: u64,
    /// Sum of final discounted prices over all orders
    pub total_revenue: f64,
    pub orders_by_status: OrdersByStatus,
    pub low_stock_count: u64,
    pub recent_orders: Vec<OrderView>,
    /// Revenue per month of the current year
    pub monthly_sales: Vec<TrendPoint>,
    /// New customers per month of the current year
    pub monthly_customers: Vec<TrendPoint>,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct CreatedAtRow {
    created_at: DateTime<Utc>,
}

/// GET /api/v1/dashboard/stats
pub async fn stats(
    State(state): State<ServerState>,
    actor: CurrentActor,
    org: OrgScope,
) -> AppResult<ApiResponse<DashboardStats>> {
    state.membership().require_member(&actor.id, &org.0).await?;

    let db = state.get_db();
    let org_thing = make_thing("organization", &org.0);

    let mut counts = db
        .query("SELECT count() AS count FROM customer WHERE organization = $org GROUP ALL")
        .query(
            "SELECT count() AS count FROM product
             WHERE organization = $org AND is_deleted = false GROUP ALL",
        )
        .query(
            "SELECT count() AS count FROM product
             WHERE organization = $org AND is_deleted = false
               AND quantity <= low_stock_threshold GROUP ALL",
        )
        .query("SELECT created_at FROM customer WHERE organization = $org")
        .bind(("org", org_thing))
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let total_customers = take_count(&mut counts, 0)?;
    let total_products = take_count(&mut counts, 1)?;
    let low_stock_count = take_count(&mut counts, 2)?;
    let customer_dates: Vec<CreatedAtRow> = counts
        .take(3)
        .map_err(|e| AppError::database(e.to_string()))?;

    let order_repo = OrderRepository::new(db);
    let orders = order_repo.find_all_for_organization(&org.0).await?;
    let recent_orders = order_repo.recent(&org.0, RECENT_ORDER_COUNT).await?;

    let total_orders = orders.len() as u64;
    let total_revenue: f64 = orders.iter().map(|o| o.final_discounted_price).sum();
    let orders_by_status = OrdersByStatus {
        pending: count_status(&orders, OrderStatus::Pending),
        completed: count_status(&orders, OrderStatus::Completed),
        cancelled: count_status(&orders, OrderStatus::Cancelled),
    };

    let current_year = Utc::now().year();
    let monthly_sales = monthly_trend(
        orders
            .iter()
            .filter(|o| o.created_at.year() == current_year)
            .map(|o| (o.created_at.month0() as usize, o.final_discounted_price)),
    );
    let monthly_customers = monthly_trend(
        customer_dates
            .iter()
            .filter(|c| c.created_at.year() == current_year)
            .map(|c| (c.created_at.month0() as usize, 1.0)),
    );

    Ok(ApiResponse::ok(
        DashboardStats {
            total_customers,
            total_products,
            total_orders,
            total_revenue,
            orders_by_status,
            low_stock_count,
            recent_orders,
            monthly_sales,
            monthly_customers,
        },
        "Dashboard stats fetched successfully",
    ))
}

fn take_count(response: &mut surrealdb::Response, index: usize) -> AppResult<u64> {
    let rows: Vec<CountRow> = response
        .take(index)
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(rows.first().map(|c| c.count).unwrap_or(0))
}

fn count_status(orders: &[crate::db::models::Order], status: OrderStatus) -> u64 {
    orders.iter().filter(|o| o.status == status).count() as u64
}

/// Sum values into one bucket per month, January through December
fn monthly_trend(points: impl Iterator<Item = (usize, f64)>) -> Vec<TrendPoint> {
    let mut buckets = [0.0f64; 12];
    for (month, value) in points {
        if month < 12 {
            buckets[month] += value;
        }
    }
    MONTHS
        .iter()
        .zip(buckets)
        .map(|(month, value)| TrendPoint { month, value })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_trend_buckets() {
        let points = vec![(0, 100.0), (0, 50.0), (11, 25.0)];
        let trend = monthly_trend(points.into_iter());
        assert_eq!(trend.len(), 12);
        assert_eq!(trend[0].month, "January");
        assert_eq!(trend[0].value, 150.0);
        assert_eq!(trend[11].value, 25.0);
        assert_eq!(trend[5].value, 0.0);
    }
}
