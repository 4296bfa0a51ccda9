//! Order workflow tests over an in-memory database

use api_server::core::ServerState;
use api_server::db::models::{Customer, CustomerCreate, LineItemRequest, PricePoint, Product};
use api_server::db::repository::ProductRepository;
use api_server::orders::{OrderCreate, OrderEdit, OrderWorkflow, WorkflowCtx};
use chrono::Utc;
use shared::error::ErrorCode;
use shared::models::ProductStatus;

const EPSILON: f64 = 1e-9;

struct Fixture {
    state: ServerState,
    org_id: String,
    customer_id: String,
    product_id: String,
}

async fn setup() -> Fixture {
    setup_with_product(100.0, 10.0, 10).await
}

async fn setup_with_product(price: f64, discount_percent: f64, quantity: i64) -> Fixture {
    let state = ServerState::for_tests().await.expect("state");
    let org = state
        .membership()
        .create_organization("user-1", "Acme", "acme")
        .await
        .expect("organization");
    let org_id = org.id.clone().unwrap().to_string();
    let org_thing = api_server::db::repository::make_thing("organization", &org_id);

    let customer_repo = api_server::db::repository::CustomerRepository::new(state.get_db());
    let customer = customer_repo
        .create(Customer::from_create(
            "user-1".to_string(),
            org_thing.clone(),
            CustomerCreate {
                first_name: "Jane".to_string(),
                last_name: Some("Doe".to_string()),
                email: "jane@example.com".to_string(),
                phone_number: "555-0100".to_string(),
                address: None,
                company_name: Some("Doe Trading".to_string()),
            },
        ))
        .await
        .expect("customer");
    let customer_id = customer.id.unwrap().to_string();

    let now = Utc::now();
    let product_repo = ProductRepository::new(state.get_db());
    let product = product_repo
        .create(Product {
            id: None,
            owner: "user-1".to_string(),
            organization: org_thing,
            name: "Widget".to_string(),
            description: String::new(),
            category: "Gadgets".to_string(),
            supplier: None,
            price: vec![PricePoint { date: now, price }],
            quantity,
            discount_percent,
            low_stock_threshold: 2,
            status: ProductStatus::Active,
            is_deleted: false,
            sku: "WID-1".to_string(),
            cover_img: String::new(),
            photos: vec![],
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("product");
    let product_id = product.id.unwrap().to_string();

    Fixture {
        state,
        org_id,
        customer_id,
        product_id,
    }
}

fn workflow(f: &Fixture) -> OrderWorkflow {
    OrderWorkflow::new(
        f.state.get_db(),
        WorkflowCtx {
            actor: "user-1".to_string(),
            organization: f.org_id.clone(),
        },
    )
}

async fn stock(f: &Fixture) -> i64 {
    ProductRepository::new(f.state.get_db())
        .find_by_id(&f.product_id)
        .await
        .expect("query")
        .expect("product")
        .quantity
}

#[tokio::test]
async fn create_order_computes_totals_and_decrements_stock() {
    let f = setup().await;
    let wf = workflow(&f);

    let order = wf
        .create_order(OrderCreate {
            customer: f.customer_id.clone(),
            products: vec![LineItemRequest {
                product: f.product_id.clone(),
                quantity: 3,
            }],
            payment_method: "card".to_string(),
            additional_discount_percent: 0.0,
        })
        .await
        .expect("order");

    assert!((order.total_price - 300.0).abs() < EPSILON);
    assert!((order.initial_discounted_price - 270.0).abs() < EPSILON);
    assert!((order.final_discounted_price - 270.0).abs() < EPSILON);
    assert_eq!(order.products[0].price, 100.0);
    assert_eq!(stock(&f).await, 7);
}

#[tokio::test]
async fn insufficient_stock_leaves_quantity_unchanged() {
    let f = setup().await;
    let wf = workflow(&f);

    let err = wf
        .create_order(OrderCreate {
            customer: f.customer_id.clone(),
            products: vec![LineItemRequest {
                product: f.product_id.clone(),
                quantity: 11,
            }],
            payment_method: "card".to_string(),
            additional_discount_percent: 0.0,
        })
        .await
        .expect_err("should fail");

    assert_eq!(err.code, ErrorCode::InsufficientStock);
    assert_eq!(err.message, "Insufficient stock for Widget");
    assert_eq!(stock(&f).await, 10);
}

#[tokio::test]
async fn order_level_discount_applies_after_line_discounts() {
    let f = setup().await;
    let wf = workflow(&f);

    let order = wf
        .create_order(OrderCreate {
            customer: f.customer_id.clone(),
            products: vec![LineItemRequest {
                product: f.product_id.clone(),
                quantity: 3,
            }],
            payment_method: "cash".to_string(),
            additional_discount_percent: 10.0,
        })
        .await
        .expect("order");

    assert!((order.final_discounted_price - 243.0).abs() < EPSILON);
}

#[tokio::test]
async fn edit_with_same_lines_has_zero_net_stock_delta() {
    let f = setup().await;
    let wf = workflow(&f);

    let order = wf
        .create_order(OrderCreate {
            customer: f.customer_id.clone(),
            products: vec![LineItemRequest {
                product: f.product_id.clone(),
                quantity: 4,
            }],
            payment_method: "card".to_string(),
            additional_discount_percent: 0.0,
        })
        .await
        .expect("order");
    assert_eq!(stock(&f).await, 6);

    let order_id = order.id.unwrap().to_string();
    wf.edit_order(
        &order_id,
        OrderEdit {
            customer: f.customer_id.clone(),
            products: vec![LineItemRequest {
                product: f.product_id.clone(),
                quantity: 4,
            }],
            payment_method: "card".to_string(),
            additional_discount_percent: 0.0,
        },
    )
    .await
    .expect("edit");

    assert_eq!(stock(&f).await, 6);
}

#[tokio::test]
async fn edit_to_smaller_quantity_releases_the_difference() {
    let f = setup().await;
    let wf = workflow(&f);

    let order = wf
        .create_order(OrderCreate {
            customer: f.customer_id.clone(),
            products: vec![LineItemRequest {
                product: f.product_id.clone(),
                quantity: 6,
            }],
            payment_method: "card".to_string(),
            additional_discount_percent: 0.0,
        })
        .await
        .expect("order");
    assert_eq!(stock(&f).await, 4);

    let order_id = order.id.unwrap().to_string();
    let edited = wf
        .edit_order(
            &order_id,
            OrderEdit {
                customer: f.customer_id.clone(),
                products: vec![LineItemRequest {
                    product: f.product_id.clone(),
                    quantity: 2,
                }],
                payment_method: "card".to_string(),
                additional_discount_percent: 0.0,
            },
        )
        .await
        .expect("edit");

    assert_eq!(stock(&f).await, 8);
    assert!((edited.total_price - 200.0).abs() < EPSILON);
}

#[tokio::test]
async fn failed_edit_restores_order_and_stock() {
    let f = setup().await;
    let wf = workflow(&f);

    let order = wf
        .create_order(OrderCreate {
            customer: f.customer_id.clone(),
            products: vec![LineItemRequest {
                product: f.product_id.clone(),
                quantity: 4,
            }],
            payment_method: "card".to_string(),
            additional_discount_percent: 0.0,
        })
        .await
        .expect("order");
    assert_eq!(stock(&f).await, 6);

    // 4 held by the order + 6 free < 11 requested
    let order_id = order.id.unwrap().to_string();
    let err = wf
        .edit_order(
            &order_id,
            OrderEdit {
                customer: f.customer_id.clone(),
                products: vec![LineItemRequest {
                    product: f.product_id.clone(),
                    quantity: 11,
                }],
                payment_method: "card".to_string(),
                additional_discount_percent: 0.0,
            },
        )
        .await
        .expect_err("should fail");

    assert_eq!(err.code, ErrorCode::InsufficientStock);
    assert_eq!(stock(&f).await, 6);

    let unchanged = wf.get_order(&order_id).await.expect("order");
    assert_eq!(unchanged.products[0].quantity, 4);
    assert!((unchanged.total_price - 400.0).abs() < EPSILON);
}

#[tokio::test]
async fn price_history_keeps_three_entries_newest_first() {
    let f = setup().await;
    let repo = ProductRepository::new(f.state.get_db());

    for price in [110.0, 120.0, 130.0] {
        repo.update_price(&f.product_id, price)
            .await
            .expect("update")
            .expect("product");
    }

    let product = repo
        .find_by_id(&f.product_id)
        .await
        .expect("query")
        .expect("product");
    assert_eq!(product.price.len(), 3);
    assert_eq!(product.current_price(), 130.0);
    assert_eq!(product.price[1].price, 120.0);
    assert_eq!(product.price[2].price, 110.0);
}

#[tokio::test]
async fn unchanged_price_is_not_prepended() {
    let f = setup().await;
    let repo = ProductRepository::new(f.state.get_db());

    let product = repo
        .update_price(&f.product_id, 100.0)
        .await
        .expect("update")
        .expect("product");
    assert_eq!(product.price.len(), 1);
    assert_eq!(product.current_price(), 100.0);
}

#[tokio::test]
async fn order_snapshots_price_at_creation() {
    let f = setup().await;
    let wf = workflow(&f);
    let repo = ProductRepository::new(f.state.get_db());

    let order = wf
        .create_order(OrderCreate {
            customer: f.customer_id.clone(),
            products: vec![LineItemRequest {
                product: f.product_id.clone(),
                quantity: 1,
            }],
            payment_method: "card".to_string(),
            additional_discount_percent: 0.0,
        })
        .await
        .expect("order");

    repo.update_price(&f.product_id, 500.0)
        .await
        .expect("update")
        .expect("product");

    let order_id = order.id.unwrap().to_string();
    let reread = wf.get_order(&order_id).await.expect("order");
    assert_eq!(reread.products[0].price, 100.0);
}

#[tokio::test]
async fn list_orders_counts_the_filtered_set() {
    let f = setup().await;
    let wf = workflow(&f);

    for _ in 0..3 {
        wf.create_order(OrderCreate {
            customer: f.customer_id.clone(),
            products: vec![LineItemRequest {
                product: f.product_id.clone(),
                quantity: 1,
            }],
            payment_method: "card".to_string(),
            additional_discount_percent: 0.0,
        })
        .await
        .expect("order");
    }

    let page = wf
        .list_orders(api_server::db::repository::OrderListQuery {
            page: 1,
            limit: 2,
            ..Default::default()
        })
        .await
        .expect("list");

    assert_eq!(page.total_orders, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.orders.len(), 2);
    assert_eq!(page.orders[0].customer_details.first_name, "Jane");

    // Search that matches no customer yields an empty, correctly counted set
    let empty = wf
        .list_orders(api_server::db::repository::OrderListQuery {
            search: Some("nobody".to_string()),
            page: 1,
            limit: 2,
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(empty.total_orders, 0);
    assert!(empty.orders.is_empty());
}
