//! Product catalog tests: listing filters and the image upload contract

use api_server::core::ServerState;
use api_server::db::models::{PricePoint, Product};
use api_server::db::repository::{ProductListQuery, ProductRepository, make_thing};
use api_server::routes::build_app;
use api_server::services::MemoryImageStore;
use axum::body::Body;
use chrono::Utc;
use http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

async fn setup_org(state: &ServerState) -> String {
    let org = state
        .membership()
        .create_organization("user-1", "Acme", "acme")
        .await
        .expect("organization");
    org.id.unwrap().to_string()
}

fn sample_product(org_id: &str, name: &str, description: &str, category: &str) -> Product {
    let now = Utc::now();
    Product {
        id: None,
        owner: "user-1".to_string(),
        organization: make_thing("organization", org_id),
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        supplier: None,
        price: vec![PricePoint {
            date: now,
            price: 10.0,
        }],
        quantity: 5,
        discount_percent: 0.0,
        low_stock_threshold: 2,
        status: Default::default(),
        is_deleted: false,
        sku: "SKU-1".to_string(),
        cover_img: String::new(),
        photos: vec![],
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn search_matches_name_description_and_category() {
    let state = ServerState::for_tests().await.expect("state");
    let org_id = setup_org(&state).await;
    let repo = ProductRepository::new(state.get_db());

    repo.create(sample_product(
        &org_id,
        "Widget",
        "A sturdy brass fastener",
        "Hardware",
    ))
    .await
    .expect("product");
    repo.create(sample_product(&org_id, "Gizmo", "Plastic housing", "Hardware"))
        .await
        .expect("product");

    let (found, total) = repo
        .list(
            &org_id,
            &ProductListQuery {
                search: Some("brass".to_string()),
                page: 1,
                limit: 10,
                ..Default::default()
            },
        )
        .await
        .expect("list");
    assert_eq!(total, 1);
    assert_eq!(found[0].name, "Widget");

    let (_, by_category) = repo
        .list(
            &org_id,
            &ProductListQuery {
                search: Some("hardware".to_string()),
                page: 1,
                limit: 10,
                ..Default::default()
            },
        )
        .await
        .expect("list");
    assert_eq!(by_category, 2);
}

#[tokio::test]
async fn failed_cover_upload_aborts_product_creation() {
    let mut state = ServerState::for_tests().await.expect("state");
    state.image_store = Arc::new(MemoryImageStore::failing());
    let token = state
        .jwt_service()
        .generate_token("user-1", "user1@example.com")
        .expect("token");
    let org_id = setup_org(&state).await;
    let db = state.get_db();
    let app = build_app(state);

    let payload = serde_json::json!({
        "name": "Widget",
        "description": "A sturdy brass fastener",
        "category": "Hardware",
        "price": 10.0,
        "quantity": 5,
        "low_stock_threshold": 2,
        "cover_img_path": "/tmp/widget.png"
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/products")
                .header("authorization", format!("Bearer {token}"))
                .header("x-organization-id", &org_id)
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // Nothing was persisted
    let repo = ProductRepository::new(db);
    let (products, total) = repo
        .list(
            &org_id,
            &ProductListQuery {
                page: 1,
                limit: 10,
                ..Default::default()
            },
        )
        .await
        .expect("list");
    assert_eq!(total, 0);
    assert!(products.is_empty());
}
