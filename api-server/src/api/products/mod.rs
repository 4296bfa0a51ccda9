//! Product API module

mod handler;

use axum::{
    Router,
    routing::{get, patch, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/products", product_routes())
}

fn product_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/categories", get(handler::categories))
        .route("/suppliers", get(handler::suppliers))
        .route("/price/{id}", put(handler::update_price))
        .route("/{id}", put(handler::update).delete(handler::toggle_deleted))
        .route("/{id}/status", patch(handler::toggle_status))
        .route("/{id}/cover", put(handler::update_cover))
        .route("/{id}/photos", put(handler::add_photos))
}
