//! Organization API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/organizations", organization_routes())
}

fn organization_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_mine).post(handler::create))
        .route("/join", post(handler::join))
        .route(
            "/{id}/members",
            get(handler::list_members).post(handler::add_member),
        )
        .route(
            "/{id}/members/{member_id}",
            axum::routing::delete(handler::remove_member),
        )
}
