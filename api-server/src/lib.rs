//! Multi-tenant inventory and order backend
//!
//! Axum HTTP API over an embedded SurrealDB store. Organizations scope all
//! data; the order workflow owns every stock movement.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod routes;
pub mod services;
pub mod tenancy;
pub mod utils;

pub use crate::core::{Config, Server, ServerState};
