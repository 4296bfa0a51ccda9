//! API Module
//!
//! One module per resource, each exposing a `router()`.

pub mod customers;
pub mod dashboard;
pub mod extract;
pub mod health;
pub mod orders;
pub mod organizations;
pub mod products;

pub use extract::OrgScope;
