//! Database models
//!
//! One module per table. Record links use `surrealdb::sql::Thing`; user ids
//! come from the external identity service and are stored as opaque strings.

pub mod customer;
pub mod membership;
pub mod order;
pub mod organization;
pub mod product;

pub use customer::{Address, Customer, CustomerCreate, CustomerUpdate};
pub use membership::Membership;
pub use order::{CustomerSummary, LineItem, LineItemRequest, Order, OrderView, ProductSummary};
pub use organization::Organization;
pub use product::{PricePoint, Product, ProductCreate, ProductUpdate};
