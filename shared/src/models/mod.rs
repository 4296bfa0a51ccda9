//! Domain enums shared between the repositories and the HTTP layer

mod role;
mod status;

pub use role::Role;
pub use status::{MembershipStatus, OrderStatus, ProductStatus};
