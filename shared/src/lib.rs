//! Shared types for the inventory backend
//!
//! Error taxonomy, the uniform API envelope, and the domain enums used by
//! both the repositories and the HTTP layer.

pub mod error;
pub mod models;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode, ErrorResponse};
pub use models::{MembershipStatus, OrderStatus, ProductStatus, Role};
