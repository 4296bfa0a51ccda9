//! Unified error system
//!
//! - [`ErrorCode`]: closed set of error variants, serialized as u16
//! - [`ErrorCategory`]: classification by code range (used for log routing)
//! - [`AppError`]: error type carrying code + message + field errors
//! - [`ApiResponse`] / [`ErrorResponse`]: the uniform HTTP envelope
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ErrorResponse};
//!
//! let err = AppError::with_message(ErrorCode::ValidationFailed, "Customer is Required");
//! let body = ErrorResponse::from_error(&err);
//! assert_eq!(body.status_code, 400);
//! assert!(!body.success);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult, ErrorResponse};
