//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error with a structured error code
///
/// The primary error type for the backend. Every business failure is one of
/// the closed [`ErrorCode`] variants; the HTTP boundary maps the variant to a
/// status code and shapes it into the uniform error envelope.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level error strings
    pub errors: Vec<String>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            errors: Vec::new(),
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Append a field-level error string
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::NotFound, msg)
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::Conflict, msg)
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create an insufficient stock error
    pub fn insufficient_stock(product_name: &str) -> Self {
        Self::with_message(
            ErrorCode::InsufficientStock,
            format!("Insufficient stock for {}", product_name),
        )
    }

    /// Create an upload error
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::UploadFailed, msg)
    }

    /// Create a mail error
    pub fn mail(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::MailFailed, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a not authenticated error
    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create an invalid token error
    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    /// Create a token expired error
    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }
}

/// Uniform success envelope
///
/// `{statusCode, data, message, success}` — `success` is true exactly when
/// `statusCode < 400`, matching the observable contract of the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
    pub success: bool,
}

impl<T> ApiResponse<T> {
    /// 200 response with data and message
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            data: Some(data),
            message: message.into(),
            success: true,
        }
    }

    /// 201 response with data and message
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: 201,
            data: Some(data),
            message: message.into(),
            success: true,
        }
    }
}

/// Uniform error envelope
///
/// `{statusCode, message, success: false, errors: []}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub message: String,
    pub success: bool,
    pub errors: Vec<String>,
}

impl ErrorResponse {
    /// Build the error envelope from an AppError
    pub fn from_error(err: &AppError) -> Self {
        Self {
            status_code: err.http_status().as_u16(),
            message: err.message.clone(),
            success: false,
            errors: err.errors.clone(),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ErrorResponse::from_error(&self);

        // Log system errors; business failures are the caller's problem
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::OrderNotFound);
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(err.message, "Order Not Found");
        assert!(err.errors.is_empty());
    }

    #[test]
    fn test_app_error_with_message() {
        let err = AppError::with_message(ErrorCode::ValidationFailed, "Name and Slug are required");
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "Name and Slug are required");
    }

    #[test]
    fn test_insufficient_stock_message() {
        let err = AppError::insufficient_stock("Widget");
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.message, "Insufficient stock for Widget");
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_envelope_shape() {
        let err = AppError::permission_denied("Admins cannot remove Owners")
            .with_error("role hierarchy");
        let body = ErrorResponse::from_error(&err);
        assert_eq!(body.status_code, 403);
        assert!(!body.success);
        assert_eq!(body.errors, vec!["role hierarchy".to_string()]);

        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"statusCode\":403"));
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("\"errors\":[\"role hierarchy\"]"));
    }

    #[test]
    fn test_success_envelope_shape() {
        let response = ApiResponse::ok(42, "Order Created Successfully");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"statusCode\":200"));
        assert!(json.contains("\"data\":42"));
        assert!(json.contains("\"message\":\"Order Created Successfully\""));
        assert!(json.contains("\"success\":true"));
    }

    #[test]
    fn test_created_envelope() {
        let response = ApiResponse::created("org", "Organization created successfully");
        assert_eq!(response.status_code, 201);
        assert!(response.success);
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::NotFound, "Order not found");
        assert_eq!(format!("{}", err), "Order not found");
    }
}
