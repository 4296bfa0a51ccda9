//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::OrganizationNotFound
            | Self::InviteCodeInvalid
            | Self::MembershipNotFound
            | Self::OrderNotFound
            | Self::ProductNotFound
            | Self::CustomerNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::Conflict
            | Self::SlugExists
            | Self::MembershipExists
            | Self::CustomerExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            // 403 Forbidden
            Self::PermissionDenied | Self::NotOrganizationMember => StatusCode::FORBIDDEN,

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::UploadFailed
            | Self::MailFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (validation and business rule errors)
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InsufficientStock
            | Self::InvalidPrice => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::OrderNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::InviteCodeInvalid.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(ErrorCode::SlugExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::MembershipExists.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(ErrorCode::CustomerExists.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_forbidden_status() {
        assert_eq!(
            ErrorCode::PermissionDenied.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ErrorCode::NotOrganizationMember.http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_bad_request_status() {
        assert_eq!(
            ErrorCode::InsufficientStock.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_error_status() {
        assert_eq!(
            ErrorCode::UploadFailed.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::MailFailed.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
