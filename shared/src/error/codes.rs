//! Unified error codes for the inventory backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Organization/membership errors
//! - 4xxx: Order errors
//! - 5xxx: Product errors
//! - 6xxx: Customer errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// This is the closed set of business failure variants; every error the
/// service can surface maps to exactly one of these, and the HTTP boundary
/// maps each to a status code (see `http.rs`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    Conflict = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1002,
    /// Token is invalid
    TokenInvalid = 1003,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Caller is not a member of the organization
    NotOrganizationMember = 2002,

    // ==================== 3xxx: Organization / Membership ====================
    /// Organization not found
    OrganizationNotFound = 3001,
    /// Slug already taken
    SlugExists = 3002,
    /// Invite code does not match any organization
    InviteCodeInvalid = 3003,
    /// Membership already exists for (user, organization)
    MembershipExists = 3004,
    /// Membership not found
    MembershipNotFound = 3005,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Requested quantity exceeds current stock
    InsufficientStock = 4002,

    // ==================== 5xxx: Product ====================
    /// Product not found
    ProductNotFound = 5001,
    /// Price must be a positive number
    InvalidPrice = 5002,

    // ==================== 6xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 6001,
    /// Customer with this email or phone already exists
    CustomerExists = 6002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Upload to the image store failed
    UploadFailed = 9003,
    /// Outbound mail failed
    MailFailed = 9004,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::Unknown => "Internal Server Error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::Conflict => "Resource already exists",
            Self::InvalidRequest => "Invalid request",

            Self::NotAuthenticated => "Unauthorized request",
            Self::TokenExpired => "Token expired",
            Self::TokenInvalid => "Invalid Access Token",

            Self::PermissionDenied => "Permission denied",
            Self::NotOrganizationMember => "You are not a member of this organization",

            Self::OrganizationNotFound => "Organization not found",
            Self::SlugExists => "Organization with this slug already exists",
            Self::InviteCodeInvalid => "Invalid Invite Code",
            Self::MembershipExists => "User is already a member of this organization",
            Self::MembershipNotFound => "Member not found in this organization",

            Self::OrderNotFound => "Order Not Found",
            Self::InsufficientStock => "Insufficient stock",

            Self::ProductNotFound => "Product Not Found",
            Self::InvalidPrice => "Invalid Price. Please provide a valid number.",

            Self::CustomerNotFound => "Customer Not Found",
            Self::CustomerExists => "Customer Already Exists",

            Self::InternalError => "Internal Server Error",
            Self::DatabaseError => "Database error",
            Self::UploadFailed => "Upload failed",
            Self::MailFailed => "Failed to send email",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code.code()
    }
}

/// Error returned when a u16 does not correspond to a known error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::Conflict),
            5 => Ok(Self::InvalidRequest),
            1001 => Ok(Self::NotAuthenticated),
            1002 => Ok(Self::TokenExpired),
            1003 => Ok(Self::TokenInvalid),
            2001 => Ok(Self::PermissionDenied),
            2002 => Ok(Self::NotOrganizationMember),
            3001 => Ok(Self::OrganizationNotFound),
            3002 => Ok(Self::SlugExists),
            3003 => Ok(Self::InviteCodeInvalid),
            3004 => Ok(Self::MembershipExists),
            3005 => Ok(Self::MembershipNotFound),
            4001 => Ok(Self::OrderNotFound),
            4002 => Ok(Self::InsufficientStock),
            5001 => Ok(Self::ProductNotFound),
            5002 => Ok(Self::InvalidPrice),
            6001 => Ok(Self::CustomerNotFound),
            6002 => Ok(Self::CustomerExists),
            9001 => Ok(Self::InternalError),
            9002 => Ok(Self::DatabaseError),
            9003 => Ok(Self::UploadFailed),
            9004 => Ok(Self::MailFailed),
            other => Err(InvalidErrorCode(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::NotOrganizationMember,
            ErrorCode::InsufficientStock,
            ErrorCode::MailFailed,
        ] {
            let n = code.code();
            assert_eq!(ErrorCode::try_from(n), Ok(code));
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert_eq!(ErrorCode::try_from(7777), Err(InvalidErrorCode(7777)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::InsufficientStock).unwrap();
        assert_eq!(json, "4002");
        let code: ErrorCode = serde_json::from_str("2002").unwrap();
        assert_eq!(code, ErrorCode::NotOrganizationMember);
    }
}
