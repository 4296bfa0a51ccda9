//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 3xxx: Organization/membership errors
/// - 4xxx: Order errors
/// - 5xxx: Product errors
/// - 6xxx: Customer errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Organization/membership errors (3xxx)
    Organization,
    /// Order errors (4xxx)
    Order,
    /// Product errors (5xxx)
    Product,
    /// Customer errors (6xxx)
    Customer,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Organization,
            4000..5000 => Self::Order,
            5000..6000 => Self::Product,
            6000..7000 => Self::Customer,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Organization => "organization",
            Self::Order => "order",
            Self::Product => "product",
            Self::Customer => "customer",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(2), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2002), ErrorCategory::Permission);
        assert_eq!(ErrorCategory::from_code(3003), ErrorCategory::Organization);
        assert_eq!(ErrorCategory::from_code(4002), ErrorCategory::Order);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Product);
        assert_eq!(ErrorCategory::from_code(6002), ErrorCategory::Customer);
        assert_eq!(ErrorCategory::from_code(9003), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::InsufficientStock.category(), ErrorCategory::Order);
        assert_eq!(ErrorCode::UploadFailed.category(), ErrorCategory::System);
        assert_eq!(
            ErrorCode::NotOrganizationMember.category(),
            ErrorCategory::Permission
        );
    }
}
