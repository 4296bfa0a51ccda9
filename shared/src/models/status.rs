//! Lifecycle status enums

use serde::{Deserialize, Serialize};
use std::fmt;

/// Membership status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MembershipStatus {
    Pending,
    Active,
}

impl Default for MembershipStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// Order status
///
/// No transition table is enforced: any status may follow any other. The
/// payload is still parsed into this closed enum so arbitrary strings are
/// rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product status (distinct from the `is_deleted` soft-delete flag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductStatus {
    Active,
    Inactive,
}

impl Default for ProductStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl ProductStatus {
    /// Toggle Active <-> Inactive
    pub fn toggled(&self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(MembershipStatus::default(), MembershipStatus::Active);
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(ProductStatus::default(), ProductStatus::Active);
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(ProductStatus::Active.toggled(), ProductStatus::Inactive);
        assert_eq!(ProductStatus::Inactive.toggled(), ProductStatus::Active);
    }

    #[test]
    fn test_order_status_serde() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Cancelled).unwrap(),
            "\"Cancelled\""
        );
        assert!(serde_json::from_str::<OrderStatus>("\"Shipped\"").is_err());
    }
}
