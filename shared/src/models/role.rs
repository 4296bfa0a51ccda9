//! Membership roles

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a user inside an organization
///
/// Serialized with the capitalized names the frontend expects
/// ("Owner", "Admin", "Member", "Viewer").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Owner,
    Admin,
    Member,
    Viewer,
}

impl Role {
    /// Owner and Admin may manage members and other org-level settings
    pub fn is_manager(&self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "Owner",
            Self::Admin => "Admin",
            Self::Member => "Member",
            Self::Viewer => "Viewer",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Member
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_roles() {
        assert!(Role::Owner.is_manager());
        assert!(Role::Admin.is_manager());
        assert!(!Role::Member.is_manager());
        assert!(!Role::Viewer.is_manager());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Role::Owner).unwrap(), "\"Owner\"");
        let role: Role = serde_json::from_str("\"Viewer\"").unwrap();
        assert_eq!(role, Role::Viewer);
    }
}
