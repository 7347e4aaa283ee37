//! User roles and role assignments.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::FranchiseId;

/// A role a user can hold.
///
/// `Diner` is the default role assigned on registration. `Franchisee` roles
/// are scoped to one franchise via [`RoleAssignment::object_id`]. `Admin` is
/// unscoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Diner,
    Franchisee,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Diner => "diner",
            Self::Franchisee => "franchisee",
            Self::Admin => "admin",
        };
        f.write_str(name)
    }
}

/// A role attached to a user, optionally scoped to an owned object.
///
/// Only `franchisee` assignments carry an `objectId` (the owned franchise).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub role: Role,
    #[serde(
        rename = "objectId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub object_id: Option<FranchiseId>,
}

impl RoleAssignment {
    /// An unscoped assignment of `role`.
    #[must_use]
    pub const fn unscoped(role: Role) -> Self {
        Self {
            role,
            object_id: None,
        }
    }

    /// A franchisee assignment scoped to `franchise_id`.
    #[must_use]
    pub const fn franchisee(franchise_id: FranchiseId) -> Self {
        Self {
            role: Role::Franchisee,
            object_id: Some(franchise_id),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"diner\"").unwrap();
        assert_eq!(role, Role::Diner);
    }

    #[test]
    fn test_assignment_with_object_id() {
        let json = r#"{"role":"franchisee","objectId":"1"}"#;
        let assignment: RoleAssignment = serde_json::from_str(json).unwrap();
        assert_eq!(assignment.role, Role::Franchisee);
        assert_eq!(assignment.object_id, Some(FranchiseId::new("1")));
    }

    #[test]
    fn test_assignment_object_id_accepts_number() {
        let json = r#"{"role":"franchisee","objectId":1}"#;
        let assignment: RoleAssignment = serde_json::from_str(json).unwrap();
        assert_eq!(assignment.object_id, Some(FranchiseId::new("1")));
    }

    #[test]
    fn test_assignment_without_object_id() {
        let json = r#"{"role":"diner"}"#;
        let assignment: RoleAssignment = serde_json::from_str(json).unwrap();
        assert_eq!(assignment.object_id, None);

        let back = serde_json::to_string(&assignment).unwrap();
        assert_eq!(back, r#"{"role":"diner"}"#);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Franchisee.to_string(), "franchisee");
    }
}
