//! Two-step close confirmations.
//!
//! Closing a franchise or a store is destructive, so it takes two clicks:
//! the first opens a confirmation view naming the target, the second
//! performs the DELETE. The flow is three explicit states,
//!
//! ```text
//! Idle -> Confirming(target) -> Idle
//! ```
//!
//! with the `Confirming` half represented by a [`PendingClose`] value in
//! the session. Cancel and confirm are symmetric: both drop the slot, and
//! only a confirm whose target matches the slot issues the DELETE. A
//! confirm that arrives with no matching slot (stale form, crafted
//! request) is bounced back to the dashboard without any network call.

use serde::{Deserialize, Serialize};

use jwt_pizza_core::{FranchiseId, StoreId};

/// The target of a pending close confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingClose {
    Franchise {
        id: FranchiseId,
        name: String,
    },
    Store {
        franchise_id: FranchiseId,
        id: StoreId,
        name: String,
    },
}

impl PendingClose {
    /// The display name shown on the confirmation view.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Franchise { name, .. } | Self::Store { name, .. } => name,
        }
    }

    /// Whether this slot authorizes closing franchise `id`.
    #[must_use]
    pub fn authorizes_franchise(&self, id: &FranchiseId) -> bool {
        matches!(self, Self::Franchise { id: pending, .. } if pending == id)
    }

    /// Whether this slot authorizes closing store `store_id` under
    /// `franchise_id`.
    #[must_use]
    pub fn authorizes_store(&self, franchise_id: &FranchiseId, store_id: &StoreId) -> bool {
        matches!(
            self,
            Self::Store {
                franchise_id: pending_franchise,
                id: pending_store,
                ..
            } if pending_franchise == franchise_id && pending_store == store_id
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store_slot() -> PendingClose {
        PendingClose::Store {
            franchise_id: FranchiseId::new("1"),
            id: StoreId::new("4"),
            name: "Lehi".to_owned(),
        }
    }

    #[test]
    fn test_name_for_display() {
        assert_eq!(store_slot().name(), "Lehi");
        let franchise = PendingClose::Franchise {
            id: FranchiseId::new("2"),
            name: "PizzaCorp".to_owned(),
        };
        assert_eq!(franchise.name(), "PizzaCorp");
    }

    #[test]
    fn test_store_slot_authorizes_only_its_target() {
        let slot = store_slot();
        assert!(slot.authorizes_store(&FranchiseId::new("1"), &StoreId::new("4")));
        assert!(!slot.authorizes_store(&FranchiseId::new("1"), &StoreId::new("5")));
        assert!(!slot.authorizes_store(&FranchiseId::new("2"), &StoreId::new("4")));
        assert!(!slot.authorizes_franchise(&FranchiseId::new("1")));
    }

    #[test]
    fn test_franchise_slot_authorizes_only_its_target() {
        let slot = PendingClose::Franchise {
            id: FranchiseId::new("2"),
            name: "PizzaCorp".to_owned(),
        };
        assert!(slot.authorizes_franchise(&FranchiseId::new("2")));
        assert!(!slot.authorizes_franchise(&FranchiseId::new("3")));
        assert!(!slot.authorizes_store(&FranchiseId::new("2"), &StoreId::new("4")));
    }

    #[test]
    fn test_session_roundtrip() {
        let json = serde_json::to_string(&store_slot()).unwrap();
        let back: PendingClose = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store_slot());
    }
}
