//! The cart: one store plus the pizzas picked for it.
//!
//! Ephemeral, scoped to a single checkout attempt, serialized into the
//! session between requests. Checkout stays disabled until both a store is
//! chosen and at least one pizza is in the cart.

use serde::{Deserialize, Serialize};

use jwt_pizza_core::{FranchiseId, Price, StoreId};

use crate::api::types::{MenuItem, NewOrder, OrderItem};

/// The store an order will be placed against.
///
/// Order submission needs the franchise id as well as the store id, and the
/// confirmation views name the store, so all three travel together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreChoice {
    pub franchise_id: FranchiseId,
    pub store_id: StoreId,
    pub store_name: String,
}

/// The current selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    store: Option<StoreChoice>,
    items: Vec<MenuItem>,
}

impl Cart {
    /// Set the active store. The picked pizzas are kept.
    pub fn select_store(&mut self, choice: StoreChoice) {
        self.store = Some(choice);
    }

    /// Add a pizza. Duplicates are valid - ordering the same pizza twice
    /// prices it twice.
    pub fn add_item(&mut self, item: MenuItem) {
        self.items.push(item);
    }

    /// Remove the pizza at `index`, if it exists.
    pub fn remove_item(&mut self, index: usize) -> Option<MenuItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Reset the whole selection.
    pub fn clear(&mut self) {
        self.store = None;
        self.items.clear();
    }

    /// The chosen store, if any.
    #[must_use]
    pub const fn store(&self) -> Option<&StoreChoice> {
        self.store.as_ref()
    }

    /// The picked pizzas, in pick order.
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Number of picked pizzas (duplicates counted).
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Exact sum of the item prices, in the menu's native unit.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(|item| item.price).sum()
    }

    /// Checkout is only offered with a store and at least one pizza.
    #[must_use]
    pub fn can_checkout(&self) -> bool {
        self.store.is_some() && !self.items.is_empty()
    }

    /// Build the order submission payload, if checkout is possible.
    #[must_use]
    pub fn to_order(&self) -> Option<NewOrder> {
        let store = self.store.as_ref()?;
        if self.items.is_empty() {
            return None;
        }

        Some(NewOrder {
            items: self
                .items
                .iter()
                .map(|item| OrderItem {
                    menu_id: item.id.clone(),
                    description: item.title.clone(),
                    price: item.price,
                })
                .collect(),
            store_id: store.store_id.clone(),
            franchise_id: store.franchise_id.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use jwt_pizza_core::MenuItemId;

    fn veggie() -> MenuItem {
        MenuItem {
            id: MenuItemId::from(1),
            title: "Veggie".to_owned(),
            image: "pizza1.png".to_owned(),
            price: "0.0038".parse().unwrap(),
            description: "A garden of delight".to_owned(),
        }
    }

    fn pepperoni() -> MenuItem {
        MenuItem {
            id: MenuItemId::from(2),
            title: "Pepperoni".to_owned(),
            image: "pizza2.png".to_owned(),
            price: "0.0042".parse().unwrap(),
            description: "Spicy treat".to_owned(),
        }
    }

    fn lehi() -> StoreChoice {
        StoreChoice {
            franchise_id: FranchiseId::new("1"),
            store_id: StoreId::new("4"),
            store_name: "Lehi".to_owned(),
        }
    }

    #[test]
    fn test_empty_cart_cannot_checkout() {
        let cart = Cart::default();
        assert!(!cart.can_checkout());
        assert!(cart.to_order().is_none());
    }

    #[test]
    fn test_checkout_requires_store_and_items_in_any_order() {
        let mut cart = Cart::default();
        cart.add_item(veggie());
        assert!(!cart.can_checkout(), "items without a store");

        cart.select_store(lehi());
        assert!(cart.can_checkout());

        let mut cart = Cart::default();
        cart.select_store(lehi());
        assert!(!cart.can_checkout(), "store without items");
    }

    #[test]
    fn test_duplicates_are_priced_twice() {
        let mut cart = Cart::default();
        cart.add_item(veggie());
        cart.add_item(veggie());
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_price().to_string(), "0.0076");
    }

    #[test]
    fn test_total_is_exact_sum() {
        let mut cart = Cart::default();
        cart.add_item(veggie());
        cart.add_item(pepperoni());
        assert_eq!(cart.total_price().to_string(), "0.008");
    }

    #[test]
    fn test_select_store_keeps_items() {
        let mut cart = Cart::default();
        cart.add_item(veggie());
        cart.select_store(lehi());
        cart.select_store(StoreChoice {
            store_id: StoreId::new("5"),
            store_name: "Springville".to_owned(),
            franchise_id: FranchiseId::new("1"),
        });
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::default();
        cart.add_item(veggie());
        cart.add_item(pepperoni());

        let removed = cart.remove_item(0).unwrap();
        assert_eq!(removed.title, "Veggie");
        assert_eq!(cart.item_count(), 1);

        assert!(cart.remove_item(5).is_none());
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut cart = Cart::default();
        cart.select_store(lehi());
        cart.add_item(veggie());
        cart.clear();
        assert!(cart.store().is_none());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_to_order_payload() {
        let mut cart = Cart::default();
        cart.select_store(lehi());
        cart.add_item(veggie());
        cart.add_item(pepperoni());

        let order = cart.to_order().unwrap();
        assert_eq!(order.store_id, StoreId::new("4"));
        assert_eq!(order.franchise_id, FranchiseId::new("1"));
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items.first().unwrap().description, "Veggie");
    }

    #[test]
    fn test_session_roundtrip() {
        let mut cart = Cart::default();
        cart.select_store(lehi());
        cart.add_item(veggie());

        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back.item_count(), 1);
        assert_eq!(back.total_price(), cart.total_price());
        assert!(back.can_checkout());
    }
}
