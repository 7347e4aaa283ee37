//! The order view: menu browsing, store selection, and cart building.
//!
//! Entering the menu puts the session in the selecting stage; the cart
//! lives in the session and every mutation re-renders the page. Checkout
//! is only offered once a store is chosen and at least one pizza is in
//! the cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use jwt_pizza_core::{FranchiseId, StoreId};

use crate::api::types::MenuItem;
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{Cart, CheckoutStage, CurrentUser, StoreChoice, session_keys};
use crate::state::AppState;

// =============================================================================
// Session Helpers (shared with the payment flow)
// =============================================================================

/// Get the cart from the session, defaulting to empty.
pub(crate) async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Persist the cart to the session.
pub(crate) async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

/// Get the checkout stage from the session, defaulting to browsing.
pub(crate) async fn load_stage(session: &Session) -> CheckoutStage {
    session
        .get::<CheckoutStage>(session_keys::CHECKOUT)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Persist the checkout stage to the session.
pub(crate) async fn save_stage(
    session: &Session,
    stage: CheckoutStage,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CHECKOUT, stage).await
}

// =============================================================================
// View Types
// =============================================================================

/// Menu entry display data.
pub struct PizzaView {
    pub menu_id: String,
    pub title: String,
    pub image: String,
    pub price: String,
    pub description: String,
}

impl From<&MenuItem> for PizzaView {
    fn from(item: &MenuItem) -> Self {
        Self {
            menu_id: item.id.to_string(),
            title: item.title.clone(),
            image: item.image.clone(),
            price: item.price.to_string(),
            description: item.description.clone(),
        }
    }
}

/// One `<option>` in the store picker; the value carries both ids the
/// order submission needs.
pub struct StoreOptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// One picked pizza in the cart listing.
pub struct CartLineView {
    pub index: usize,
    pub title: String,
    pub price: String,
}

/// Order page template.
#[derive(Template, WebTemplate)]
#[template(path = "order/menu.html")]
pub struct MenuTemplate {
    pub current_user: Option<CurrentUser>,
    pub pizzas: Vec<PizzaView>,
    pub stores: Vec<StoreOptionView>,
    pub cart_lines: Vec<CartLineView>,
    pub item_count: usize,
    pub total: String,
    pub can_checkout: bool,
}

// =============================================================================
// Form Types
// =============================================================================

/// Store picker submission. The value encodes `franchiseId:storeId`.
#[derive(Debug, Deserialize)]
pub struct SelectStoreForm {
    pub store: String,
}

/// Add-pizza submission.
#[derive(Debug, Deserialize)]
pub struct AddItemForm {
    pub menu_id: String,
}

/// Remove-pizza submission.
#[derive(Debug, Deserialize)]
pub struct RemoveItemForm {
    pub index: usize,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the order view.
///
/// Fetches the menu and the franchise/store list (both read-only and safe
/// to retry) and enters the selecting stage. Arriving here from the
/// delivery view is the "Order more" path, so any displayed receipt is
/// dropped.
#[instrument(skip_all)]
pub async fn menu(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    session: Session,
) -> Result<MenuTemplate> {
    let stage = load_stage(&session).await;
    save_stage(&session, stage.start_selecting()).await?;
    let _: Option<serde_json::Value> = session.remove(session_keys::RECEIPT).await?;

    let menu_items = state.api().menu().await?;
    let franchises = state.api().list_franchises(None, None, None).await?;
    let cart = load_cart(&session).await;

    let selected_value = cart
        .store()
        .map(|choice| option_value(&choice.franchise_id, &choice.store_id));

    let mut stores = Vec::new();
    for franchise in &franchises.franchises {
        for store in &franchise.stores {
            let value = option_value(&franchise.id, &store.id);
            stores.push(StoreOptionView {
                selected: selected_value.as_deref() == Some(value.as_str()),
                value,
                label: store.name.clone(),
            });
        }
    }

    Ok(MenuTemplate {
        current_user,
        pizzas: menu_items.iter().map(PizzaView::from).collect(),
        stores,
        cart_lines: cart_lines(&cart),
        item_count: cart.item_count(),
        total: cart.total_price().to_string(),
        can_checkout: cart.can_checkout(),
    })
}

/// Set the active store for the cart. The picked pizzas are kept.
#[instrument(skip_all)]
pub async fn select_store(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SelectStoreForm>,
) -> Result<Redirect> {
    if let Some((franchise_id, store_id)) = parse_option_value(&form.store) {
        // Resolve the display name from the same list the picker rendered
        let franchises = state.api().list_franchises(None, None, None).await?;
        let store_name = franchises
            .franchises
            .iter()
            .find(|f| f.id == franchise_id)
            .and_then(|f| f.stores.iter().find(|s| s.id == store_id))
            .map_or_else(|| store_id.to_string(), |s| s.name.clone());

        let mut cart = load_cart(&session).await;
        cart.select_store(StoreChoice {
            franchise_id,
            store_id,
            store_name,
        });
        save_cart(&session, &cart).await?;
    }

    Ok(Redirect::to("/menu"))
}

/// Add a pizza to the cart. Picking the same pizza again is valid and
/// prices it twice.
#[instrument(skip_all)]
pub async fn add_item(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddItemForm>,
) -> Result<Redirect> {
    let menu_items = state.api().menu().await?;

    if let Some(item) = menu_items
        .iter()
        .find(|item| item.id.as_str() == form.menu_id)
    {
        let mut cart = load_cart(&session).await;
        cart.add_item(item.clone());
        save_cart(&session, &cart).await?;
    }

    Ok(Redirect::to("/menu"))
}

/// Remove a picked pizza by position.
#[instrument(skip_all)]
pub async fn remove_item(
    session: Session,
    Form(form): Form<RemoveItemForm>,
) -> Result<Redirect> {
    let mut cart = load_cart(&session).await;
    if cart.remove_item(form.index).is_some() {
        save_cart(&session, &cart).await?;
    }

    Ok(Redirect::to("/menu"))
}

/// Checkout action: move to the confirmation view.
///
/// Re-checks the cart guard server-side; a submission slipping past a
/// disabled button bounces back to the menu.
#[instrument(skip_all)]
pub async fn checkout(session: Session) -> Result<Response> {
    let cart = load_cart(&session).await;
    if !cart.can_checkout() {
        return Ok(Redirect::to("/menu").into_response());
    }

    let stage = load_stage(&session).await;
    match stage.confirm() {
        Ok(next) => {
            save_stage(&session, next).await?;
            Ok(Redirect::to("/payment").into_response())
        }
        Err(e) => {
            tracing::debug!("Checkout rejected: {e}");
            Ok(Redirect::to("/menu").into_response())
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Rows for the cart listing.
pub(crate) fn cart_lines(cart: &Cart) -> Vec<CartLineView> {
    cart.items()
        .iter()
        .enumerate()
        .map(|(index, item)| CartLineView {
            index,
            title: item.title.clone(),
            price: item.price.to_string(),
        })
        .collect()
}

/// Encode a store option value as `franchiseId:storeId`.
fn option_value(franchise_id: &FranchiseId, store_id: &StoreId) -> String {
    format!("{franchise_id}:{store_id}")
}

/// Decode a store option value.
fn parse_option_value(value: &str) -> Option<(FranchiseId, StoreId)> {
    let (franchise, store) = value.split_once(':')?;
    if franchise.is_empty() || store.is_empty() {
        return None;
    }
    Some((FranchiseId::from(franchise), StoreId::from(store)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_option_value_roundtrip() {
        let value = option_value(&FranchiseId::new("1"), &StoreId::new("4"));
        assert_eq!(value, "1:4");
        let (franchise, store) = parse_option_value(&value).unwrap();
        assert_eq!(franchise, FranchiseId::new("1"));
        assert_eq!(store, StoreId::new("4"));
    }

    #[test]
    fn test_parse_option_value_rejects_garbage() {
        assert!(parse_option_value("").is_none());
        assert!(parse_option_value("no-separator").is_none());
        assert!(parse_option_value(":4").is_none());
        assert!(parse_option_value("1:").is_none());
    }
}
