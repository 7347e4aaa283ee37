//! Wire types for the order API.
//!
//! These mirror the JSON the backend speaks. The API predates this frontend
//! and is loose in places: ids arrive as strings or numbers (handled by the
//! core id types), the franchise list arrives either as a bare array or as a
//! `{franchises, more}` page, and franchise detail is sometimes wrapped in an
//! array. The enums at the bottom absorb those shape differences so the rest
//! of the crate sees one canonical form.

use serde::{Deserialize, Serialize};

use jwt_pizza_core::{
    Email, FranchiseId, MenuItemId, OrderId, Price, Role, RoleAssignment, StoreId, UserId,
};

/// A registered user as returned by the auth and user endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub roles: Vec<RoleAssignment>,
}

impl User {
    /// Initials shown in the navigation badge.
    ///
    /// Uppercased first letters of the first two space-separated words of
    /// the name: "Kai Chen" becomes "KC", a single word yields one letter.
    #[must_use]
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .take(2)
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Whether any role grants admin access.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r.role == Role::Admin)
    }

    /// Whether any role is a franchisee assignment.
    #[must_use]
    pub fn is_franchisee(&self) -> bool {
        self.roles.iter().any(|r| r.role == Role::Franchisee)
    }

    /// The franchise owned via the first franchisee role, if any.
    #[must_use]
    pub fn franchise_id(&self) -> Option<&FranchiseId> {
        self.roles
            .iter()
            .find(|r| r.role == Role::Franchisee)
            .and_then(|r| r.object_id.as_ref())
    }
}

/// Response envelope of login, register, and profile updates.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Credentials sent to `PUT /api/auth`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Payload of `POST /api/auth`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Payload of `PUT /api/user/:id`. The password is only sent when the user
/// typed a new one.
#[derive(Debug, Serialize)]
pub struct UpdateUserRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
}

/// One page of the admin user list.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPage {
    pub users: Vec<User>,
    #[serde(default)]
    pub more: bool,
}

/// A pizza on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub title: String,
    pub image: String,
    pub price: Price,
    pub description: String,
}

/// A store belonging to a franchise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    /// Only present on franchise detail responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_revenue: Option<Price>,
}

/// A franchise admin as embedded in franchise responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FranchiseAdmin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: Email,
}

/// A franchise with its admins and stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Franchise {
    pub id: FranchiseId,
    pub name: String,
    #[serde(default)]
    pub admins: Vec<FranchiseAdmin>,
    #[serde(default)]
    pub stores: Vec<Store>,
}

/// Payload of `POST /api/franchise`.
#[derive(Debug, Serialize)]
pub struct CreateFranchiseRequest<'a> {
    pub name: &'a str,
    pub admins: Vec<AdminEmail<'a>>,
}

/// Admin reference used when creating a franchise.
#[derive(Debug, Serialize)]
pub struct AdminEmail<'a> {
    pub email: &'a str,
}

/// Payload of `POST /api/franchise/:id/store`.
#[derive(Debug, Serialize)]
pub struct CreateStoreRequest<'a> {
    pub name: &'a str,
}

/// One line of an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub menu_id: MenuItemId,
    pub description: String,
    pub price: Price,
}

/// Payload of `POST /api/order`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub store_id: StoreId,
    pub franchise_id: FranchiseId,
}

/// A committed order as returned by the backend (server-assigned id/date).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub franchise_id: Option<FranchiseId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<StoreId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Sum of the line prices, exact.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(|item| item.price).sum()
    }
}

/// Response of `POST /api/order`: the committed order plus the JWT proving it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order: Order,
    pub jwt: String,
}

/// One page of a diner's order history.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diner_id: Option<UserId>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub page: u32,
}

/// Response of the order verification endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResult {
    pub message: String,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

/// The API catalog served by `GET /api/docs`, rendered verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiDocs {
    pub version: String,
    #[serde(default)]
    pub endpoints: Vec<EndpointDoc>,
}

/// One documented endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDoc {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub requires_auth: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub response: Option<serde_json::Value>,
}

// =============================================================================
// Shape normalization
// =============================================================================

/// One page of franchises, the canonical list form.
#[derive(Debug, Clone)]
pub struct FranchisePage {
    pub franchises: Vec<Franchise>,
    pub more: bool,
}

/// The franchise list endpoint answers with either a bare array or a
/// `{franchises, more}` envelope depending on the caller's parameters.
/// Both are accepted and normalized via [`FranchiseListResponse::into_page`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FranchiseListResponse {
    Paged {
        franchises: Vec<Franchise>,
        #[serde(default)]
        more: bool,
    },
    Bare(Vec<Franchise>),
}

impl FranchiseListResponse {
    /// Normalize to a page; a bare array never has more pages.
    #[must_use]
    pub fn into_page(self) -> FranchisePage {
        match self {
            Self::Paged { franchises, more } => FranchisePage { franchises, more },
            Self::Bare(franchises) => FranchisePage {
                franchises,
                more: false,
            },
        }
    }
}

/// Franchise detail arrives either as one object or as an array of the
/// caller's franchises. [`Self::into_franchise`] picks the entry matching
/// the requested id, falling back to the first.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FranchiseDetailResponse {
    One(Box<Franchise>),
    Many(Vec<Franchise>),
}

impl FranchiseDetailResponse {
    /// Resolve the detail response to the franchise identified by `id`.
    #[must_use]
    pub fn into_franchise(self, id: &FranchiseId) -> Option<Franchise> {
        match self {
            Self::One(franchise) => Some(*franchise),
            Self::Many(franchises) => {
                let mut fallback = None;
                for franchise in franchises {
                    if franchise.id == *id {
                        return Some(franchise);
                    }
                    fallback.get_or_insert(franchise);
                }
                fallback
            }
        }
    }
}
