//! A mock order API backend.
//!
//! Reproduces the backend contract the storefront consumes: the auth
//! endpoints, menu, franchises/stores, users, orders, verification, and
//! docs. Fixtures and shapes mirror the production API, including its
//! quirks - ids appear both as strings and numbers, the unparameterized
//! franchise list is a bare array while the filtered one is a
//! `{franchises, more}` page, and franchise detail comes wrapped in an
//! array.
//!
//! Call counters and the `fail_orders` knob let tests assert on exactly
//! which mutating calls the storefront issued.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};

/// Shared handle to the mock backend's state.
#[derive(Clone)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

/// Mutable fixture state behind the mock endpoints.
pub struct MockState {
    /// User objects, including a `password` field the real API never returns.
    pub users: Vec<Value>,
    /// token -> user id
    pub tokens: HashMap<String, String>,
    /// Franchise objects with embedded stores.
    pub franchises: Vec<Value>,
    /// When set, `POST /api/order` answers 500 "Payment failed".
    pub fail_orders: bool,
    /// Number of `POST /api/order` calls received.
    pub order_posts: u32,
    /// Number of `DELETE /api/franchise/:id` calls received.
    pub franchise_deletes: u32,
    /// Number of store DELETE calls received.
    pub store_deletes: u32,
    /// Number of user DELETE calls received.
    pub user_deletes: u32,
    next_id: u64,
}

impl MockBackend {
    /// A backend loaded with the standard fixtures.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::with_fixtures())),
        }
    }

    /// Lock the state for inspection or mutation from a test.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state poisoned")
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockState {
    fn with_fixtures() -> Self {
        let users = vec![
            json!({
                "id": "1", "name": "Admin User", "email": "a@jwt.com",
                "roles": [{"role": "admin"}], "password": "a"
            }),
            json!({
                "id": "2", "name": "Franchise Owner", "email": "f@jwt.com",
                "roles": [{"role": "franchisee", "objectId": "1"}], "password": "a"
            }),
            json!({
                "id": "3", "name": "Kai Chen", "email": "d@jwt.com",
                "roles": [{"role": "diner"}], "password": "a"
            }),
            json!({
                "id": "5", "name": "Pizza User", "email": "p@jwt.com",
                "roles": [{"role": "diner"}], "password": "a"
            }),
        ];

        let franchises = vec![
            json!({
                "id": 1, "name": "LotaPizza",
                "admins": [{"id": "2", "name": "Franchise Owner", "email": "f@jwt.com"}],
                "stores": [
                    {"id": 4, "name": "Lehi", "totalRevenue": 100},
                    {"id": 5, "name": "Springville", "totalRevenue": 200}
                ]
            }),
            json!({
                "id": 2, "name": "PizzaCorp",
                "admins": [],
                "stores": [{"id": 7, "name": "Spanish Fork"}]
            }),
        ];

        Self {
            users,
            tokens: HashMap::new(),
            franchises,
            fail_orders: false,
            order_posts: 0,
            franchise_deletes: 0,
            store_deletes: 0,
            user_deletes: 0,
            next_id: 10,
        }
    }

    fn issue_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn user_for_token(&self, token: &str) -> Option<Value> {
        let user_id = self.tokens.get(token)?;
        self.users
            .iter()
            .find(|u| u["id"] == json!(user_id))
            .map(public_user)
    }

    fn is_admin_token(&self, token: &str) -> bool {
        self.user_for_token(token).is_some_and(|user| {
            user["roles"]
                .as_array()
                .is_some_and(|roles| roles.iter().any(|r| r["role"] == "admin"))
        })
    }
}

/// Strip the password before a user object leaves the API.
fn public_user(user: &Value) -> Value {
    let mut user = user.clone();
    if let Some(map) = user.as_object_mut() {
        map.remove("password");
    }
    user
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned)
}

/// Match a `*term*` wildcard pattern against a name.
fn name_matches(pattern: &str, name: &str) -> bool {
    let term = pattern.trim_matches('*');
    term.is_empty() || name.contains(term)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "unauthorized"})),
    )
}

/// Build the mock backend router.
pub fn router(backend: MockBackend) -> Router {
    Router::new()
        .route("/api/auth", put(login).post(register).delete(logout))
        .route("/api/user/me", get(me))
        .route("/api/user", get(list_users))
        .route("/api/user/{id}", put(update_user).delete(delete_user))
        .route("/api/order/menu", get(menu))
        .route("/api/order", post(create_order).get(order_history))
        .route("/api/order/verify/{jwt}", get(verify_order))
        .route(
            "/api/franchise",
            get(list_franchises).post(create_franchise),
        )
        .route(
            "/api/franchise/{id}",
            get(get_franchise).delete(delete_franchise),
        )
        .route("/api/franchise/{id}/store", post(create_store))
        .route(
            "/api/franchise/{id}/store/{store_id}",
            delete(delete_store),
        )
        .route("/api/docs", get(docs))
        .with_state(backend)
}

// =============================================================================
// Auth
// =============================================================================

async fn login(
    State(backend): State<MockBackend>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut state = backend.state();

    let found = state
        .users
        .iter()
        .find(|u| u["email"] == body["email"] && u["password"] == body["password"])
        .map(public_user);

    match found {
        Some(user) => {
            let token = format!("tok-{}", user["email"].as_str().unwrap_or("unknown"));
            let user_id = user["id"].as_str().unwrap_or_default().to_owned();
            state.tokens.insert(token.clone(), user_id);
            (
                StatusCode::OK,
                Json(json!({"user": user, "token": token})),
            )
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Invalid credentials"})),
        ),
    }
}

async fn register(
    State(backend): State<MockBackend>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut state = backend.state();

    let exists = state.users.iter().any(|u| u["email"] == body["email"]);
    if exists {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Email already in use"})),
        );
    }

    let id = state.issue_id().to_string();
    let user = json!({
        "id": id,
        "name": body["name"],
        "email": body["email"],
        "roles": [{"role": "diner"}],
        "password": body["password"],
    });
    state.users.push(user.clone());

    let token = format!("tok-{}", body["email"].as_str().unwrap_or("unknown"));
    state.tokens.insert(token.clone(), id);

    (
        StatusCode::OK,
        Json(json!({"user": public_user(&user), "token": token})),
    )
}

async fn logout(State(backend): State<MockBackend>, headers: HeaderMap) -> Json<Value> {
    if let Some(token) = bearer(&headers) {
        backend.state().tokens.remove(&token);
    }
    Json(json!({"message": "logout successful"}))
}

async fn me(State(backend): State<MockBackend>, headers: HeaderMap) -> Json<Value> {
    let user = bearer(&headers).and_then(|token| backend.state().user_for_token(&token));
    Json(user.unwrap_or(Value::Null))
}

// =============================================================================
// Users
// =============================================================================

async fn update_user(
    State(backend): State<MockBackend>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let Some(token) = bearer(&headers) else {
        return unauthorized();
    };

    let mut state = backend.state();
    if state.user_for_token(&token).is_none() {
        return unauthorized();
    }

    let Some(user) = state.users.iter_mut().find(|u| u["id"] == json!(id)) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "unknown user"})),
        );
    };

    user["name"] = body["name"].clone();
    user["email"] = body["email"].clone();
    if body.get("password").is_some_and(|p| !p.is_null()) {
        user["password"] = body["password"].clone();
    }
    let updated = public_user(user);

    (
        StatusCode::OK,
        Json(json!({"user": updated, "token": token})),
    )
}

async fn list_users(
    State(backend): State<MockBackend>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let state = backend.state();
    if !bearer(&headers).is_some_and(|token| state.is_admin_token(&token)) {
        return unauthorized();
    }

    let pattern = params.get("name").map_or("*", String::as_str);
    let users: Vec<Value> = state
        .users
        .iter()
        .filter(|u| name_matches(pattern, u["name"].as_str().unwrap_or_default()))
        .map(public_user)
        .collect();

    (
        StatusCode::OK,
        Json(json!({"users": users, "more": false})),
    )
}

async fn delete_user(
    State(backend): State<MockBackend>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let mut state = backend.state();
    if !bearer(&headers).is_some_and(|token| state.is_admin_token(&token)) {
        return unauthorized();
    }

    state.user_deletes += 1;
    state.users.retain(|u| u["id"] != json!(id));

    (StatusCode::OK, Json(json!({"message": "user deleted"})))
}

// =============================================================================
// Menu & Orders
// =============================================================================

async fn menu() -> Json<Value> {
    Json(json!([
        {"id": 1, "title": "Veggie", "image": "pizza1.png", "price": 0.0038, "description": "A garden of delight"},
        {"id": 2, "title": "Pepperoni", "image": "pizza2.png", "price": 0.0042, "description": "Spicy treat"},
        {"id": 3, "title": "Margarita", "image": "pizza3.png", "price": 0.0014, "description": "Essential classic"}
    ]))
}

async fn create_order(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut state = backend.state();
    state.order_posts += 1;

    if bearer(&headers).and_then(|t| state.user_for_token(&t)).is_none() {
        return unauthorized();
    }

    if state.fail_orders {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Payment failed"})),
        );
    }

    let mut order = body;
    order["id"] = json!(23);
    order["date"] = json!("2024-01-01T00:00:00.000Z");

    (
        StatusCode::OK,
        Json(json!({"order": order, "jwt": "eyJpYXQ"})),
    )
}

async fn order_history(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let state = backend.state();
    let Some(user) = bearer(&headers).and_then(|t| state.user_for_token(&t)) else {
        return unauthorized();
    };

    let page: u32 = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(0);

    (
        StatusCode::OK,
        Json(json!({
            "dinerId": user["id"],
            "orders": [{
                "id": "1",
                "franchiseId": "1",
                "storeId": "4",
                "date": "2024-01-01T00:00:00.000Z",
                "items": [{"menuId": "1", "description": "Veggie", "price": 0.0038}]
            }],
            "page": page
        })),
    )
}

async fn verify_order(Path(jwt): Path<String>) -> Json<Value> {
    Json(json!({
        "message": "valid",
        "payload": {
            "vendor": {"id": "test", "name": "Test Vendor"},
            "diner": {"id": "3", "name": "Kai Chen", "email": "d@jwt.com"},
            "order": {"id": "23", "jwt": jwt}
        }
    }))
}

// =============================================================================
// Franchises
// =============================================================================

async fn list_franchises(
    State(backend): State<MockBackend>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let state = backend.state();

    // No parameters: the legacy bare-array shape used by the order view
    if params.is_empty() {
        return Json(json!(state.franchises));
    }

    let pattern = params.get("name").map_or("*", String::as_str);
    let franchises: Vec<Value> = state
        .franchises
        .iter()
        .filter(|f| name_matches(pattern, f["name"].as_str().unwrap_or_default()))
        .cloned()
        .collect();

    Json(json!({"franchises": franchises, "more": false}))
}

async fn create_franchise(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut state = backend.state();
    if !bearer(&headers).is_some_and(|token| state.is_admin_token(&token)) {
        return unauthorized();
    }

    let id = state.issue_id();
    let franchise = json!({
        "id": id,
        "name": body["name"],
        "admins": body["admins"],
        "stores": []
    });
    state.franchises.push(franchise.clone());

    (StatusCode::OK, Json(franchise))
}

async fn get_franchise(
    State(backend): State<MockBackend>,
    Path(id): Path<String>,
) -> Json<Value> {
    let state = backend.state();
    // The production endpoint wraps the detail in an array
    let found: Vec<Value> = state
        .franchises
        .iter()
        .filter(|f| f["id"].to_string() == id || f["id"] == json!(id))
        .cloned()
        .collect();
    Json(json!(found))
}

async fn delete_franchise(
    State(backend): State<MockBackend>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let mut state = backend.state();
    if !bearer(&headers).is_some_and(|token| state.is_admin_token(&token)) {
        return unauthorized();
    }

    state.franchise_deletes += 1;
    state
        .franchises
        .retain(|f| !(f["id"].to_string() == id || f["id"] == json!(id)));

    (
        StatusCode::OK,
        Json(json!({"message": "franchise deleted"})),
    )
}

async fn create_store(
    State(backend): State<MockBackend>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let Some(token) = bearer(&headers) else {
        return unauthorized();
    };

    let mut state = backend.state();
    if state.user_for_token(&token).is_none() {
        return unauthorized();
    }

    let store_id = state.issue_id();
    let store = json!({"id": store_id, "name": body["name"]});

    let Some(franchise) = state
        .franchises
        .iter_mut()
        .find(|f| f["id"].to_string() == id || f["id"] == json!(id))
    else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "unknown franchise"})),
        );
    };

    if let Some(stores) = franchise["stores"].as_array_mut() {
        stores.push(store.clone());
    }

    let mut created = store;
    created["franchiseId"] = json!(id);
    (StatusCode::OK, Json(created))
}

async fn delete_store(
    State(backend): State<MockBackend>,
    Path((id, store_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let Some(token) = bearer(&headers) else {
        return unauthorized();
    };

    let mut state = backend.state();
    if state.user_for_token(&token).is_none() {
        return unauthorized();
    }

    state.store_deletes += 1;
    if let Some(franchise) = state
        .franchises
        .iter_mut()
        .find(|f| f["id"].to_string() == id || f["id"] == json!(id))
        && let Some(stores) = franchise["stores"].as_array_mut()
    {
        stores.retain(|s| !(s["id"].to_string() == store_id || s["id"] == json!(store_id)));
    }

    (StatusCode::OK, Json(json!({"message": "store deleted"})))
}

// =============================================================================
// Docs
// =============================================================================

async fn docs() -> Json<Value> {
    Json(json!({
        "version": "1.0.0",
        "endpoints": [{
            "method": "GET",
            "path": "/api/order/menu",
            "requiresAuth": false,
            "description": "Get the pizza menu",
            "example": "curl localhost:3000/api/order/menu",
            "response": []
        }]
    }))
}
