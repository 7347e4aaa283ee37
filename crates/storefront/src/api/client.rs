//! Order API client implementation.
//!
//! Wraps `reqwest` with typed methods for the fixed set of backend
//! endpoints. Caches the menu and token-to-user lookups using `moka`.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use jwt_pizza_core::{FranchiseId, StoreId, UserId};

use super::cache::CacheValue;
use super::types::{
    AdminEmail, ApiDocs, AuthSession, CreateFranchiseRequest, CreateStoreRequest, Franchise,
    FranchiseDetailResponse, FranchiseListResponse, FranchisePage, LoginRequest, MenuItem,
    NewOrder, OrderHistory, OrderReceipt, RegisterRequest, Store, UpdateUserRequest, User,
    UserPage, VerifyResult,
};
use super::{ApiError, error_message};

/// Cache key for the menu.
const MENU_CACHE_KEY: &str = "menu";

/// Menu cache TTL. The menu is read-only from the client's point of view.
const MENU_TTL: Duration = Duration::from_secs(300);

/// Build the `name` query value for list filtering.
///
/// The backend matches with `*` wildcards: an empty or absent filter asks
/// for everything (`*`), otherwise the term is wrapped as `*term*`.
fn wildcard(filter: Option<&str>) -> String {
    match filter.map(str::trim) {
        Some(term) if !term.is_empty() => format!("*{term}*"),
        _ => "*".to_owned(),
    }
}

// =============================================================================
// PizzaClient
// =============================================================================

/// Client for the order API.
///
/// Provides type-safe access to authentication, menu, franchise, user, and
/// order operations. Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct PizzaClient {
    inner: Arc<PizzaClientInner>,
}

struct PizzaClientInner {
    http: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl PizzaClient {
    /// Create a new client for the API at `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(MENU_TTL)
            .build();

        Self {
            inner: Arc::new(PizzaClientInner {
                http: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_owned(),
                cache,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Start a request, attaching the bearer token when present.
    ///
    /// The token is read here, at send time, so a logout that clears the
    /// session shuts out every later call.
    fn request(&self, method: Method, path: &str, token: Option<&str>) -> reqwest::RequestBuilder {
        let mut builder = self.inner.http.request(method, self.url(path));
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send a request and decode a JSON response.
    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Api {
                status,
                message: error_message(status, &body),
            });
        }

        serde_json::from_str(&body).map_err(ApiError::Parse)
    }

    /// Send a request where only the status matters (deletes, logout).
    async fn send_unit(&self, builder: reqwest::RequestBuilder) -> Result<(), ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await?;
            return Err(ApiError::Api {
                status,
                message: error_message(status, &body),
            });
        }

        Ok(())
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` carrying the server's message on bad
    /// credentials; the caller keeps the login view active.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        let body = LoginRequest { email, password };
        self.send(self.request(Method::PUT, "/api/auth", None).json(&body))
            .await
    }

    /// Register a new diner.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the server's message (e.g. a duplicate
    /// email rejection).
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ApiError> {
        let body = RegisterRequest {
            name,
            email,
            password,
        };
        self.send(self.request(Method::POST, "/api/auth", None).json(&body))
            .await
    }

    /// Invalidate the token on the backend.
    ///
    /// The server's reply is informational only.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the call; callers log and
    /// clear the local session regardless.
    #[instrument(skip(self, token))]
    pub async fn logout(&self, token: &str) -> Result<(), ApiError> {
        self.send_unit(self.request(Method::DELETE, "/api/auth", Some(token)))
            .await
    }

    /// Resolve the user a token belongs to.
    ///
    /// Never cached: the backend is the authority on whether a token is
    /// still good, so a `null` reply - a stale token - degrades the very
    /// next request to anonymous.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn me(&self, token: &str) -> Result<Option<User>, ApiError> {
        self.send(self.request(Method::GET, "/api/user/me", Some(token)))
            .await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Update a user's profile. Returns the refreshed user and token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, token, update), fields(user_id = %user_id))]
    pub async fn update_user(
        &self,
        token: &str,
        user_id: &UserId,
        update: &UpdateUserRequest<'_>,
    ) -> Result<AuthSession, ApiError> {
        self.send(
            self.request(Method::PUT, &format!("/api/user/{user_id}"), Some(token))
                .json(update),
        )
        .await
    }

    /// Fetch one page of the user list (admin), optionally filtered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (e.g. the backend denies the
    /// caller's role).
    #[instrument(skip(self, token))]
    pub async fn list_users(
        &self,
        token: &str,
        page: u32,
        limit: u32,
        name_filter: Option<&str>,
    ) -> Result<UserPage, ApiError> {
        self.send(self.request(Method::GET, "/api/user", Some(token)).query(&[
            ("page", page.to_string()),
            ("limit", limit.to_string()),
            ("name", wildcard(name_filter)),
        ]))
        .await
    }

    /// Delete a user (admin). The next list fetch excludes the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the delete.
    #[instrument(skip(self, token), fields(user_id = %user_id))]
    pub async fn delete_user(&self, token: &str, user_id: &UserId) -> Result<(), ApiError> {
        self.send_unit(self.request(Method::DELETE, &format!("/api/user/{user_id}"), Some(token)))
            .await
    }

    // =========================================================================
    // Menu
    // =========================================================================

    /// Fetch the menu. Cached for five minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn menu(&self) -> Result<Vec<MenuItem>, ApiError> {
        if let Some(CacheValue::Menu(menu)) = self.inner.cache.get(MENU_CACHE_KEY).await {
            debug!("Cache hit for menu");
            return Ok(menu);
        }

        let menu: Vec<MenuItem> = self
            .send(self.request(Method::GET, "/api/order/menu", None))
            .await?;

        self.inner
            .cache
            .insert(MENU_CACHE_KEY.to_owned(), CacheValue::Menu(menu.clone()))
            .await;

        Ok(menu)
    }

    // =========================================================================
    // Franchises (not cached - mutable via the dashboards)
    // =========================================================================

    /// Fetch the franchise list.
    ///
    /// Without parameters this is the store-picker list on the order page;
    /// with parameters it is the admin dashboard's paginated, filterable
    /// view. Both response shapes the backend emits are accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_franchises(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
        name_filter: Option<&str>,
    ) -> Result<FranchisePage, ApiError> {
        let mut builder = self.request(Method::GET, "/api/franchise", None);

        if page.is_some() || limit.is_some() || name_filter.is_some() {
            builder = builder.query(&[
                ("page", page.unwrap_or(0).to_string()),
                ("limit", limit.unwrap_or(10).to_string()),
                ("name", wildcard(name_filter)),
            ]);
        }

        let response: FranchiseListResponse = self.send(builder).await?;
        Ok(response.into_page())
    }

    /// Fetch one franchise with admins, stores, and per-store revenue.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the backend has no such franchise.
    #[instrument(skip(self, token), fields(franchise_id = %franchise_id))]
    pub async fn get_franchise(
        &self,
        token: &str,
        franchise_id: &FranchiseId,
    ) -> Result<Franchise, ApiError> {
        let response: FranchiseDetailResponse = self
            .send(self.request(
                Method::GET,
                &format!("/api/franchise/{franchise_id}"),
                Some(token),
            ))
            .await?;

        response
            .into_franchise(franchise_id)
            .ok_or_else(|| ApiError::NotFound(format!("Franchise not found: {franchise_id}")))
    }

    /// Create a franchise (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the create.
    #[instrument(skip(self, token), fields(name = %name))]
    pub async fn create_franchise(
        &self,
        token: &str,
        name: &str,
        admin_email: &str,
    ) -> Result<Franchise, ApiError> {
        let body = CreateFranchiseRequest {
            name,
            admins: vec![AdminEmail { email: admin_email }],
        };
        self.send(
            self.request(Method::POST, "/api/franchise", Some(token))
                .json(&body),
        )
        .await
    }

    /// Close a franchise (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the delete.
    #[instrument(skip(self, token), fields(franchise_id = %franchise_id))]
    pub async fn delete_franchise(
        &self,
        token: &str,
        franchise_id: &FranchiseId,
    ) -> Result<(), ApiError> {
        self.send_unit(self.request(
            Method::DELETE,
            &format!("/api/franchise/{franchise_id}"),
            Some(token),
        ))
        .await
    }

    /// Create a store under a franchise.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the create.
    #[instrument(skip(self, token), fields(franchise_id = %franchise_id, name = %name))]
    pub async fn create_store(
        &self,
        token: &str,
        franchise_id: &FranchiseId,
        name: &str,
    ) -> Result<Store, ApiError> {
        let body = CreateStoreRequest { name };
        self.send(
            self.request(
                Method::POST,
                &format!("/api/franchise/{franchise_id}/store"),
                Some(token),
            )
            .json(&body),
        )
        .await
    }

    /// Close a store.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the delete.
    #[instrument(skip(self, token), fields(franchise_id = %franchise_id, store_id = %store_id))]
    pub async fn delete_store(
        &self,
        token: &str,
        franchise_id: &FranchiseId,
        store_id: &StoreId,
    ) -> Result<(), ApiError> {
        self.send_unit(self.request(
            Method::DELETE,
            &format!("/api/franchise/{franchise_id}/store/{store_id}"),
            Some(token),
        ))
        .await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Submit an order. Returns the committed order and the JWT proving it.
    ///
    /// No retries: a declined payment surfaces the server's message and the
    /// caller keeps its cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the order.
    #[instrument(skip(self, token, order))]
    pub async fn submit_order(
        &self,
        token: &str,
        order: &NewOrder,
    ) -> Result<OrderReceipt, ApiError> {
        self.send(
            self.request(Method::POST, "/api/order", Some(token))
                .json(order),
        )
        .await
    }

    /// Fetch one page of the caller's order history.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn order_history(&self, token: &str, page: u32) -> Result<OrderHistory, ApiError> {
        self.send(
            self.request(Method::GET, "/api/order", Some(token))
                .query(&[("page", page.to_string())]),
        )
        .await
    }

    /// Verify an order JWT. Read-only; order state is unaffected.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, jwt))]
    pub async fn verify_order(
        &self,
        token: Option<&str>,
        jwt: &str,
    ) -> Result<VerifyResult, ApiError> {
        let path = format!("/api/order/verify/{}", urlencoding::encode(jwt));
        self.send(self.request(Method::GET, &path, token)).await
    }

    // =========================================================================
    // Docs
    // =========================================================================

    /// Fetch the API catalog for the docs page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn docs(&self) -> Result<ApiDocs, ApiError> {
        self.send(self.request(Method::GET, "/api/docs", None)).await
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

impl std::fmt::Debug for PizzaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PizzaClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_empty_filter() {
        assert_eq!(wildcard(None), "*");
        assert_eq!(wildcard(Some("")), "*");
        assert_eq!(wildcard(Some("   ")), "*");
    }

    #[test]
    fn test_wildcard_wraps_term() {
        assert_eq!(wildcard(Some("Kai")), "*Kai*");
        assert_eq!(wildcard(Some("  Kai  ")), "*Kai*");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = PizzaClient::new("http://localhost:3001/");
        assert_eq!(client.url("/api/docs"), "http://localhost:3001/api/docs");
    }
}
