//! End-to-end tests for the JWT Pizza storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p jwt-pizza-integration-tests
//! ```
//!
//! Each test spawns its own [`mock_backend`] on an ephemeral port, points a
//! real storefront at it, and drives the storefront over HTTP with a
//! cookie-holding client - the same way a browser session would. Assertions
//! read the rendered HTML and the mock backend's call counters.

pub mod mock_backend;

use std::path::Path;

use axum::Router;

use jwt_pizza_storefront::config::StorefrontConfig;
use jwt_pizza_storefront::content::ContentStore;
use jwt_pizza_storefront::state::AppState;
use jwt_pizza_storefront::{middleware, routes};

pub use mock_backend::MockBackend;

/// A running storefront wired to a mock order API.
pub struct TestServer {
    /// Public URL of the storefront under test.
    pub base_url: String,
    /// Handle to the mock backend for fixtures, knobs, and call counters.
    pub backend: MockBackend,
    /// Cookie-holding HTTP client, standing in for the browser.
    pub client: reqwest::Client,
}

impl TestServer {
    /// Boot a mock backend and a storefront on ephemeral ports.
    ///
    /// # Panics
    ///
    /// Panics if either server fails to bind; tests cannot proceed without
    /// them.
    pub async fn spawn() -> Self {
        // Mock order API
        let backend = MockBackend::new();
        let api_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let api_addr = api_listener.local_addr().expect("mock backend addr");
        let api_router = mock_backend::router(backend.clone());
        tokio::spawn(async move {
            axum::serve(api_listener, api_router)
                .await
                .expect("serve mock backend");
        });

        // Storefront under test
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind storefront");
        let addr = listener.local_addr().expect("storefront addr");

        let config = StorefrontConfig {
            host: addr.ip(),
            port: addr.port(),
            base_url: format!("http://{addr}"),
            api_url: format!("http://{api_addr}"),
            content_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("../storefront/content"),
            sentry_dsn: None,
        };

        let content = ContentStore::load(&config.content_dir).expect("load content");
        let state = AppState::new(config.clone(), content);
        let session_layer = middleware::create_session_layer(&config);

        let app = Router::new()
            .merge(routes::routes())
            .layer(session_layer)
            .with_state(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve storefront");
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("build http client");

        Self {
            base_url: format!("http://{addr}"),
            backend,
            client,
        }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a page and return its body.
    ///
    /// # Panics
    ///
    /// Panics on transport errors.
    pub async fn get(&self, path: &str) -> String {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request")
            .text()
            .await
            .expect("GET body")
    }

    /// GET a page and return its final status code.
    ///
    /// # Panics
    ///
    /// Panics on transport errors.
    pub async fn get_status(&self, path: &str) -> reqwest::StatusCode {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request")
            .status()
    }

    /// POST a form and return the body after redirects.
    ///
    /// # Panics
    ///
    /// Panics on transport errors.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> String {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request")
            .text()
            .await
            .expect("POST body")
    }

    /// Log in through the real login form.
    ///
    /// # Panics
    ///
    /// Panics on transport errors.
    pub async fn login(&self, email: &str, password: &str) -> String {
        self.post_form("/login", &[("email", email), ("password", password)])
            .await
    }
}
