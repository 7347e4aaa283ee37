//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::PizzaClient;
use crate::config::StorefrontConfig;
use crate::content::ContentStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// order API client, the loaded content, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: PizzaClient,
    content: ContentStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `content` - Markdown content loaded at startup
    #[must_use]
    pub fn new(config: StorefrontConfig, content: ContentStore) -> Self {
        let api = PizzaClient::new(&config.api_url);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                content,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the order API client.
    #[must_use]
    pub fn api(&self) -> &PizzaClient {
        &self.inner.api
    }

    /// Get a reference to the loaded content.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }
}
