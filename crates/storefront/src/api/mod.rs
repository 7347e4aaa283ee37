//! Order API client.
//!
//! # Architecture
//!
//! - Typed `reqwest` wrapper over the backend's `/api/...` endpoints
//! - The backend is the source of truth - NO local sync, direct API calls
//! - In-memory caching via `moka` for the read-only menu; everything
//!   session- or list-shaped is re-fetched on every render
//! - The bearer token is passed per call and read at send time, never stored
//!   in the client
//!
//! # Example
//!
//! ```rust,ignore
//! use jwt_pizza_storefront::api::PizzaClient;
//!
//! let client = PizzaClient::new(&config.api_url);
//!
//! // Authenticate and browse
//! let session = client.login("d@jwt.com", "a").await?;
//! let menu = client.menu().await?;
//!
//! // Submit an order
//! let receipt = client.submit_order(&session.token, &order).await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::PizzaClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the order API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status. `message` is the
    /// server's own wording and is surfaced to the user verbatim.
    #[error("{message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// Whether the backend rejected the request as a client error (4xx),
    /// e.g. bad credentials or a duplicate registration.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if status.is_client_error())
    }
}

/// Extract the user-facing message from an error response body.
///
/// The backend wraps errors as `{"message": "..."}`; anything else falls
/// back to the raw body, then to the status code's canonical reason.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.message;
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_owned()
    } else {
        trimmed.chars().take(200).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_json_body() {
        let msg = error_message(
            reqwest::StatusCode::NOT_FOUND,
            r#"{"message":"Invalid credentials"}"#,
        );
        assert_eq!(msg, "Invalid credentials");
    }

    #[test]
    fn test_error_message_from_plain_body() {
        let msg = error_message(reqwest::StatusCode::BAD_GATEWAY, "upstream exploded");
        assert_eq!(msg, "upstream exploded");
    }

    #[test]
    fn test_error_message_from_empty_body() {
        let msg = error_message(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "   ");
        assert_eq!(msg, "Internal Server Error");
    }

    #[test]
    fn test_is_client_error() {
        let err = ApiError::Api {
            status: reqwest::StatusCode::BAD_REQUEST,
            message: "duplicate email".to_owned(),
        };
        assert!(err.is_client_error());

        let err = ApiError::Api {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            message: "boom".to_owned(),
        };
        assert!(!err.is_client_error());
    }
}
