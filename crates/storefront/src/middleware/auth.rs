//! Authentication extractors and session restore.
//!
//! The session persists only the bearer token (under the key `token`). On
//! each request the extractors here re-validate it against
//! `GET /api/user/me` - a populated reply re-establishes the authenticated
//! session, a `null` reply means the token went stale and the request
//! proceeds anonymously.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Resolve the session's persisted token to a user, if possible.
async fn restore(session: &Session, state: &AppState) -> Option<CurrentUser> {
    let token = session
        .get::<String>(session_keys::TOKEN)
        .await
        .ok()
        .flatten()?;

    match state.api().me(&token).await {
        Ok(Some(user)) => Some(CurrentUser { user, token }),
        Ok(None) => {
            // Stale token; the visitor continues anonymously
            tracing::debug!("Persisted token no longer resolves to a user");
            None
        }
        Err(e) => {
            tracing::warn!("Failed to restore session: {e}");
            None
        }
    }
}

/// Extractor that requires an authenticated session.
///
/// If the visitor is not logged in, returns a redirect to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(current): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", current.user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but the visitor is
/// anonymous.
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (when the session layer is missing).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        restore(session, state)
            .await
            .map(Self)
            .ok_or(AuthRejection::RedirectToLogin)
    }
}

/// Extractor that optionally restores the current user.
///
/// Unlike `RequireAuth`, this does not reject anonymous requests.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let current = match parts.extensions.get::<Session>() {
            Some(session) => restore(session, state).await,
            None => None,
        };

        Ok(Self(current))
    }
}

/// Persist the bearer token after a successful login or registration.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_session_token(
    session: &Session,
    token: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::TOKEN, token).await
}

/// Drop the whole session (logout).
///
/// Clears the token along with any cart, checkout stage, or pending
/// confirmation, so nothing can reuse the stale token afterwards.
///
/// # Errors
///
/// Returns an error if the session store cannot be reached.
pub async fn clear_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
