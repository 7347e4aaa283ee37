//! Authentication route handlers.
//!
//! Login uses `PUT /api/auth`, registration `POST /api/auth`, logout
//! `DELETE /api/auth`. A failed attempt keeps the form on screen with the
//! backend's message and establishes no session. A successful login first
//! consumes the single-slot resume intent, so a visitor who was bounced to
//! login mid-checkout lands straight back on the payment view with their
//! cart intact.

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

use crate::filters;
use crate::middleware::{OptionalAuth, clear_session, set_session_token};
use crate::models::{CheckoutStage, CurrentUser, ResumeIntent, session_keys};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
#[instrument(skip_all)]
pub async fn login_page(OptionalAuth(current_user): OptionalAuth) -> impl IntoResponse {
    LoginTemplate {
        current_user,
        error: None,
    }
}

/// Handle login form submission.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.api().login(&form.email, &form.password).await {
        Ok(auth) => establish_session(&session, &auth.token).await,
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            LoginTemplate {
                current_user: None,
                error: Some(e.to_string()),
            }
            .into_response()
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
#[instrument(skip_all)]
pub async fn register_page(OptionalAuth(current_user): OptionalAuth) -> impl IntoResponse {
    RegisterTemplate {
        current_user,
        error: None,
    }
}

/// Handle registration form submission.
///
/// A rejected registration (e.g. duplicate email) keeps the register view
/// active with the backend's message; success behaves exactly like login.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    match state
        .api()
        .register(&form.name, &form.email, &form.password)
        .await
    {
        Ok(auth) => establish_session(&session, &auth.token).await,
        Err(e) => {
            tracing::warn!("Registration failed: {e}");
            RegisterTemplate {
                current_user: None,
                error: Some(e.to_string()),
            }
            .into_response()
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// The backend's reply is informational only; the local session is cleared
/// regardless so a stale token cannot be reused.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Ok(Some(token)) = session.get::<String>(session_keys::TOKEN).await
        && let Err(e) = state.api().logout(&token).await
    {
        tracing::warn!("Backend logout failed: {e}");
    }

    if let Err(e) = clear_session(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }

    Redirect::to("/").into_response()
}

// =============================================================================
// Helpers
// =============================================================================

/// Store the token and decide where the fresh session lands.
///
/// A pending resume intent is consumed exactly once; with none present, a
/// fresh login goes home.
async fn establish_session(session: &Session, token: &str) -> Response {
    if let Err(e) = set_session_token(session, token).await {
        tracing::error!("Failed to persist session token: {e}");
        return LoginTemplate {
            current_user: None,
            error: Some("Session unavailable, please try again".to_owned()),
        }
        .into_response();
    }

    let intent: Option<ResumeIntent> = session
        .remove(session_keys::RESUME)
        .await
        .ok()
        .flatten();

    match intent {
        Some(intent) => {
            // Pick the checkout back up where the login detour started
            let stage: CheckoutStage = session
                .get(session_keys::CHECKOUT)
                .await
                .ok()
                .flatten()
                .unwrap_or_default();
            if let Ok(resumed) = stage.resume()
                && let Err(e) = session.insert(session_keys::CHECKOUT, resumed).await
            {
                tracing::error!("Failed to save checkout stage: {e}");
            }

            Redirect::to(intent.path()).into_response()
        }
        None => Redirect::to("/").into_response(),
    }
}
