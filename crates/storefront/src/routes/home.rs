//! Home page, API docs, and the 404 fallback.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use tracing::instrument;

use crate::api::types::ApiDocs;
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub current_user: Option<CurrentUser>,
}

/// API docs template.
#[derive(Template, WebTemplate)]
#[template(path = "docs.html")]
pub struct DocsTemplate {
    pub current_user: Option<CurrentUser>,
    pub docs: ApiDocs,
}

/// 404 template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub current_user: Option<CurrentUser>,
}

/// Display the home page.
#[instrument(skip_all)]
pub async fn home(OptionalAuth(current_user): OptionalAuth) -> impl IntoResponse {
    HomeTemplate { current_user }
}

/// Display the API catalog, rendered verbatim from `GET /api/docs`.
#[instrument(skip_all)]
pub async fn docs(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
) -> Result<DocsTemplate> {
    let docs = state.api().docs().await?;
    Ok(DocsTemplate { current_user, docs })
}

/// Fallback for unmatched routes: the "Oops" view, not a crash.
#[instrument(skip_all)]
pub async fn not_found(OptionalAuth(current_user): OptionalAuth) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NotFoundTemplate { current_user })
}
