//! The diner dashboard: profile, order history, and profile editing.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::types::{Order, UpdateUserRequest};
use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireAuth, set_session_token};
use crate::models::CurrentUser;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// One order in the history table.
pub struct OrderRowView {
    pub id: String,
    pub date: String,
    pub items: Vec<String>,
    pub total: String,
}

impl From<&Order> for OrderRowView {
    fn from(order: &Order) -> Self {
        Self {
            id: order
                .id
                .as_ref()
                .map_or_else(String::new, ToString::to_string),
            date: order.date.clone().unwrap_or_default(),
            items: order
                .items
                .iter()
                .map(|item| format!("{} ({} ₿)", item.description, item.price))
                .collect(),
            total: order.total().to_string(),
        }
    }
}

/// Diner dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/diner.html")]
pub struct DinerTemplate {
    pub current_user: Option<CurrentUser>,
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
    pub orders: Vec<OrderRowView>,
    pub page: u32,
    pub has_orders: bool,
}

/// Edit-profile template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/edit_user.html")]
pub struct EditUserTemplate {
    pub current_user: Option<CurrentUser>,
    pub name: String,
    pub email: String,
    pub error: Option<String>,
}

// =============================================================================
// Query / Form Types
// =============================================================================

/// Order history pagination.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub page: u32,
}

/// Profile edit form data.
#[derive(Debug, Deserialize)]
pub struct EditUserForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the diner dashboard.
///
/// The order history is paginated via the `page` query parameter; an empty
/// history renders a friendly prompt rather than an error.
#[instrument(skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Query(query): Query<HistoryQuery>,
) -> Result<DinerTemplate> {
    let history = state
        .api()
        .order_history(&current.token, query.page)
        .await?;

    let roles = current
        .user
        .roles
        .iter()
        .map(|assignment| match &assignment.object_id {
            Some(franchise_id) => format!("{} of franchise {franchise_id}", assignment.role),
            None => assignment.role.to_string(),
        })
        .collect();

    let orders: Vec<OrderRowView> = history.orders.iter().map(OrderRowView::from).collect();

    Ok(DinerTemplate {
        name: current.user.name.clone(),
        email: current.user.email.to_string(),
        roles,
        has_orders: !orders.is_empty(),
        orders,
        page: history.page,
        current_user: Some(current),
    })
}

/// Display the edit-profile dialog.
#[instrument(skip_all)]
pub async fn edit_page(RequireAuth(current): RequireAuth) -> impl IntoResponse {
    EditUserTemplate {
        name: current.user.name.clone(),
        email: current.user.email.to_string(),
        current_user: Some(current),
        error: None,
    }
}

/// Apply a profile edit via `PUT /api/user/:id`.
///
/// The backend answers with a refreshed user and token; the new token
/// replaces the persisted one so the session stays valid.
#[instrument(skip_all)]
pub async fn edit(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    session: Session,
    Form(form): Form<EditUserForm>,
) -> Result<Response> {
    let password = Some(form.password.as_str()).filter(|p| !p.is_empty());
    let update = UpdateUserRequest {
        name: &form.name,
        email: &form.email,
        password,
    };

    match state
        .api()
        .update_user(&current.token, &current.user.id, &update)
        .await
    {
        Ok(auth) => {
            set_session_token(&session, &auth.token).await?;
            Ok(Redirect::to("/diner-dashboard").into_response())
        }
        Err(e) => {
            tracing::warn!("Profile update failed: {e}");
            Ok(EditUserTemplate {
                name: form.name,
                email: form.email,
                current_user: Some(current),
                error: Some(e.to_string()),
            }
            .into_response())
        }
    }
}
