//! The admin dashboard: franchise and user administration.
//!
//! Both lists are paginated and filterable by name (`*term*` wildcards,
//! built by the API client). Closing a franchise is a two-step
//! confirmation; deleting a user is a single action whose next render
//! excludes the removed user. The dashboard is offered based on the
//! caller's roles, but the backend remains the authority - a non-admin's
//! calls simply come back rejected and are surfaced.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use jwt_pizza_core::{FranchiseId, UserId};

use crate::api::types::{Franchise, User};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, PendingClose, session_keys};
use crate::state::AppState;

use super::franchise::CloseConfirmTemplate;

/// Franchises shown per page. The franchise cards are tall, so the page
/// size is smaller than the user table's.
const FRANCHISE_PAGE_LIMIT: u32 = 3;

/// Users shown per page.
const USER_PAGE_LIMIT: u32 = 10;

// =============================================================================
// View Types
// =============================================================================

/// One store row inside a franchise card.
pub struct AdminStoreView {
    pub name: String,
}

/// One franchise card.
pub struct FranchiseRowView {
    pub id: String,
    pub name: String,
    pub admins: Vec<String>,
    pub stores: Vec<AdminStoreView>,
}

impl From<&Franchise> for FranchiseRowView {
    fn from(franchise: &Franchise) -> Self {
        Self {
            id: franchise.id.to_string(),
            name: franchise.name.clone(),
            admins: franchise
                .admins
                .iter()
                .map(|admin| admin.email.to_string())
                .collect(),
            stores: franchise
                .stores
                .iter()
                .map(|store| AdminStoreView {
                    name: store.name.clone(),
                })
                .collect(),
        }
    }
}

/// One user row.
pub struct UserRowView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl From<&User> for UserRowView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.to_string(),
            roles: user
                .roles
                .iter()
                .map(|assignment| assignment.role.to_string())
                .collect(),
        }
    }
}

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/admin.html")]
pub struct AdminTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
    pub franchises: Vec<FranchiseRowView>,
    pub franchise_filter: String,
    pub franchise_page: u32,
    pub franchise_more: bool,
    pub users: Vec<UserRowView>,
    pub user_filter: String,
    pub user_page: u32,
    pub user_more: bool,
}

/// Create-franchise form template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/create_franchise.html")]
pub struct CreateFranchiseTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
}

// =============================================================================
// Query / Form Types
// =============================================================================

/// Dashboard pagination and filter state, carried in the URL.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub franchise_page: u32,
    #[serde(default)]
    pub franchise_filter: String,
    #[serde(default)]
    pub user_page: u32,
    #[serde(default)]
    pub user_filter: String,
}

/// Create-franchise form data.
#[derive(Debug, Deserialize)]
pub struct CreateFranchiseForm {
    pub name: String,
    pub admin_email: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the admin dashboard.
///
/// Filters re-issue the list fetches with `*term*` wildcard patterns; an
/// empty filter asks for everything. Returning here is also the Cancel
/// path out of a close confirmation, so any pending slot is dropped. A
/// backend rejection (non-admin caller) renders as an error banner over
/// empty lists rather than replacing the view.
#[instrument(skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    session: Session,
    Query(query): Query<DashboardQuery>,
) -> Result<AdminTemplate> {
    let _: Option<PendingClose> = session.remove(session_keys::PENDING_CLOSE).await?;

    let franchise_filter = query.franchise_filter.trim().to_owned();
    let user_filter = query.user_filter.trim().to_owned();

    let mut error = None;

    let (franchises, franchise_more) = match state
        .api()
        .list_franchises(
            Some(query.franchise_page),
            Some(FRANCHISE_PAGE_LIMIT),
            filter_arg(&franchise_filter),
        )
        .await
    {
        Ok(page) => (
            page.franchises.iter().map(FranchiseRowView::from).collect(),
            page.more,
        ),
        Err(e) => {
            tracing::warn!("Franchise list fetch failed: {e}");
            error = Some(e.to_string());
            (Vec::new(), false)
        }
    };

    let (users, user_more) = match state
        .api()
        .list_users(
            &current.token,
            query.user_page,
            USER_PAGE_LIMIT,
            filter_arg(&user_filter),
        )
        .await
    {
        Ok(page) => (page.users.iter().map(UserRowView::from).collect(), page.more),
        Err(e) => {
            tracing::warn!("User list fetch failed: {e}");
            error = error.or(Some(e.to_string()));
            (Vec::new(), false)
        }
    };

    Ok(AdminTemplate {
        current_user: Some(current),
        error,
        franchises,
        franchise_filter,
        franchise_page: query.franchise_page,
        franchise_more,
        users,
        user_filter,
        user_page: query.user_page,
        user_more,
    })
}

/// Display the create-franchise form.
#[instrument(skip_all)]
pub async fn create_franchise_page(RequireAuth(current): RequireAuth) -> impl IntoResponse {
    CreateFranchiseTemplate {
        current_user: Some(current),
        error: None,
    }
}

/// Create a franchise with its first admin.
#[instrument(skip_all)]
pub async fn create_franchise(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Form(form): Form<CreateFranchiseForm>,
) -> Result<Response> {
    match state
        .api()
        .create_franchise(&current.token, &form.name, &form.admin_email)
        .await
    {
        Ok(franchise) => {
            tracing::info!("Created franchise {} ({})", franchise.name, franchise.id);
            Ok(Redirect::to("/admin-dashboard").into_response())
        }
        Err(e) => {
            tracing::warn!("Franchise creation failed: {e}");
            Ok(CreateFranchiseTemplate {
                current_user: Some(current),
                error: Some(e.to_string()),
            }
            .into_response())
        }
    }
}

/// First Close click: open the confirmation view naming the franchise.
#[instrument(skip_all, fields(franchise_id = %franchise_id))]
pub async fn close_franchise_page(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    session: Session,
    Path(franchise_id): Path<String>,
) -> Result<Response> {
    let franchise_id = FranchiseId::from(franchise_id);
    let franchise = state
        .api()
        .get_franchise(&current.token, &franchise_id)
        .await?;

    let pending = PendingClose::Franchise {
        id: franchise.id.clone(),
        name: franchise.name.clone(),
    };
    session.insert(session_keys::PENDING_CLOSE, &pending).await?;

    Ok(CloseConfirmTemplate {
        current_user: Some(current),
        kind: "franchise",
        name: franchise.name,
        action: format!("/admin-dashboard/franchise/{franchise_id}/close"),
        cancel: "/admin-dashboard",
    }
    .into_response())
}

/// Second Close click: consume the slot and issue exactly one DELETE.
#[instrument(skip_all, fields(franchise_id = %franchise_id))]
pub async fn close_franchise(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    session: Session,
    Path(franchise_id): Path<String>,
) -> Result<Redirect> {
    let franchise_id = FranchiseId::from(franchise_id);
    let pending: Option<PendingClose> = session.remove(session_keys::PENDING_CLOSE).await?;

    if pending.is_some_and(|slot| slot.authorizes_franchise(&franchise_id)) {
        state
            .api()
            .delete_franchise(&current.token, &franchise_id)
            .await?;
    } else {
        tracing::debug!("Franchise close without matching confirmation; ignoring");
    }

    Ok(Redirect::to("/admin-dashboard"))
}

/// Delete a user. The redirect re-fetches the list, which excludes the
/// removed user.
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(user_id): Path<String>,
) -> Result<Redirect> {
    let user_id = UserId::from(user_id);
    state.api().delete_user(&current.token, &user_id).await?;

    Ok(Redirect::to("/admin-dashboard"))
}

// =============================================================================
// Helpers
// =============================================================================

/// An empty filter means "no filter" to the client (which sends `*`).
fn filter_arg(filter: &str) -> Option<&str> {
    if filter.is_empty() { None } else { Some(filter) }
}
