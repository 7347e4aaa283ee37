//! The franchisee dashboard: the owned franchise, its stores, and store
//! lifecycle.
//!
//! The caller's franchise is resolved from the `objectId` on their
//! franchisee role. Closing a store is a two-step confirmation (see
//! [`crate::models::confirm`]); creating one is a plain form. Visitors
//! without a franchisee role see the franchising pitch instead.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use jwt_pizza_core::StoreId;

use crate::api::types::Franchise;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, PendingClose, session_keys};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// One store row, with revenue where the backend reports it.
pub struct StoreRowView {
    pub id: String,
    pub name: String,
    pub revenue: String,
}

/// The owned franchise, prepared for display.
pub struct FranchiseView {
    pub id: String,
    pub name: String,
    pub admins: Vec<String>,
    pub stores: Vec<StoreRowView>,
}

impl From<&Franchise> for FranchiseView {
    fn from(franchise: &Franchise) -> Self {
        Self {
            id: franchise.id.to_string(),
            name: franchise.name.clone(),
            admins: franchise
                .admins
                .iter()
                .map(|admin| match &admin.name {
                    Some(name) => format!("{name} ({})", admin.email),
                    None => admin.email.to_string(),
                })
                .collect(),
            stores: franchise
                .stores
                .iter()
                .map(|store| StoreRowView {
                    id: store.id.to_string(),
                    name: store.name.clone(),
                    revenue: store
                        .total_revenue
                        .map_or_else(String::new, |revenue| format!("{revenue} ₿")),
                })
                .collect(),
        }
    }
}

/// Franchisee dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/franchise.html")]
pub struct FranchiseDashboardTemplate {
    pub current_user: Option<CurrentUser>,
    pub franchise: Option<FranchiseView>,
}

/// Create-store form template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/create_store.html")]
pub struct CreateStoreTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
}

/// Close confirmation template, shared with the admin dashboard.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/close_confirm.html")]
pub struct CloseConfirmTemplate {
    pub current_user: Option<CurrentUser>,
    pub kind: &'static str,
    pub name: String,
    pub action: String,
    pub cancel: &'static str,
}

// =============================================================================
// Form Types
// =============================================================================

/// Create-store form data.
#[derive(Debug, Deserialize)]
pub struct CreateStoreForm {
    pub name: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the franchisee dashboard.
///
/// Returning here is also the Cancel path out of a close confirmation, so
/// any pending close slot is dropped.
#[instrument(skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    session: Session,
) -> Result<FranchiseDashboardTemplate> {
    let _: Option<PendingClose> = session.remove(session_keys::PENDING_CLOSE).await?;

    let franchise = match current.user.franchise_id() {
        Some(franchise_id) => {
            let franchise = state.api().get_franchise(&current.token, franchise_id).await?;
            Some(FranchiseView::from(&franchise))
        }
        None => None,
    };

    Ok(FranchiseDashboardTemplate {
        current_user: Some(current),
        franchise,
    })
}

/// Display the create-store form.
#[instrument(skip_all)]
pub async fn create_store_page(RequireAuth(current): RequireAuth) -> impl IntoResponse {
    CreateStoreTemplate {
        current_user: Some(current),
        error: None,
    }
}

/// Create a store under the caller's franchise.
///
/// The backend answers with the new store; the dashboard re-fetch reflects
/// it in the list.
#[instrument(skip_all)]
pub async fn create_store(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Form(form): Form<CreateStoreForm>,
) -> Result<Response> {
    let Some(franchise_id) = current.user.franchise_id().cloned() else {
        return Err(AppError::Unauthorized("no franchise role".to_owned()));
    };

    match state
        .api()
        .create_store(&current.token, &franchise_id, &form.name)
        .await
    {
        Ok(store) => {
            tracing::info!("Created store {} ({})", store.name, store.id);
            Ok(Redirect::to("/franchise-dashboard").into_response())
        }
        Err(e) => {
            tracing::warn!("Store creation failed: {e}");
            Ok(CreateStoreTemplate {
                current_user: Some(current),
                error: Some(e.to_string()),
            }
            .into_response())
        }
    }
}

/// First Close click: open the confirmation view naming the store.
///
/// Arms the pending-close slot; no DELETE happens here.
#[instrument(skip_all, fields(store_id = %store_id))]
pub async fn close_store_page(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    session: Session,
    Path(store_id): Path<String>,
) -> Result<Response> {
    let store_id = StoreId::from(store_id);
    let Some(franchise_id) = current.user.franchise_id().cloned() else {
        return Err(AppError::Unauthorized("no franchise role".to_owned()));
    };

    let franchise = state.api().get_franchise(&current.token, &franchise_id).await?;
    let Some(store) = franchise.stores.iter().find(|s| s.id == store_id) else {
        return Err(AppError::NotFound(format!("store: {store_id}")));
    };

    let pending = PendingClose::Store {
        franchise_id,
        id: store.id.clone(),
        name: store.name.clone(),
    };
    session.insert(session_keys::PENDING_CLOSE, &pending).await?;

    Ok(CloseConfirmTemplate {
        current_user: Some(current),
        kind: "store",
        name: store.name.clone(),
        action: format!("/franchise-dashboard/store/{store_id}/close"),
        cancel: "/franchise-dashboard",
    }
    .into_response())
}

/// Second Close click: consume the slot and issue exactly one DELETE.
///
/// A confirm with no matching slot (stale form, replay) goes back to the
/// dashboard without touching the backend.
#[instrument(skip_all, fields(store_id = %store_id))]
pub async fn close_store(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    session: Session,
    Path(store_id): Path<String>,
) -> Result<Redirect> {
    let store_id = StoreId::from(store_id);
    let Some(franchise_id) = current.user.franchise_id().cloned() else {
        return Err(AppError::Unauthorized("no franchise role".to_owned()));
    };

    let pending: Option<PendingClose> = session.remove(session_keys::PENDING_CLOSE).await?;

    if pending.is_some_and(|slot| slot.authorizes_store(&franchise_id, &store_id)) {
        state
            .api()
            .delete_store(&current.token, &franchise_id, &store_id)
            .await?;
    } else {
        tracing::debug!("Store close without matching confirmation; ignoring");
    }

    Ok(Redirect::to("/franchise-dashboard"))
}
