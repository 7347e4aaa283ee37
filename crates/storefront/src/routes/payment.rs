//! Checkout confirmation, payment, delivery, and verification.
//!
//! The confirmation view freezes the cart and offers Pay now or Cancel.
//! Anonymous visitors are detoured through login with a resume intent and
//! come back here with the cart intact. A declined payment keeps the cart
//! and the view; success clears the cart and moves to the delivery view,
//! which shows the committed order's total and its JWT and offers a
//! read-only verification.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::api::types::OrderReceipt;
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, ResumeIntent, session_keys};
use crate::state::AppState;

use super::order::{CartLineView, cart_lines, load_cart, load_stage, save_cart, save_stage};

// =============================================================================
// Templates
// =============================================================================

/// Checkout confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "order/payment.html")]
pub struct PaymentTemplate {
    pub current_user: Option<CurrentUser>,
    pub lines: Vec<CartLineView>,
    pub item_count: usize,
    pub total: String,
    pub store_name: String,
    pub error: Option<String>,
}

/// Verification outcome display data.
pub struct VerifyView {
    pub message: String,
    pub payload: Option<String>,
}

/// Delivery template: the committed order and its JWT.
#[derive(Template, WebTemplate)]
#[template(path = "order/delivery.html")]
pub struct DeliveryTemplate {
    pub current_user: Option<CurrentUser>,
    pub order_id: String,
    pub total: String,
    pub jwt: String,
    pub verify: Option<VerifyView>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the checkout confirmation.
///
/// Requires a checkout-ready cart. An anonymous visitor is redirected to
/// login, with the pending cart retained and a resume intent stored so a
/// successful login returns exactly here.
#[instrument(skip_all)]
pub async fn confirm(
    State(_state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    session: Session,
) -> Result<Response> {
    let cart = load_cart(&session).await;
    if !cart.can_checkout() {
        return Ok(Redirect::to("/menu").into_response());
    }

    let stage = load_stage(&session).await;
    let Ok(confirming) = stage.confirm() else {
        tracing::debug!("Payment view rejected from stage {stage}");
        return Ok(Redirect::to("/menu").into_response());
    };

    if current_user.is_none() {
        // Hold the flow while the visitor authenticates
        let awaiting = confirming.require_auth().unwrap_or(confirming);
        save_stage(&session, awaiting).await?;
        session
            .insert(session_keys::RESUME, ResumeIntent::Payment)
            .await?;
        return Ok(Redirect::to("/login").into_response());
    }

    save_stage(&session, confirming).await?;

    let store_name = cart
        .store()
        .map_or_else(String::new, |choice| choice.store_name.clone());

    Ok(PaymentTemplate {
        current_user,
        lines: cart_lines(&cart),
        item_count: cart.item_count(),
        total: cart.total_price().to_string(),
        store_name,
        error: None,
    }
    .into_response())
}

/// Pay now: submit the order.
///
/// Success clears the cart and shows the delivery view. Failure surfaces
/// the backend's message verbatim and keeps the cart so the user can retry
/// or cancel. No retries happen here.
#[instrument(skip_all)]
pub async fn pay(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    session: Session,
) -> Result<Response> {
    let Some(current) = current_user else {
        // Session expired between confirmation and payment
        let stage = load_stage(&session).await;
        if let Ok(awaiting) = stage.require_auth() {
            save_stage(&session, awaiting).await?;
            session
                .insert(session_keys::RESUME, ResumeIntent::Payment)
                .await?;
        }
        return Ok(Redirect::to("/login").into_response());
    };

    let cart = load_cart(&session).await;
    let Some(order) = cart.to_order() else {
        return Ok(Redirect::to("/menu").into_response());
    };

    let stage = load_stage(&session).await;
    let Ok(submitting) = stage.submit() else {
        tracing::debug!("Pay rejected from stage {stage}");
        return Ok(Redirect::to("/menu").into_response());
    };

    match state.api().submit_order(&current.token, &order).await {
        Ok(receipt) => {
            save_stage(&session, submitting.delivered().unwrap_or(submitting)).await?;
            session.insert(session_keys::RECEIPT, &receipt).await?;

            let mut cleared = cart;
            cleared.clear();
            save_cart(&session, &cleared).await?;

            Ok(Redirect::to("/delivery").into_response())
        }
        Err(e) => {
            tracing::warn!("Order submission failed: {e}");
            save_stage(&session, submitting.payment_failed().unwrap_or(submitting)).await?;

            let store_name = cart
                .store()
                .map_or_else(String::new, |choice| choice.store_name.clone());

            Ok(PaymentTemplate {
                current_user: Some(current),
                lines: cart_lines(&cart),
                item_count: cart.item_count(),
                total: cart.total_price().to_string(),
                store_name,
                error: Some(e.to_string()),
            }
            .into_response())
        }
    }
}

/// Cancel the confirmation: discard the pending selection and go back to
/// the menu. No network call happens here.
#[instrument(skip_all)]
pub async fn cancel(session: Session) -> Result<Redirect> {
    let stage = load_stage(&session).await;
    match stage.cancel() {
        Ok(selecting) => {
            let mut cart = load_cart(&session).await;
            cart.clear();
            save_cart(&session, &cart).await?;
            save_stage(&session, selecting).await?;
        }
        Err(e) => tracing::debug!("Cancel rejected: {e}"),
    }

    Ok(Redirect::to("/menu"))
}

/// Display the delivery view for the most recent order.
#[instrument(skip_all)]
pub async fn delivery(
    OptionalAuth(current_user): OptionalAuth,
    session: Session,
) -> Result<Response> {
    let Some(receipt) = session
        .get::<OrderReceipt>(session_keys::RECEIPT)
        .await?
    else {
        return Ok(Redirect::to("/menu").into_response());
    };

    Ok(delivery_view(current_user, &receipt, None).into_response())
}

/// Verify the displayed JWT. Read-only; the order state is unaffected.
#[instrument(skip_all)]
pub async fn verify(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    session: Session,
) -> Result<Response> {
    let Some(receipt) = session
        .get::<OrderReceipt>(session_keys::RECEIPT)
        .await?
    else {
        return Ok(Redirect::to("/menu").into_response());
    };

    let stage = load_stage(&session).await;
    match stage.verify() {
        Ok(verifying) => save_stage(&session, verifying).await?,
        Err(e) => tracing::debug!("Verify rejected: {e}"),
    }

    let token = current_user.as_ref().map(|c| c.token.as_str());
    let verify = match state.api().verify_order(token, &receipt.jwt).await {
        Ok(result) => VerifyView {
            message: result.message,
            payload: result
                .payload
                .as_ref()
                .and_then(|p| serde_json::to_string_pretty(p).ok()),
        },
        Err(e) => {
            tracing::warn!("Order verification failed: {e}");
            VerifyView {
                message: "invalid".to_owned(),
                payload: None,
            }
        }
    };

    Ok(delivery_view(current_user, &receipt, Some(verify)).into_response())
}

// =============================================================================
// Helpers
// =============================================================================

fn delivery_view(
    current_user: Option<CurrentUser>,
    receipt: &OrderReceipt,
    verify: Option<VerifyView>,
) -> DeliveryTemplate {
    DeliveryTemplate {
        current_user,
        order_id: receipt
            .order
            .id
            .as_ref()
            .map_or_else(String::new, ToString::to_string),
        total: receipt.order.total().to_string(),
        jwt: receipt.jwt.clone(),
        verify,
    }
}
