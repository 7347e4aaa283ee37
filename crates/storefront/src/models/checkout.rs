//! The checkout workflow state machine.
//!
//! A session moves through these stages while ordering:
//!
//! ```text
//! Browsing -> Selecting -> ConfirmingCheckout -> SubmittingOrder -> Delivered -> Verifying
//!                 ^               |    ^                |
//!                 |   (anonymous) v    | (resume)       | (payment declined)
//!                 |          AwaitingAuth               |
//!                 +---- cancel / order more <-----------+
//! ```
//!
//! Transitions consume the current stage and either yield the next one or a
//! [`StageError`] naming both ends; the routes translate errors into
//! redirects back to the last coherent view. The stage is serialized into
//! the session so the machine survives the login round-trip.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Where a session currently is in the ordering workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutStage {
    /// Outside the order flow (home, docs, dashboards).
    #[default]
    Browsing,
    /// On the order view, picking a store and pizzas.
    Selecting,
    /// On the payment view, cart frozen, waiting for Pay now or Cancel.
    ConfirmingCheckout,
    /// Bounced to login mid-checkout; the cart is retained.
    AwaitingAuth,
    /// Order request in flight.
    SubmittingOrder,
    /// Order committed; the receipt (JWT) is on display.
    Delivered,
    /// Receipt verification requested from the Delivered view.
    Verifying,
}

/// An attempted transition that the workflow does not allow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} from the {from} step")]
pub struct StageError {
    pub from: CheckoutStage,
    pub action: &'static str,
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Browsing => "browsing",
            Self::Selecting => "menu",
            Self::ConfirmingCheckout => "payment",
            Self::AwaitingAuth => "login",
            Self::SubmittingOrder => "order submission",
            Self::Delivered => "delivery",
            Self::Verifying => "verification",
        };
        f.write_str(name)
    }
}

impl CheckoutStage {
    const fn reject(self, action: &'static str) -> StageError {
        StageError { from: self, action }
    }

    /// Enter the order view. Legal from anywhere - the menu is always a
    /// navigation away - and idempotent.
    #[must_use]
    pub const fn start_selecting(self) -> Self {
        Self::Selecting
    }

    /// Move to the checkout confirmation. The caller has already checked
    /// the cart guard; this only polices the workflow shape.
    ///
    /// # Errors
    ///
    /// Rejected unless currently selecting (or already confirming, which
    /// happens on a reload of the payment view).
    pub const fn confirm(self) -> Result<Self, StageError> {
        match self {
            Self::Selecting | Self::ConfirmingCheckout | Self::AwaitingAuth => {
                Ok(Self::ConfirmingCheckout)
            }
            other => Err(other.reject("check out")),
        }
    }

    /// An anonymous visitor hit the payment view; hold the flow while they
    /// authenticate.
    ///
    /// # Errors
    ///
    /// Rejected outside the confirmation step.
    pub const fn require_auth(self) -> Result<Self, StageError> {
        match self {
            Self::ConfirmingCheckout | Self::AwaitingAuth => Ok(Self::AwaitingAuth),
            other => Err(other.reject("ask for login")),
        }
    }

    /// Login succeeded; pick the flow back up at the confirmation step.
    ///
    /// # Errors
    ///
    /// Rejected unless a login was pending.
    pub const fn resume(self) -> Result<Self, StageError> {
        match self {
            Self::AwaitingAuth => Ok(Self::ConfirmingCheckout),
            other => Err(other.reject("resume checkout")),
        }
    }

    /// Pay now: hand the order to the backend.
    ///
    /// # Errors
    ///
    /// Rejected outside the confirmation step.
    pub const fn submit(self) -> Result<Self, StageError> {
        match self {
            Self::ConfirmingCheckout => Ok(Self::SubmittingOrder),
            other => Err(other.reject("pay")),
        }
    }

    /// The backend committed the order.
    ///
    /// # Errors
    ///
    /// Rejected unless an order was in flight.
    pub const fn delivered(self) -> Result<Self, StageError> {
        match self {
            Self::SubmittingOrder => Ok(Self::Delivered),
            other => Err(other.reject("deliver")),
        }
    }

    /// The backend declined the order; back to the confirmation view with
    /// the cart untouched.
    ///
    /// # Errors
    ///
    /// Rejected unless an order was in flight.
    pub const fn payment_failed(self) -> Result<Self, StageError> {
        match self {
            Self::SubmittingOrder => Ok(Self::ConfirmingCheckout),
            other => Err(other.reject("fail payment")),
        }
    }

    /// Verify the receipt. Read-only with respect to the order.
    ///
    /// # Errors
    ///
    /// Rejected unless a receipt is on display.
    pub const fn verify(self) -> Result<Self, StageError> {
        match self {
            Self::Delivered | Self::Verifying => Ok(Self::Verifying),
            other => Err(other.reject("verify")),
        }
    }

    /// Cancel from the confirmation view: back to the menu with no network
    /// call. The caller discards the pending selection.
    ///
    /// # Errors
    ///
    /// Rejected outside the confirmation step.
    pub const fn cancel(self) -> Result<Self, StageError> {
        match self {
            Self::ConfirmingCheckout | Self::AwaitingAuth => Ok(Self::Selecting),
            other => Err(other.reject("cancel")),
        }
    }

    /// "Order more" from the delivery view: back to the menu for a fresh
    /// selection.
    ///
    /// # Errors
    ///
    /// Rejected unless a receipt is on display.
    pub const fn order_more(self) -> Result<Self, StageError> {
        match self {
            Self::Delivered | Self::Verifying => Ok(Self::Selecting),
            other => Err(other.reject("order more")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let stage = CheckoutStage::Browsing.start_selecting();
        let stage = stage.confirm().unwrap();
        let stage = stage.submit().unwrap();
        let stage = stage.delivered().unwrap();
        assert_eq!(stage, CheckoutStage::Delivered);
        assert_eq!(stage.verify().unwrap(), CheckoutStage::Verifying);
    }

    #[test]
    fn test_anonymous_detour_resumes_at_confirmation() {
        let stage = CheckoutStage::Selecting.confirm().unwrap();
        let stage = stage.require_auth().unwrap();
        assert_eq!(stage, CheckoutStage::AwaitingAuth);
        let stage = stage.resume().unwrap();
        assert_eq!(stage, CheckoutStage::ConfirmingCheckout);
    }

    #[test]
    fn test_payment_failure_returns_to_confirmation() {
        let stage = CheckoutStage::ConfirmingCheckout.submit().unwrap();
        let stage = stage.payment_failed().unwrap();
        assert_eq!(stage, CheckoutStage::ConfirmingCheckout);
        // and the user can retry
        assert!(stage.submit().is_ok());
    }

    #[test]
    fn test_cancel_only_from_confirmation() {
        assert_eq!(
            CheckoutStage::ConfirmingCheckout.cancel().unwrap(),
            CheckoutStage::Selecting
        );
        assert!(CheckoutStage::Delivered.cancel().is_err());
        assert!(CheckoutStage::Browsing.cancel().is_err());
    }

    #[test]
    fn test_cannot_pay_without_confirmation() {
        assert!(CheckoutStage::Browsing.submit().is_err());
        assert!(CheckoutStage::Selecting.submit().is_err());
        assert!(CheckoutStage::Delivered.submit().is_err());
    }

    #[test]
    fn test_cannot_resume_without_pending_login() {
        assert!(CheckoutStage::Selecting.resume().is_err());
        assert!(CheckoutStage::Browsing.resume().is_err());
    }

    #[test]
    fn test_order_more_clears_back_to_menu() {
        assert_eq!(
            CheckoutStage::Delivered.order_more().unwrap(),
            CheckoutStage::Selecting
        );
        assert_eq!(
            CheckoutStage::Verifying.order_more().unwrap(),
            CheckoutStage::Selecting
        );
    }

    #[test]
    fn test_error_names_both_ends() {
        let err = CheckoutStage::Browsing.submit().unwrap_err();
        assert_eq!(err.to_string(), "cannot pay from the browsing step");
    }

    #[test]
    fn test_confirm_is_reload_safe() {
        assert!(CheckoutStage::ConfirmingCheckout.confirm().is_ok());
    }

    #[test]
    fn test_session_roundtrip() {
        let json = serde_json::to_string(&CheckoutStage::AwaitingAuth).unwrap();
        let back: CheckoutStage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CheckoutStage::AwaitingAuth);
    }
}
