//! Session-related types.
//!
//! The session cookie is the client's only persisted state. The bearer
//! token is stored under the key `token` and re-validated against
//! `GET /api/user/me` when a request arrives, so a restarted browser
//! resumes its session without re-entering credentials and a stale token
//! silently degrades to an anonymous visit.

use serde::{Deserialize, Serialize};

use crate::api::types::User;

/// The authenticated identity resolved for the current request.
///
/// Produced by the auth extractors from the persisted token; never stored
/// directly in the session.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The user the token belongs to.
    pub user: User,
    /// The bearer token, read at send time by every authenticated call.
    pub token: String,
}

impl CurrentUser {
    /// Initials shown in the navigation badge.
    #[must_use]
    pub fn initials(&self) -> String {
        self.user.initials()
    }
}

/// Where to send the user after a successful login.
///
/// A single-slot intent: stored when an anonymous visitor is bounced to the
/// login page mid-flow, consumed exactly once after authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResumeIntent {
    /// Resume the checkout confirmation with the pending cart.
    Payment,
}

impl ResumeIntent {
    /// The path the intent resumes at.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Payment => "/payment",
        }
    }
}

/// Session keys for workflow state.
pub mod session_keys {
    /// Key for the persisted bearer token.
    pub const TOKEN: &str = "token";

    /// Key for the cart selection.
    pub const CART: &str = "cart";

    /// Key for the checkout stage.
    pub const CHECKOUT: &str = "checkout";

    /// Key for the single-slot post-login resume intent.
    pub const RESUME: &str = "resume";

    /// Key for a pending close confirmation (franchise or store).
    pub const PENDING_CLOSE: &str = "pending_close";

    /// Key for the receipt of the most recent order (JWT + committed order).
    pub const RECEIPT: &str = "receipt";
}
