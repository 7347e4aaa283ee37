//! Domain models for the storefront workflow.
//!
//! Everything the session carries between requests lives here: the
//! authenticated identity, the cart, the checkout stage, the pending
//! close confirmation, and the post-login resume intent.

pub mod cart;
pub mod checkout;
pub mod confirm;
pub mod session;

pub use cart::{Cart, StoreChoice};
pub use checkout::{CheckoutStage, StageError};
pub use confirm::PendingClose;
pub use session::{CurrentUser, ResumeIntent, session_keys};
