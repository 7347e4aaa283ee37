//! Shared newtype wrappers.

pub mod email;
pub mod id;
pub mod price;
pub mod role;

pub use email::{Email, EmailError};
pub use id::{FranchiseId, MenuItemId, OrderId, StoreId, UserId};
pub use price::{Price, PriceError};
pub use role::{Role, RoleAssignment};
