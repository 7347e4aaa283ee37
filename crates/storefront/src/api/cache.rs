//! Cache values for the order API client.

use super::types::MenuItem;

/// Values stored in the client's moka cache.
///
/// Only read-only data is cached. The menu is fetched once per view and
/// never mutated by this client; everything session- or list-shaped is
/// re-fetched so renders always reflect the backend.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Menu(Vec<MenuItem>),
}
