//! Typed JSON caching helpers over a [`SessionStore`].
//!
//! All entries are best-effort read caches: malformed JSON reads as a miss
//! and is never an error.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::store::SessionStore;

/// Key for the persisted session (tokens + user).
pub const SESSION_KEY: &str = "moctezuma-session";

/// Key for the cached cart code.
pub const CART_CODE_KEY: &str = "moctezuma-cart-code";

/// Key for the last-fetched cart list.
pub const CART_CACHE_KEY: &str = "moctezuma-cart-cache";

/// Key for the cached detail snapshot of one record.
pub fn record_detail_key(slug: &str) -> String {
    format!("record-detail:{slug}")
}

/// Read and deserialize a cached value. Absent or malformed entries are a
/// miss.
pub fn read_json<T: DeserializeOwned>(store: &dyn SessionStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    serde_json::from_str(&raw).ok()
}

/// Serialize and write a value. Serialization failures are logged and the
/// entry is left untouched.
pub fn write_json<T: Serialize>(store: &dyn SessionStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => store.set(key, &raw),
        Err(e) => warn!(key, error = %e, "cannot serialize cache entry"),
    }
}
