//! Keyed multi-tenant store for annotation records
//!
//! Maps `(namespace, entity-kind, key)` to JSON records on disk. Every
//! collection is parameterized by an opaque per-user namespace; switching
//! users closes every collection of the old namespace before any collection
//! of the new one opens, so no cross-namespace read is possible even
//! transiently.

use serde::{Deserialize, Serialize};

pub mod favorites;
pub mod store;
pub mod table;

pub use favorites::FavoritesWatch;
pub use store::{PageKind, Store};
pub use table::{page_key, PageTable, Table};

/// Error types for store operations.
///
/// Absent keys are not errors; `get` returns `Ok(None)` and `delete` on a
/// missing key is a no-op.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unable to resolve local data directory")]
    NoDataDirectory,
    #[error("no user namespace is open")]
    NamespaceClosed,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Opaque per-user partition of the store.
///
/// All collections are keyed by it. [`Namespace::anonymous`] is the reserved
/// fallback for unauthenticated use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The reserved namespace used before any account is signed in.
    pub fn anonymous() -> Self {
        Self("anonymous".to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_namespace_is_stable() {
        assert_eq!(Namespace::anonymous().as_str(), "anonymous");
        assert_eq!(Namespace::anonymous(), Namespace::new("anonymous"));
    }
}
