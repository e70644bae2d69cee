//! User session and identity hand-off
//!
//! Binds the store to whoever is currently signed in. Identity is injected
//! rather than read from a global; on an identity change the session drives
//! the store's namespace switch, which closes every old-namespace collection
//! before opening any new one.

use std::sync::Arc;

use margin_storage::{Namespace, Store, StoreResult};
use tracing::debug;

/// Current-user capability. The anonymous namespace stands in while no
/// account is signed in.
pub trait Identity {
    fn current(&self) -> Namespace;
}

/// A fixed identity, useful for tests and for single-user deployments.
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub Namespace);

impl Identity for StaticIdentity {
    fn current(&self) -> Namespace {
        self.0.clone()
    }
}

/// Store bound to the current identity.
pub struct Session<I: Identity> {
    store: Arc<Store>,
    identity: I,
}

impl<I: Identity> Session<I> {
    /// Open the store under the current identity's namespace.
    pub fn open(store: Arc<Store>, identity: I) -> StoreResult<Self> {
        store.switch_user(&identity.current())?;
        Ok(Self { store, identity })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// React to a change of identity (sign-in, sign-out, account switch).
    ///
    /// Idempotent when the namespace did not actually change. The switch is
    /// sequential: old collections are fully released before any new one
    /// opens.
    pub fn handle_identity_change(&self) -> StoreResult<()> {
        let namespace = self.identity.current();
        debug!(namespace = namespace.as_str(), "identity changed");
        self.store.switch_user(&namespace)
    }
}
