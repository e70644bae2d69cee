//! Margin Core Library
//!
//! Annotation life-cycle logic on top of the keyed store: page
//! insertion/removal with index renumbering, undo/redo for the stroke list
//! under edit, cascading deletes with orphaned-asset cleanup, and the
//! identity-driven store hand-off.

pub mod assets;
pub mod cleanup;
pub mod editor;
pub mod history;
pub mod lifecycle;
pub mod session;

pub use assets::{AssetStore, FsAssetStore};
pub use cleanup::{delete_document, delete_notebook, CleanupError};
pub use editor::AnnotationEditor;
pub use history::{StrokeHistory, DEFAULT_HISTORY_DEPTH};
pub use lifecycle::{LifecycleError, LifecycleResult, PageLifecycle, PageOwner};
pub use session::{Identity, Session, StaticIdentity};
