//! Cascading delete with orphaned-asset cleanup
//!
//! Deleting a document or notebook removes its metadata record and every
//! page aggregate, then deletes the audio/image assets those pages
//! referenced. Asset deletion failures are recoverable: the records are
//! already gone and are not rolled back, so callers must treat "record
//! deleted, asset still present" as a possible outcome and retry the cleanup
//! independently.

use std::path::PathBuf;

use margin_storage::{PageKind, Store, StoreError};
use note_model::PageAnnotations;
use tracing::{debug, warn};

use crate::assets::AssetStore;

/// Error types for cascading deletes.
#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    #[error(transparent)]
    Store(#[from] StoreError),
    /// An asset could not be deleted. The annotation records are already
    /// gone and the remaining assets were still attempted; retry the asset
    /// cleanup with the reported path.
    #[error("failed to delete asset {path}: {source}")]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Delete a document, its pages and the assets its pages referenced.
pub fn delete_document(
    store: &Store,
    assets: &dyn AssetStore,
    doc_id: &str,
) -> Result<(), CleanupError> {
    let pages = store.pages(PageKind::Document, doc_id)?;
    let asset_paths = referenced_assets(&pages);

    store.delete_pages(PageKind::Document, doc_id, None)?;
    store.delete_document(doc_id)?;
    debug!(doc_id, pages = pages.len(), "deleted document records");

    delete_assets(assets, asset_paths)
}

/// Delete a notebook, its pages and the assets its pages referenced.
pub fn delete_notebook(
    store: &Store,
    assets: &dyn AssetStore,
    notebook_id: &str,
) -> Result<(), CleanupError> {
    let pages = store.pages(PageKind::Notebook, notebook_id)?;
    let asset_paths = referenced_assets(&pages);

    store.delete_pages(PageKind::Notebook, notebook_id, None)?;
    store.delete_notebook(notebook_id)?;
    debug!(notebook_id, pages = pages.len(), "deleted notebook records");

    delete_assets(assets, asset_paths)
}

/// Asset paths referenced by a set of pages. The store owns none of these;
/// without this sweep they would be orphaned.
fn referenced_assets(pages: &[PageAnnotations]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for page in pages {
        paths.extend(page.audio_notes.iter().map(|n| PathBuf::from(&n.file_path)));
        paths.extend(page.image_notes.iter().map(|n| PathBuf::from(&n.file_path)));
    }
    paths
}

/// Best-effort sweep: every path is attempted even when an earlier one
/// fails, so one bad file does not strand the rest. The first failure is
/// reported once the sweep finishes.
fn delete_assets(assets: &dyn AssetStore, paths: Vec<PathBuf>) -> Result<(), CleanupError> {
    let mut first_failure = None;
    for path in paths {
        if let Err(source) = assets.delete_if_exists(&path) {
            warn!(path = %path.display(), %source, "failed to delete asset");
            if first_failure.is_none() {
                first_failure = Some(CleanupError::Asset { path, source });
            }
        }
    }
    match first_failure {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
