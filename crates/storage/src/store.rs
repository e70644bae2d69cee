//! Multi-tenant store handle
//!
//! One [`Store`] owns the filesystem root and at most one open namespace at a
//! time. The open namespace holds one typed table per entity kind; the
//! account-switch sequence (close everything old, then open everything new)
//! runs under a single mutex so no cross-namespace read is possible even
//! transiently.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::sync::Mutex;
use tracing::debug;

use note_model::{DocumentMeta, Folder, NotebookMeta, PageAnnotations};

use crate::favorites::FavoritesWatch;
use crate::table::{PageTable, Table};
use crate::{Namespace, StoreError, StoreResult};

/// Which page collection an aggregate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Document,
    Notebook,
}

/// The typed tables of one open namespace.
struct OpenNamespace {
    namespace: Namespace,
    documents: Table<DocumentMeta>,
    notebooks: Table<NotebookMeta>,
    folders: Table<Folder>,
    document_pages: PageTable,
    notebook_pages: PageTable,
}

impl OpenNamespace {
    fn open(root: &Path, namespace: &Namespace) -> StoreResult<Self> {
        let base = root.join(namespace.as_str());
        let open = Self {
            namespace: namespace.clone(),
            documents: Table::open(base.join("documents"))?,
            notebooks: Table::open(base.join("notebooks"))?,
            folders: Table::open(base.join("folders"))?,
            document_pages: PageTable::open(base.join("document_pages"))?,
            notebook_pages: PageTable::open(base.join("notebook_pages"))?,
        };
        debug!(namespace = namespace.as_str(), "opened store namespace");
        Ok(open)
    }

    fn pages(&self, kind: PageKind) -> &PageTable {
        match kind {
            PageKind::Document => &self.document_pages,
            PageKind::Notebook => &self.notebook_pages,
        }
    }
}

/// Durable CRUD over documents, notebooks, folders and their page
/// aggregates, isolated per user namespace.
pub struct Store {
    root: PathBuf,
    state: Mutex<Option<OpenNamespace>>,
    favorites: FavoritesWatch,
}

impl Store {
    /// Create a store rooted at the platform-local data directory.
    pub fn from_default_project() -> StoreResult<Self> {
        let dirs =
            ProjectDirs::from("dev", "Margin", "Margin").ok_or(StoreError::NoDataDirectory)?;
        Ok(Self::with_root(dirs.data_local_dir()))
    }

    /// Create a store rooted at an explicit directory (tests use a tempdir).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), state: Mutex::new(None), favorites: FavoritesWatch::new() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Switch the store to `namespace`.
    ///
    /// Idempotent when the namespace is already open. Otherwise every table
    /// of the previous namespace is closed before any table of the new one
    /// opens; the whole sequence holds the state lock, so concurrent readers
    /// can never observe a mix of the two.
    pub fn switch_user(&self, namespace: &Namespace) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();

        if let Some(open) = state.as_ref() {
            if open.namespace == *namespace {
                return Ok(());
            }
        }

        if let Some(previous) = state.take() {
            debug!(namespace = previous.namespace.as_str(), "closed store namespace");
            drop(previous);
        }

        *state = Some(OpenNamespace::open(&self.root, namespace)?);
        Ok(())
    }

    /// Release every collection of the current namespace.
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap();
        if let Some(previous) = state.take() {
            debug!(namespace = previous.namespace.as_str(), "closed store namespace");
        }
    }

    fn with_open<R>(&self, f: impl FnOnce(&OpenNamespace) -> StoreResult<R>) -> StoreResult<R> {
        let state = self.state.lock().unwrap();
        let open = state.as_ref().ok_or(StoreError::NamespaceClosed)?;
        f(open)
    }

    // --- document metadata ---

    pub fn save_document(&self, meta: &DocumentMeta) -> StoreResult<()> {
        self.with_open(|ns| ns.documents.upsert(&meta.id, meta))
    }

    pub fn document(&self, id: &str) -> StoreResult<Option<DocumentMeta>> {
        self.with_open(|ns| ns.documents.get(id))
    }

    pub fn documents(&self) -> StoreResult<Vec<DocumentMeta>> {
        self.with_open(|ns| ns.documents.list())
    }

    /// Delete a document metadata record. Emits a favorites tick when the
    /// record was a favorite (cascading delete of a favorite).
    pub fn delete_document(&self, id: &str) -> StoreResult<()> {
        let was_favorite = self.with_open(|ns| {
            let was_favorite = ns.documents.get(id)?.is_some_and(|d| d.favorite);
            ns.documents.delete(id)?;
            Ok(was_favorite)
        })?;

        if was_favorite {
            self.favorites.notify();
        }
        Ok(())
    }

    /// Set or clear a document's favorite flag, broadcasting a tick to
    /// favorites subscribers when the flag actually changes.
    pub fn set_favorite(&self, id: &str, favorite: bool) -> StoreResult<()> {
        let changed = self.with_open(|ns| {
            let Some(mut meta) = ns.documents.get(id)? else {
                return Ok(false);
            };
            if meta.favorite == favorite {
                return Ok(false);
            }
            meta.favorite = favorite;
            ns.documents.upsert(id, &meta)?;
            Ok(true)
        })?;

        if changed {
            self.favorites.notify();
        }
        Ok(())
    }

    /// Subscribe to favorites-change ticks. Consumers re-query state; the
    /// tick carries no payload.
    pub fn subscribe_favorites(&self) -> Receiver<()> {
        self.favorites.subscribe()
    }

    // --- notebook metadata ---

    pub fn save_notebook(&self, meta: &NotebookMeta) -> StoreResult<()> {
        self.with_open(|ns| ns.notebooks.upsert(&meta.id, meta))
    }

    pub fn notebook(&self, id: &str) -> StoreResult<Option<NotebookMeta>> {
        self.with_open(|ns| ns.notebooks.get(id))
    }

    pub fn notebooks(&self) -> StoreResult<Vec<NotebookMeta>> {
        self.with_open(|ns| ns.notebooks.list())
    }

    pub fn delete_notebook(&self, id: &str) -> StoreResult<()> {
        self.with_open(|ns| ns.notebooks.delete(id))
    }

    // --- folders ---

    pub fn save_folder(&self, folder: &Folder) -> StoreResult<()> {
        self.with_open(|ns| ns.folders.upsert(&folder.id, folder))
    }

    pub fn folders(&self) -> StoreResult<Vec<Folder>> {
        self.with_open(|ns| ns.folders.list())
    }

    /// Delete a folder record only; the notebooks inside keep their folder
    /// name and are not touched.
    pub fn delete_folder(&self, id: &str) -> StoreResult<()> {
        self.with_open(|ns| ns.folders.delete(id))
    }

    // --- page aggregates ---

    pub fn save_page(&self, kind: PageKind, page: &PageAnnotations) -> StoreResult<()> {
        self.with_open(|ns| ns.pages(kind).save(page))
    }

    pub fn page(
        &self,
        kind: PageKind,
        doc_id: &str,
        page_index: u32,
    ) -> StoreResult<Option<PageAnnotations>> {
        self.with_open(|ns| ns.pages(kind).load(doc_id, page_index))
    }

    pub fn pages(&self, kind: PageKind, doc_id: &str) -> StoreResult<Vec<PageAnnotations>> {
        self.with_open(|ns| ns.pages(kind).load_all(doc_id))
    }

    /// Delete one page if `page_index` is given, else every page under the
    /// document's key prefix.
    pub fn delete_pages(
        &self,
        kind: PageKind,
        doc_id: &str,
        page_index: Option<u32>,
    ) -> StoreResult<()> {
        self.with_open(|ns| ns.pages(kind).delete(doc_id, page_index))
    }
}
