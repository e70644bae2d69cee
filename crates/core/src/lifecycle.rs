//! Page lifecycle management
//!
//! The sole writer of page-count and last-viewed-page metadata. Pages of a
//! document occupy a dense zero-based range `[0, page_count)`; inserting and
//! removing pages keeps that range dense and persists the owning metadata as
//! part of the same logical operation.

use margin_storage::{PageKind, Store, StoreError};
use note_model::{DocumentMeta, NotebookMeta};
use tracing::debug;

/// Error types for structural page operations.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// Removing the last remaining page is rejected, not clamped.
    #[error("cannot remove the last remaining page")]
    LastPage,
    #[error("page index {index} out of range (page count {page_count})")]
    PageOutOfRange { index: u32, page_count: u32 },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Metadata record that owns a set of pages in the store.
///
/// Implemented for both document and notebook metadata so the lifecycle
/// operations work identically over either page collection.
pub trait PageOwner {
    const PAGE_KIND: PageKind;

    fn owner_id(&self) -> &str;
    fn page_count(&self) -> u32;
    fn set_page_count(&mut self, count: u32);
    fn last_viewed_page(&self) -> u32;
    fn set_last_viewed_page(&mut self, index: u32);
    fn persist(&self, store: &Store) -> Result<(), StoreError>;
}

impl PageOwner for DocumentMeta {
    const PAGE_KIND: PageKind = PageKind::Document;

    fn owner_id(&self) -> &str {
        &self.id
    }
    fn page_count(&self) -> u32 {
        self.page_count
    }
    fn set_page_count(&mut self, count: u32) {
        self.page_count = count;
    }
    fn last_viewed_page(&self) -> u32 {
        self.last_viewed_page
    }
    fn set_last_viewed_page(&mut self, index: u32) {
        self.last_viewed_page = index;
    }
    fn persist(&self, store: &Store) -> Result<(), StoreError> {
        store.save_document(self)
    }
}

impl PageOwner for NotebookMeta {
    const PAGE_KIND: PageKind = PageKind::Notebook;

    fn owner_id(&self) -> &str {
        &self.id
    }
    fn page_count(&self) -> u32 {
        self.page_count
    }
    fn set_page_count(&mut self, count: u32) {
        self.page_count = count;
    }
    fn last_viewed_page(&self) -> u32 {
        self.last_viewed_page
    }
    fn set_last_viewed_page(&mut self, index: u32) {
        self.last_viewed_page = index;
    }
    fn persist(&self, store: &Store) -> Result<(), StoreError> {
        store.save_notebook(self)
    }
}

/// Structural page operations over one store.
pub struct PageLifecycle<'a> {
    store: &'a Store,
}

impl<'a> PageLifecycle<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Append a new blank page and return its index.
    ///
    /// The new index equals the old page count, so no existing aggregate
    /// moves. The aggregate itself is created lazily on first save.
    pub fn insert_page_at_end<M: PageOwner>(&self, meta: &mut M) -> LifecycleResult<u32> {
        let new_index = meta.page_count();
        meta.set_page_count(new_index + 1);
        meta.persist(self.store)?;
        Ok(new_index)
    }

    /// Remove the page at `index`, shifting every higher-indexed page down
    /// by one.
    ///
    /// The shift runs in ascending index order so no two live keys collide
    /// mid-operation. The last-viewed page is clamped back into the new
    /// valid range when it pointed at or past the removed page, and the
    /// metadata update is persisted as part of the same operation.
    pub fn remove_page<M: PageOwner>(&self, meta: &mut M, index: u32) -> LifecycleResult<()> {
        let page_count = meta.page_count();
        if page_count <= 1 {
            return Err(LifecycleError::LastPage);
        }
        if index >= page_count {
            return Err(LifecycleError::PageOutOfRange { index, page_count });
        }

        let kind = M::PAGE_KIND;
        let owner_id = meta.owner_id().to_owned();

        self.store.delete_pages(kind, &owner_id, Some(index))?;
        for from in index + 1..page_count {
            if let Some(mut page) = self.store.page(kind, &owner_id, from)? {
                self.store.delete_pages(kind, &owner_id, Some(from))?;
                page.page_index = from - 1;
                self.store.save_page(kind, &page)?;
            }
        }

        meta.set_page_count(page_count - 1);
        if meta.last_viewed_page() >= index {
            meta.set_last_viewed_page(meta.last_viewed_page().min(meta.page_count() - 1));
        }
        meta.persist(self.store)?;

        debug!(owner = %owner_id, index, "removed page");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use margin_storage::Namespace;
    use note_model::{PageAnnotations, Point, Stroke, StrokeMode};

    fn open_store(root: &std::path::Path) -> Store {
        let store = Store::with_root(root);
        store.switch_user(&Namespace::anonymous()).expect("switch");
        store
    }

    fn page_with_strokes(doc_id: &str, index: u32, strokes: usize) -> PageAnnotations {
        let mut page = PageAnnotations::empty(doc_id, index);
        for i in 0..strokes {
            page.strokes.push(
                Stroke::new(
                    vec![Point::new(i as f32, index as f32)],
                    2.0,
                    0xFF000000,
                    StrokeMode::Pen,
                )
                .expect("stroke"),
            );
        }
        page
    }

    fn stroke_counts(store: &Store, doc_id: &str) -> Vec<(u32, usize)> {
        store
            .pages(PageKind::Document, doc_id)
            .expect("pages")
            .iter()
            .map(|p| (p.page_index, p.strokes.len()))
            .collect()
    }

    #[test]
    fn test_insert_page_at_end() {
        let temp = tempfile::tempdir().expect("temp dir");
        let store = open_store(temp.path());
        let mut meta = DocumentMeta::new("doc1", "Thesis", "/tmp/thesis.pdf", 2);

        let index = PageLifecycle::new(&store).insert_page_at_end(&mut meta).expect("insert");
        assert_eq!(index, 2);
        assert_eq!(meta.page_count, 3);

        // Metadata was persisted as part of the operation.
        let stored = store.document("doc1").expect("get").expect("present");
        assert_eq!(stored.page_count, 3);
    }

    #[test]
    fn test_remove_page_reindexes_higher_pages() {
        // doc1 has pages 0,1,2 with stroke counts [2,0,1].
        let temp = tempfile::tempdir().expect("temp dir");
        let store = open_store(temp.path());
        let mut meta = DocumentMeta::new("doc1", "Thesis", "/tmp/thesis.pdf", 3);
        store.save_document(&meta).expect("save meta");

        store.save_page(PageKind::Document, &page_with_strokes("doc1", 0, 2)).expect("save");
        store.save_page(PageKind::Document, &page_with_strokes("doc1", 2, 1)).expect("save");
        // Page 1 has no strokes and was never saved (legitimately unwritten).

        let lifecycle = PageLifecycle::new(&store);
        lifecycle.remove_page(&mut meta, 1).expect("remove");

        assert_eq!(meta.page_count, 2);
        assert_eq!(stroke_counts(&store, "doc1"), vec![(0, 2), (1, 1)]);

        // Removing index 0 next is allowed (page count 2) and leaves the
        // former page-2 content as the only page.
        lifecycle.remove_page(&mut meta, 0).expect("remove");
        assert_eq!(meta.page_count, 1);
        assert_eq!(stroke_counts(&store, "doc1"), vec![(0, 1)]);
    }

    #[test]
    fn test_pages_below_removed_index_are_unchanged() {
        let temp = tempfile::tempdir().expect("temp dir");
        let store = open_store(temp.path());
        let mut meta = DocumentMeta::new("doc1", "Thesis", "/tmp/thesis.pdf", 3);

        let page0 = page_with_strokes("doc1", 0, 3);
        store.save_page(PageKind::Document, &page0).expect("save");
        store.save_page(PageKind::Document, &page_with_strokes("doc1", 1, 1)).expect("save");
        store.save_page(PageKind::Document, &page_with_strokes("doc1", 2, 2)).expect("save");

        PageLifecycle::new(&store).remove_page(&mut meta, 2).expect("remove");

        let kept = store.page(PageKind::Document, "doc1", 0).expect("get").expect("present");
        assert_eq!(kept, page0);
    }

    #[test]
    fn test_remove_last_page_is_rejected() {
        let temp = tempfile::tempdir().expect("temp dir");
        let store = open_store(temp.path());
        let mut meta = DocumentMeta::new("doc1", "Thesis", "/tmp/thesis.pdf", 1);

        let result = PageLifecycle::new(&store).remove_page(&mut meta, 0);
        assert!(matches!(result, Err(LifecycleError::LastPage)));
        assert_eq!(meta.page_count, 1);
    }

    #[test]
    fn test_remove_out_of_range_is_rejected() {
        let temp = tempfile::tempdir().expect("temp dir");
        let store = open_store(temp.path());
        let mut meta = DocumentMeta::new("doc1", "Thesis", "/tmp/thesis.pdf", 3);

        let result = PageLifecycle::new(&store).remove_page(&mut meta, 3);
        assert!(matches!(result, Err(LifecycleError::PageOutOfRange { index: 3, page_count: 3 })));
    }

    #[test]
    fn test_last_viewed_page_is_clamped() {
        let temp = tempfile::tempdir().expect("temp dir");
        let store = open_store(temp.path());
        let mut meta = DocumentMeta::new("doc1", "Thesis", "/tmp/thesis.pdf", 3);
        meta.last_viewed_page = 2;

        PageLifecycle::new(&store).remove_page(&mut meta, 2).expect("remove");
        assert_eq!(meta.last_viewed_page, 1);

        // Viewing a page below the removed index is left alone.
        let mut other = DocumentMeta::new("doc2", "Other", "/tmp/other.pdf", 3);
        other.last_viewed_page = 0;
        PageLifecycle::new(&store).remove_page(&mut other, 2).expect("remove");
        assert_eq!(other.last_viewed_page, 0);
    }

    #[test]
    fn test_lifecycle_works_for_notebooks() {
        let temp = tempfile::tempdir().expect("temp dir");
        let store = open_store(temp.path());
        let mut meta = NotebookMeta::new("Lab notes", "/tmp/lab");

        let lifecycle = PageLifecycle::new(&store);
        lifecycle.insert_page_at_end(&mut meta).expect("insert");
        assert_eq!(meta.page_count, 2);

        let mut page = PageAnnotations::empty(meta.id.clone(), 1);
        page.strokes.push(
            Stroke::new(vec![Point::new(0.0, 0.0)], 1.0, 0, StrokeMode::Pen).expect("stroke"),
        );
        store.save_page(PageKind::Notebook, &page).expect("save");

        lifecycle.remove_page(&mut meta, 0).expect("remove");
        assert_eq!(meta.page_count, 1);
        let pages = store.pages(PageKind::Notebook, &meta.id).expect("pages");
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_index, 0);
    }
}
