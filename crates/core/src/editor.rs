//! Per-page annotation editing session
//!
//! Owns the page aggregate under edit plus its undo/redo history, and keeps
//! the store current: every completed action, undo and redo saves the whole
//! aggregate immediately. There is no separate commit step, so callers must
//! let a save finish before navigating away.

use margin_storage::{PageKind, Store, StoreResult};
use note_model::{AudioNote, ImageNote, PageAnnotations, Stroke, TextNote};

use crate::history::StrokeHistory;

/// Editing session for one page of one document or notebook.
pub struct AnnotationEditor<'a> {
    store: &'a Store,
    kind: PageKind,
    page: PageAnnotations,
    history: StrokeHistory,
}

impl<'a> AnnotationEditor<'a> {
    /// Open the page at `(doc_id, page_index)` for editing.
    ///
    /// Loads the existing aggregate or starts an empty one; the record is
    /// created in the store on the first save. Opening a page always starts
    /// with fresh history.
    pub fn open(
        store: &'a Store,
        kind: PageKind,
        doc_id: &str,
        page_index: u32,
    ) -> StoreResult<Self> {
        let page = store
            .page(kind, doc_id, page_index)?
            .unwrap_or_else(|| PageAnnotations::empty(doc_id, page_index));
        Ok(Self { store, kind, page, history: StrokeHistory::new() })
    }

    pub fn page(&self) -> &PageAnnotations {
        &self.page
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.page.strokes
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Commit a completed stroke: snapshot the pre-action list, append, and
    /// save the aggregate.
    pub fn commit_stroke(&mut self, stroke: Stroke) -> StoreResult<()> {
        self.history.record(&self.page.strokes);
        self.page.strokes.push(stroke);
        self.save()
    }

    /// Remove the stroke at `index` as a completed erase action. Out-of-range
    /// indices are ignored.
    pub fn erase_stroke(&mut self, index: usize) -> StoreResult<()> {
        if index >= self.page.strokes.len() {
            return Ok(());
        }
        self.history.record(&self.page.strokes);
        self.page.strokes.remove(index);
        self.save()
    }

    /// Undo the last stroke action and persist immediately. Returns whether
    /// anything changed.
    pub fn undo(&mut self) -> StoreResult<bool> {
        if !self.history.undo(&mut self.page.strokes) {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Redo the last undone action and persist immediately.
    pub fn redo(&mut self) -> StoreResult<bool> {
        if !self.history.redo(&mut self.page.strokes) {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Add a text note. Notes are outside stroke history.
    pub fn add_text_note(&mut self, note: TextNote) -> StoreResult<()> {
        self.page.text_notes.push(note);
        self.save()
    }

    /// Add an audio-pin note referencing an externally stored clip.
    pub fn add_audio_note(&mut self, note: AudioNote) -> StoreResult<()> {
        self.page.audio_notes.push(note);
        self.save()
    }

    /// Add an image note referencing an externally stored image.
    pub fn add_image_note(&mut self, note: ImageNote) -> StoreResult<()> {
        self.page.image_notes.push(note);
        self.save()
    }

    fn save(&self) -> StoreResult<()> {
        self.store.save_page(self.kind, &self.page)
    }
}
