//! Annotation data model
//!
//! Value types for freehand strokes, text notes, audio-pin notes and image
//! notes, the per-page aggregate that groups them, and the document/notebook
//! metadata records that own those pages. Wire-format conversion (including
//! tolerant decoding of older record shapes) lives here so that every call
//! site sees already-migrated values.

pub mod annotation;
pub mod meta;
pub mod page;

pub use annotation::{
    AudioNote, AudioNoteRecord, ImageNote, ImageNoteRecord, Point, Stroke, StrokeMode,
    StrokeRecord, TextNote, TextNoteRecord,
};
pub use meta::{DocumentMeta, Folder, NotebookMeta, MAX_RECENT_COLORS};
pub use page::{PageAnnotations, PageRecord};
