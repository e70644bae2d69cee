//! Per-page annotation aggregate
//!
//! Groups every annotation belonging to one page of one document into a
//! single record. Identity is `(pdf_id, page_index)` and there is at most one
//! record per identity; saves replace the whole aggregate, there is no
//! partial update.

use serde::{Deserialize, Serialize};

use crate::annotation::{
    AudioNote, AudioNoteRecord, ImageNote, ImageNoteRecord, Stroke, StrokeRecord, TextNote,
    TextNoteRecord,
};

/// All annotations on one page of one document or notebook.
#[derive(Debug, Clone, PartialEq)]
pub struct PageAnnotations {
    /// Id of the owning document or notebook.
    pub pdf_id: String,
    /// Zero-based page index.
    pub page_index: u32,
    pub strokes: Vec<Stroke>,
    pub text_notes: Vec<TextNote>,
    pub audio_notes: Vec<AudioNote>,
    pub image_notes: Vec<ImageNote>,
}

impl PageAnnotations {
    /// Create an empty aggregate for a page.
    pub fn empty(pdf_id: impl Into<String>, page_index: u32) -> Self {
        Self {
            pdf_id: pdf_id.into(),
            page_index,
            strokes: Vec::new(),
            text_notes: Vec::new(),
            audio_notes: Vec::new(),
            image_notes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
            && self.text_notes.is_empty()
            && self.audio_notes.is_empty()
            && self.image_notes.is_empty()
    }

    /// Encode into the wire record.
    pub fn to_record(&self) -> PageRecord {
        PageRecord {
            pdf_id: self.pdf_id.clone(),
            page_index: self.page_index,
            strokes: self.strokes.iter().map(StrokeRecord::from).collect(),
            text_notes: self.text_notes.iter().map(TextNoteRecord::from).collect(),
            audio_notes: self.audio_notes.iter().map(AudioNoteRecord::from).collect(),
            image_notes: self.image_notes.iter().map(ImageNoteRecord::from).collect(),
        }
    }

    /// Decode from a wire record, applying the stroke compatibility filter.
    ///
    /// Strokes whose mode is no longer representable (the retired
    /// highlighter) are excluded entirely. This migration is one-way: once a
    /// page decoded here is saved again, the filtered strokes are gone.
    pub fn from_record(record: PageRecord) -> Self {
        Self {
            pdf_id: record.pdf_id,
            page_index: record.page_index,
            strokes: record.strokes.into_iter().filter_map(StrokeRecord::into_stroke).collect(),
            text_notes: record.text_notes.into_iter().map(TextNote::from).collect(),
            audio_notes: record.audio_notes.into_iter().map(AudioNote::from).collect(),
            image_notes: record.image_notes.into_iter().map(ImageNote::from).collect(),
        }
    }
}

/// Wire record for a page aggregate.
///
/// Records written before image notes existed lack the `imageNotes` key; the
/// other collections default too so a truncated record still decodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    #[serde(rename = "pdfId")]
    pub pdf_id: String,
    #[serde(rename = "pageIndex")]
    pub page_index: u32,
    #[serde(default)]
    pub strokes: Vec<StrokeRecord>,
    #[serde(rename = "textNotes", default)]
    pub text_notes: Vec<TextNoteRecord>,
    #[serde(rename = "audioNotes", default)]
    pub audio_notes: Vec<AudioNoteRecord>,
    #[serde(rename = "imageNotes", default)]
    pub image_notes: Vec<ImageNoteRecord>,
}
