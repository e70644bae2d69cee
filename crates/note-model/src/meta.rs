//! Document, notebook and folder metadata records
//!
//! Identity and bookkeeping for the page aggregates a document or notebook
//! owns. Page aggregates are referenced, never embedded: the page count here
//! must match the set of page indices that exist, and the page lifecycle
//! manager is the sole writer enforcing that.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Upper bound on the recent-color history of a document or notebook.
pub const MAX_RECENT_COLORS: usize = 8;

/// Metadata for a PDF-backed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub id: String,
    /// Display name shown in the library.
    pub name: String,
    /// Path of the imported source PDF.
    pub source_path: PathBuf,
    /// Optional derived asset (e.g. a flattened export) for this document.
    #[serde(default)]
    pub derived_path: Option<PathBuf>,
    /// Number of pages; page indices are dense in `[0, page_count)`.
    pub page_count: u32,
    /// Last time the document was opened, epoch milliseconds.
    pub last_opened_ms: i64,
    /// Page index the user last viewed.
    pub last_viewed_page: u32,
    /// Recently used stroke colors, most recent first, de-duplicated.
    #[serde(default)]
    pub recent_colors: Vec<u32>,
    #[serde(default)]
    pub favorite: bool,
}

impl DocumentMeta {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        source_path: impl Into<PathBuf>,
        page_count: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source_path: source_path.into(),
            derived_path: None,
            page_count,
            last_opened_ms: 0,
            last_viewed_page: 0,
            recent_colors: Vec::new(),
            favorite: false,
        }
    }

    /// Record a color use, keeping the history bounded, most-recent-first and
    /// free of duplicates.
    pub fn push_recent_color(&mut self, color: u32) {
        push_recent(&mut self.recent_colors, color);
    }
}

/// Metadata for a notebook (blank-page document created in-app).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotebookMeta {
    pub id: String,
    pub name: String,
    /// Path of the notebook's backing asset.
    pub source_path: PathBuf,
    pub page_count: u32,
    pub last_opened_ms: i64,
    pub last_viewed_page: u32,
    #[serde(default)]
    pub recent_colors: Vec<u32>,
    /// Name of the folder grouping this notebook, if any.
    #[serde(default)]
    pub folder: Option<String>,
}

impl NotebookMeta {
    /// Create a notebook with a generated id and a single page.
    pub fn new(name: impl Into<String>, source_path: impl Into<PathBuf>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            source_path: source_path.into(),
            page_count: 1,
            last_opened_ms: 0,
            last_viewed_page: 0,
            recent_colors: Vec::new(),
            folder: None,
        }
    }

    pub fn push_recent_color(&mut self, color: u32) {
        push_recent(&mut self.recent_colors, color);
    }
}

/// A folder grouping notebooks. Deleting a folder does not cascade to the
/// notebooks inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    /// Creation time, epoch milliseconds.
    pub created_ms: i64,
}

impl Folder {
    pub fn new(name: impl Into<String>, created_ms: i64) -> Self {
        Self { id: uuid::Uuid::new_v4().to_string(), name: name.into(), created_ms }
    }
}

fn push_recent(colors: &mut Vec<u32>, color: u32) {
    colors.retain(|&c| c != color);
    colors.insert(0, color);
    colors.truncate(MAX_RECENT_COLORS);
}
