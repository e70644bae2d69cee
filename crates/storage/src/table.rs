//! Typed record tables
//!
//! A [`Table`] is one collection of one namespace: a directory of JSON files,
//! one file per key. Keys are opaque caller-supplied strings, so they are
//! hex-encoded into file names; a key containing path separators maps to a
//! file inside the collection directory like any other. Writes are atomic
//! (temp file + rename). A corrupt individual file is skipped during
//! enumeration rather than aborting the whole listing; each skip is logged.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::warn;

use note_model::{PageAnnotations, PageRecord};

use crate::StoreResult;

/// Composite key for a page aggregate: `<documentId>:<pageIndex>`.
///
/// The document-id prefix makes "all pages of a document" an enumeration
/// over keys; matching splits on the last `:` so a document id that itself
/// contains `:` cannot collide with another document's pages.
pub fn page_key(doc_id: &str, page_index: u32) -> String {
    format!("{doc_id}:{page_index}")
}

/// Hex-encode a key into a filename stem. Any byte is a valid key byte.
fn encode_key(key: &str) -> String {
    key.bytes().map(|b| format!("{b:02x}")).collect()
}

/// Inverse of [`encode_key`]. Returns `None` for stems this table did not
/// write (odd length, non-hex digits, non-UTF-8 payload).
fn decode_key(stem: &str) -> Option<String> {
    if stem.len() % 2 != 0 {
        return None;
    }
    let mut bytes = Vec::with_capacity(stem.len() / 2);
    for pair in stem.as_bytes().chunks(2) {
        let hi = (pair[0] as char).to_digit(16)?;
        let lo = (pair[1] as char).to_digit(16)?;
        bytes.push((hi * 16 + lo) as u8);
    }
    String::from_utf8(bytes).ok()
}

/// A typed keyed collection backed by one directory.
#[derive(Debug)]
pub struct Table<T> {
    dir: PathBuf,
    _record: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> Table<T> {
    /// Open (creating if needed) the collection directory.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, _record: PhantomData })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_key(key)))
    }

    /// Insert or replace the record under `key`.
    ///
    /// The write is atomic: the record lands under a temporary name and is
    /// renamed into place, so readers never observe a half-written file.
    pub fn upsert(&self, key: &str, record: &T) -> StoreResult<()> {
        let path = self.path_for(key);
        let bytes = serde_json::to_vec_pretty(record)?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }

    /// Load the record under `key`. Absent keys return `Ok(None)`.
    pub fn get(&self, key: &str) -> StoreResult<Option<T>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Enumerate every record in the collection.
    ///
    /// A file that fails to parse is skipped with a warning; one corrupt
    /// record must not hide the rest of the collection.
    pub fn list(&self) -> StoreResult<Vec<T>> {
        let mut records = Vec::new();
        for key in self.keys()? {
            let path = self.path_for(&key);
            let bytes = fs::read(&path)?;
            match serde_json::from_slice(&bytes) {
                Ok(record) => records.push(record),
                Err(error) => {
                    warn!(path = %path.display(), %error, "skipping corrupt record");
                }
            }
        }
        Ok(records)
    }

    /// Delete the record under `key`. Missing keys are a no-op.
    pub fn delete(&self, key: &str) -> StoreResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// All keys currently present, in no particular order. Files whose name
    /// does not decode as a key are ignored.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(key) = path.file_stem().and_then(|s| s.to_str()).and_then(decode_key) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

/// A table of page aggregates keyed by `<documentId>:<pageIndex>`.
///
/// Stores wire records on disk and converts at the boundary, so every read
/// goes through the compatibility filter in
/// [`PageAnnotations::from_record`].
#[derive(Debug)]
pub struct PageTable {
    inner: Table<PageRecord>,
}

impl PageTable {
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        Ok(Self { inner: Table::open(dir)? })
    }

    /// Save a page aggregate, replacing any existing record for its
    /// identity.
    pub fn save(&self, page: &PageAnnotations) -> StoreResult<()> {
        self.inner.upsert(&page_key(&page.pdf_id, page.page_index), &page.to_record())
    }

    /// Load one page. Absent pages return `Ok(None)`.
    pub fn load(&self, doc_id: &str, page_index: u32) -> StoreResult<Option<PageAnnotations>> {
        Ok(self.inner.get(&page_key(doc_id, page_index))?.map(PageAnnotations::from_record))
    }

    /// All pages of one document, ascending by page index.
    pub fn load_all(&self, doc_id: &str) -> StoreResult<Vec<PageAnnotations>> {
        let mut pages = Vec::new();
        for key in self.page_keys(doc_id)? {
            if let Some(record) = self.inner.get(&key)? {
                pages.push(PageAnnotations::from_record(record));
            }
        }
        pages.sort_by_key(|p| p.page_index);
        Ok(pages)
    }

    /// Delete one page if `page_index` is given, else every page of the
    /// document. Missing pages are a no-op.
    pub fn delete(&self, doc_id: &str, page_index: Option<u32>) -> StoreResult<()> {
        match page_index {
            Some(index) => self.inner.delete(&page_key(doc_id, index)),
            None => {
                for key in self.page_keys(doc_id)? {
                    self.inner.delete(&key)?;
                }
                Ok(())
            }
        }
    }

    /// Keys belonging to this document. The page index is the part after the
    /// last `:`, so ids like `a` and `a:b` never claim each other's pages.
    fn page_keys(&self, doc_id: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .inner
            .keys()?
            .into_iter()
            .filter(|k| {
                k.rsplit_once(':')
                    .is_some_and(|(doc, index)| doc == doc_id && index.parse::<u32>().is_ok())
            })
            .collect())
    }
}
