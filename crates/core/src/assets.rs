//! Asset storage collaborator
//!
//! Audio and image notes own only a *reference* to their bytes; the bytes
//! live behind this trait. The store never touches assets itself: callers
//! (and the cascading-delete cleanup) go through here, which also makes the
//! whole core testable against a tempdir.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// External storage capability for audio/image asset bytes.
pub trait AssetStore {
    /// Root directory assets live under.
    fn root_dir(&self) -> &Path;

    /// A fresh, unique path under `base` with the given extension.
    fn unique_path(&self, base: &Path, extension: &str) -> PathBuf;

    /// Copy an asset into place, returning the number of bytes copied.
    fn copy(&self, src: &Path, dst: &Path) -> io::Result<u64>;

    /// Delete an asset if present; missing files are a no-op.
    fn delete_if_exists(&self, path: &Path) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;
}

/// Filesystem-backed asset storage.
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetStore for FsAssetStore {
    fn root_dir(&self) -> &Path {
        &self.root
    }

    fn unique_path(&self, base: &Path, extension: &str) -> PathBuf {
        base.join(format!("{}.{extension}", uuid::Uuid::new_v4()))
    }

    fn copy(&self, src: &Path, dst: &Path) -> io::Result<u64> {
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(src, dst)
    }

    fn delete_if_exists(&self, path: &Path) -> io::Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
