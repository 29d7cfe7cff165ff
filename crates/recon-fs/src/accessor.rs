//! Filesystem accessor used by the reconciler
//!
//! All operations are path-based; no handles outlive a call.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::entry::{DirItem, EntryKind, Listing};
use crate::{Error, Result, io};

/// Filesystem operations the reconciler depends on.
///
/// [`LocalFs`] is the real implementation. Tests wrap it to inject failures.
pub trait FileSystem {
    /// List a directory non-recursively.
    fn list(&self, dir: &Path) -> Result<Listing>;

    /// Size of a file in bytes.
    fn stat_size(&self, path: &Path) -> Result<u64>;

    /// Read the full contents of a file.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Delete a file.
    fn delete(&self, path: &Path) -> Result<()>;

    /// Move a file; `to` must not exist yet.
    fn move_file(&self, from: &Path, to: &Path) -> Result<()>;

    /// Copy a file, returning the number of bytes copied.
    fn copy(&self, from: &Path, to: &Path) -> Result<u64>;

    /// Create a directory and all missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFs {
    fn list(&self, dir: &Path) -> Result<Listing> {
        let read_dir = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
        let mut listing = Listing::default();

        for entry in read_dir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    listing.errors.push(Error::io(dir, e));
                    continue;
                }
            };
            let path = entry.path();

            // Follow symlinks so a link to a file counts as a file
            let kind = match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => EntryKind::File,
                Ok(meta) if meta.is_dir() => EntryKind::Directory,
                Ok(_) => EntryKind::Other,
                Err(e) if e.kind() == ErrorKind::NotFound => EntryKind::Other,
                Err(e) => {
                    listing.errors.push(Error::io(&path, e));
                    continue;
                }
            };

            listing.items.push(DirItem {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
                kind,
            });
        }

        Ok(listing)
    }

    fn stat_size(&self, path: &Path) -> Result<u64> {
        fs::metadata(path)
            .map(|meta| meta.len())
            .map_err(|e| Error::io(path, e))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| Error::io(path, e))
    }

    fn delete(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|e| Error::io(path, e))
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        io::move_file(from, to)
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<u64> {
        io::copy_file(from, to)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| Error::io(path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
