//! Directory listing items and scan-time file snapshots

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Kind of a directory entry as reported by a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Sockets, fifos, dangling symlinks and the like
    Other,
}

/// One entry of a non-recursive directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirItem {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl DirItem {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Result of listing a directory.
///
/// Entries whose type could not be determined end up in `errors` instead of
/// failing the whole listing.
#[derive(Debug, Default)]
pub struct Listing {
    pub items: Vec<DirItem>,
    pub errors: Vec<Error>,
}

impl Listing {
    /// Iterate over regular files only.
    pub fn files(&self) -> impl Iterator<Item = &DirItem> {
        self.items.iter().filter(|item| item.is_file())
    }
}

/// Immutable snapshot of a file taken at scan time.
///
/// `size` is only populated when the comparison needed it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Build an entry from a path, taking the name from its last component.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(name, path)
    }
}

impl From<&DirItem> for FileEntry {
    fn from(item: &DirItem) -> Self {
        Self::new(item.name.clone(), item.path.clone())
    }
}
