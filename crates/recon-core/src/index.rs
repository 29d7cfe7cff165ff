//! Directory scanning into key-indexed snapshots

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use recon_fs::{FileEntry, FileSystem};

use crate::key::{ComparisonKey, KeyMode};

/// An entry skipped during a scan, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub message: String,
}

/// Files of one directory keyed by a [`KeyMode`].
///
/// Lookups see one entry per key: when two files share a key the later one
/// replaces the earlier but keeps its position. [`DirectoryIndex::files`]
/// still yields every scanned file.
#[derive(Debug, Clone)]
pub struct DirectoryIndex {
    dir: PathBuf,
    key_mode: KeyMode,
    entries: Vec<(ComparisonKey, FileEntry)>,
    files: Vec<(ComparisonKey, FileEntry)>,
    positions: HashMap<ComparisonKey, usize>,
    warnings: Vec<ScanWarning>,
}

impl DirectoryIndex {
    /// Create an empty index for `dir`.
    pub fn new(dir: impl Into<PathBuf>, key_mode: KeyMode) -> Self {
        Self {
            dir: dir.into(),
            key_mode,
            entries: Vec::new(),
            files: Vec::new(),
            positions: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Insert an entry, returning the one it replaced.
    pub fn insert(&mut self, key: ComparisonKey, entry: FileEntry) -> Option<FileEntry> {
        self.files.push((key.clone(), entry.clone()));
        match self.positions.get(&key) {
            Some(&idx) => Some(std::mem::replace(&mut self.entries[idx].1, entry)),
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, entry));
                None
            }
        }
    }

    pub fn get(&self, key: &ComparisonKey) -> Option<&FileEntry> {
        self.positions.get(key).map(|&idx| &self.entries[idx].1)
    }

    pub fn contains_key(&self, key: &ComparisonKey) -> bool {
        self.positions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key/entry pairs in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (&ComparisonKey, &FileEntry)> {
        self.entries.iter().map(|(key, entry)| (key, entry))
    }

    /// Every scanned file in scan order, including ones sharing a key.
    pub fn files(&self) -> impl Iterator<Item = (&ComparisonKey, &FileEntry)> {
        self.files.iter().map(|(key, entry)| (key, entry))
    }

    /// Number of scanned files, counting shared keys separately.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ComparisonKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// File names of all indexed entries.
    pub fn names(&self) -> HashSet<&str> {
        self.entries
            .iter()
            .map(|(_, entry)| entry.name.as_str())
            .collect()
    }

    /// Entries sorted by file name.
    pub fn sorted_entries(&self) -> Vec<FileEntry> {
        let mut entries: Vec<FileEntry> =
            self.entries.iter().map(|(_, entry)| entry.clone()).collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// The first `n` keys in sorted order, for diagnosing key mismatches.
    pub fn sample_keys(&self, n: usize) -> Vec<&ComparisonKey> {
        let mut keys: Vec<&ComparisonKey> = self.keys().collect();
        keys.sort();
        keys.truncate(n);
        keys
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn key_mode(&self) -> &KeyMode {
        &self.key_mode
    }

    /// Entries skipped during the scan.
    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    fn warn(&mut self, path: &Path, message: String) {
        tracing::warn!(path = %path.display(), "{}", message);
        self.warnings.push(ScanWarning {
            path: path.to_path_buf(),
            message,
        });
    }
}

/// Scan `dir` non-recursively into an index keyed by `key_mode`.
///
/// A missing directory yields an empty index. Unreadable entries are
/// skipped and recorded as warnings; the scan itself never fails.
pub fn scan_directory(fs: &dyn FileSystem, dir: &Path, key_mode: &KeyMode) -> DirectoryIndex {
    let mut index = DirectoryIndex::new(dir, key_mode.clone());

    if !fs.exists(dir) {
        tracing::debug!(dir = %dir.display(), "directory missing, returning empty index");
        return index;
    }

    let listing = match fs.list(dir) {
        Ok(listing) => listing,
        Err(e) => {
            index.warn(dir, format!("Failed to list directory: {e}"));
            return index;
        }
    };

    for error in listing.errors.iter() {
        let path = error.path().unwrap_or(dir).to_path_buf();
        index.warn(&path, format!("Skipped unreadable entry: {error}"));
    }

    for item in listing.files() {
        let mut entry = FileEntry::from(item);
        match key_mode.key_for(fs, &mut entry) {
            Ok(Some(key)) => {
                if let Some(replaced) = index.insert(key, entry) {
                    tracing::debug!(
                        replaced = %replaced.name,
                        "key shared within directory, lookups use the later entry"
                    );
                }
            }
            Ok(None) => {
                tracing::debug!(name = %item.name, "no key under {}, skipping", key_mode);
            }
            Err(e) => index.warn(&item.path, format!("Failed to read file info: {e}")),
        }
    }

    tracing::debug!(
        dir = %dir.display(),
        files = index.file_count(),
        skipped = index.warnings.len(),
        "scan complete"
    );
    index
}
