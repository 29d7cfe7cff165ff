//! [`TestDirs`] builder for reconciler test scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary root holding any number of named directories.
///
/// # Example
///
/// ```rust,no_run
/// use recon_test_utils::TestDirs;
///
/// let dirs = TestDirs::new();
/// let train = dirs.populate("train", &["a.png", "b.png"]);
/// let val = dirs.populate("val", &["b.png"]);
/// assert_eq!(dirs.names("train"), vec!["a.png", "b.png"]);
/// # let _ = (train, val);
/// ```
pub struct TestDirs {
    temp_dir: TempDir,
}

impl Default for TestDirs {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDirs {
    /// Create an empty temporary root.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of `name` under the root, without creating it.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Create (if needed) and return the directory `name`.
    pub fn dir(&self, name: &str) -> PathBuf {
        let path = self.path(name);
        fs::create_dir_all(&path)
            .unwrap_or_else(|e| panic!("TestDirs::dir: failed to create {}: {e}", path.display()));
        path
    }

    /// Write `content` to `rel` (relative to the root), creating parents.
    pub fn write(&self, rel: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("TestDirs::write: failed to write {}: {e}", path.display()));
        path
    }

    /// Create directory `name` holding one file per entry of `files`.
    ///
    /// Each file's content is its own name, so sizes differ by name length.
    pub fn populate(&self, name: &str, files: &[&str]) -> PathBuf {
        let dir = self.dir(name);
        for file in files {
            fs::write(dir.join(file), file.as_bytes()).unwrap();
        }
        dir
    }

    /// Sorted file names directly inside `name` (directories excluded).
    pub fn names(&self, name: &str) -> Vec<String> {
        self.snapshot(name).into_keys().collect()
    }

    /// File name to content mapping of directory `name`.
    ///
    /// Returns an empty map when the directory does not exist.
    pub fn snapshot(&self, name: &str) -> BTreeMap<String, Vec<u8>> {
        let dir = self.path(name);
        let Ok(read_dir) = fs::read_dir(&dir) else {
            return BTreeMap::new();
        };
        read_dir
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .map(|entry| {
                let content = fs::read(entry.path()).unwrap();
                (entry.file_name().to_string_lossy().into_owned(), content)
            })
            .collect()
    }

    /// Assert that `rel` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `rel` (relative to the root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `rel` holds exactly `content`.
    pub fn assert_file_content(&self, rel: &str, content: &str) {
        let full_path = self.path(rel);
        let actual = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert_eq!(
            actual,
            content,
            "Unexpected content in {}",
            full_path.display()
        );
    }
}
