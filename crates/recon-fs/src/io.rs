//! Atomic writes and cross-device safe moves

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename strategy to prevent partial writes.
/// Acquires an advisory lock to prevent concurrent access.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file lives next to the target so the rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .lock_exclusive()
        .map_err(|_| Error::LockFailed { path: path.to_path_buf() })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file
        .sync_all()
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .unlock()
        .map_err(|_| Error::LockFailed { path: path.to_path_buf() })?;

    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;

    Ok(())
}

/// Canonicalize a path that exists, leaving it untouched otherwise.
///
/// Uses `dunce` so Windows paths don't pick up a `\\?\` prefix.
pub fn resolve_path(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Copy `from` to `to`, carrying over the modification time.
///
/// A timestamp that cannot be set is logged; the copied data is kept.
pub fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    let bytes = fs::copy(from, to).map_err(|e| Error::io(from, e))?;
    let modified = fs::metadata(from).and_then(|meta| meta.modified());
    let applied = modified.and_then(|time| {
        fs::OpenOptions::new()
            .write(true)
            .open(to)
            .and_then(|file| file.set_modified(time))
    });
    if let Err(e) = applied {
        tracing::warn!(path = %to.display(), "Failed to keep modification time: {e}");
    }
    Ok(bytes)
}

/// Move a file, falling back to copy-then-delete across filesystems.
///
/// If the delete after a fallback copy fails, the copy is removed again so
/// the file is never left in both places.
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            tracing::debug!(
                from = %from.display(),
                to = %to.display(),
                "rename crosses devices, copying instead"
            );
            copy_file(from, to)?;
            if let Err(e) = fs::remove_file(from) {
                let _ = fs::remove_file(to);
                return Err(Error::io(from, e));
            }
            Ok(())
        }
        Err(e) => Err(Error::io(from, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    #[test]
    fn move_file_renames_within_directory() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("a.txt");
        let to = temp.path().join("b.txt");
        fs::write(&from, "payload").unwrap();

        move_file(&from, &to).unwrap();

        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "payload");
    }

    #[test]
    fn copy_file_keeps_modification_time() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("a.png");
        let to = temp.path().join("b.png");
        fs::write(&from, "payload").unwrap();
        let old = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        fs::File::options()
            .write(true)
            .open(&from)
            .unwrap()
            .set_modified(old)
            .unwrap();

        assert_eq!(copy_file(&from, &to).unwrap(), 7);

        assert_eq!(fs::metadata(&to).unwrap().modified().unwrap(), old);
        assert_eq!(fs::read_to_string(&from).unwrap(), "payload");
    }

    #[test]
    fn move_file_missing_source_reports_source_path() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("ghost.txt");
        let err = move_file(&from, &temp.path().join("b.txt")).unwrap_err();
        match err {
            Error::Io { path, .. } => assert_eq!(path, from),
            other => panic!("unexpected error: {other}"),
        }
    }
}
