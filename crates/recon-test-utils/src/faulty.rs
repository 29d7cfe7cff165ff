//! [`FaultyFs`]: a real filesystem with injectable per-file failures.
//!
//! Running tests as root makes permission-based failures unreliable, so
//! failure paths are exercised by naming the files an operation should
//! refuse instead.

use std::cell::RefCell;
use std::collections::HashSet;
use std::io;
use std::path::Path;

use recon_fs::{Error, FileSystem, Listing, LocalFs, Result};

/// Operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Listing reports the entry as unreadable
    List,
    Stat,
    Read,
    Delete,
    Move,
    Copy,
}

/// [`LocalFs`] wrapper that fails chosen operations for chosen file names
/// and records every mutation it performs.
#[derive(Debug, Default)]
pub struct FaultyFs {
    inner: LocalFs,
    failures: HashSet<(Op, String)>,
    mutations: RefCell<Vec<String>>,
}

impl FaultyFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `op` fail whenever its source file is named `name`.
    pub fn failing(mut self, op: Op, name: &str) -> Self {
        self.failures.insert((op, name.to_string()));
        self
    }

    /// Mutations performed so far, as `"<op> <path>"` strings.
    pub fn mutations(&self) -> Vec<String> {
        self.mutations.borrow().clone()
    }

    fn check(&self, op: Op, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.failures.contains(&(op, name)) {
            return Err(Error::io(
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, "injected failure"),
            ));
        }
        Ok(())
    }

    fn record(&self, op: &str, path: &Path) {
        self.mutations
            .borrow_mut()
            .push(format!("{op} {}", path.display()));
    }
}

impl FileSystem for FaultyFs {
    fn list(&self, dir: &Path) -> Result<Listing> {
        let listing = self.inner.list(dir)?;
        let mut faulty = Listing {
            items: Vec::new(),
            errors: listing.errors,
        };
        for item in listing.items {
            match self.check(Op::List, &item.path) {
                Ok(()) => faulty.items.push(item),
                Err(e) => faulty.errors.push(e),
            }
        }
        Ok(faulty)
    }

    fn stat_size(&self, path: &Path) -> Result<u64> {
        self.check(Op::Stat, path)?;
        self.inner.stat_size(path)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.check(Op::Read, path)?;
        self.inner.read(path)
    }

    fn delete(&self, path: &Path) -> Result<()> {
        self.check(Op::Delete, path)?;
        self.record("delete", path);
        self.inner.delete(path)
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        self.check(Op::Move, from)?;
        self.record("move", from);
        self.inner.move_file(from, to)
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<u64> {
        self.check(Op::Copy, from)?;
        self.record("copy", from);
        self.inner.copy(from, to)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.record("mkdir", path);
        self.inner.create_dir_all(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }
}
