//! Filesystem abstraction for Dataset Reconciler
//!
//! Provides the [`FileSystem`] accessor the reconciler calls into, the
//! scan-time [`FileEntry`] snapshot, and format-agnostic config storage.

pub mod accessor;
pub mod checksum;
pub mod config;
pub mod entry;
pub mod error;
pub mod io;

pub use accessor::{FileSystem, LocalFs};
pub use config::ConfigStore;
pub use entry::{DirItem, EntryKind, FileEntry, Listing};
pub use error::{Error, Result};
