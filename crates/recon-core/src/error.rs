//! Error types for recon-core

use std::path::PathBuf;

/// Result type for recon-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in recon-core operations
///
/// Only configuration problems abort a run. Per-file problems during a scan
/// or an action are recorded in the index or the action result instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A directory the job requires does not exist
    #[error("{role} directory not found: {path}")]
    MissingDirectory { role: &'static str, path: PathBuf },

    /// Two job roles point at the same directory
    #[error("{role} and {other} directories must differ: {path}")]
    SameDirectory {
        role: &'static str,
        other: &'static str,
        path: PathBuf,
    },

    /// Positional stride interval below one
    #[error("Stride interval must be at least 1, got {interval}")]
    InvalidInterval { interval: usize },

    /// Regex token pattern failed to compile
    #[error("Invalid token pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Key mode spelling not recognised
    #[error(
        "Unknown key mode '{0}' (expected name, name-size, size-name, hash or regex:<pattern>)"
    )]
    UnknownKeyMode(String),

    /// Job kind cannot be planned as a batch run
    #[error("'{operation}' jobs run continuously and cannot be planned")]
    NotBatch { operation: String },

    /// Filesystem watch registration failed
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    /// The deletion event stream has ended
    #[error("Deletion event source disconnected")]
    Disconnected,

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from recon-fs
    #[error(transparent)]
    Fs(#[from] recon_fs::Error),
}
