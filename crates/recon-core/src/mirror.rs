//! Reactive delete mirroring
//!
//! [`DeleteMirror`] reacts to one deletion at a time; [`run_mirror`] drives it
//! from any [`DeletionSource`] until stopped.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use recon_fs::FileSystem;

use crate::{Error, Result};

/// How long a source waits for an event before returning control to the loop.
pub const IDLE_TICK: Duration = Duration::from_secs(1);

/// A file or directory removed from the watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionEvent {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl DeletionEvent {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }

    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }
}

/// What the mirror did in response to one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorOutcome {
    /// The counterpart was deleted from the target
    Deleted(PathBuf),
    /// The target had no counterpart
    Absent(PathBuf),
    /// Directory events are not mirrored
    Ignored,
    Failed { path: PathBuf, error: String },
}

/// Producer of deletion events.
pub trait DeletionSource {
    /// Wait up to `timeout` for the next event.
    ///
    /// `Ok(None)` means the wait timed out; [`Error::Disconnected`] means no
    /// further events will arrive.
    fn next_event(&mut self, timeout: Duration) -> Result<Option<DeletionEvent>>;
}

/// Deletes the same-named file from `target` when a file is deleted from the
/// watched directory.
#[derive(Debug, Clone)]
pub struct DeleteMirror {
    target: PathBuf,
}

impl DeleteMirror {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn handle(&self, fs: &dyn FileSystem, event: &DeletionEvent) -> MirrorOutcome {
        if event.is_dir {
            tracing::debug!(path = %event.path.display(), "ignoring directory deletion");
            return MirrorOutcome::Ignored;
        }
        let Some(name) = event.path.file_name() else {
            return MirrorOutcome::Ignored;
        };

        let counterpart = self.target.join(name);
        if !fs.exists(&counterpart) {
            tracing::info!(path = %counterpart.display(), "no counterpart in target");
            return MirrorOutcome::Absent(counterpart);
        }

        match fs.delete(&counterpart) {
            Ok(()) => {
                tracing::info!(path = %counterpart.display(), "mirrored deletion");
                MirrorOutcome::Deleted(counterpart)
            }
            Err(e) => {
                tracing::warn!(path = %counterpart.display(), "Failed to mirror deletion: {}", e);
                MirrorOutcome::Failed {
                    path: counterpart,
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Feed events from `source` to `mirror` until `stop` is set or the source
/// disconnects. Returns the number of events handled.
pub fn run_mirror(
    fs: &dyn FileSystem,
    source: &mut dyn DeletionSource,
    mirror: &DeleteMirror,
    stop: &AtomicBool,
    mut on_outcome: impl FnMut(&DeletionEvent, &MirrorOutcome),
) -> Result<usize> {
    let mut handled = 0;

    while !stop.load(Ordering::SeqCst) {
        match source.next_event(IDLE_TICK) {
            Ok(Some(event)) => {
                let outcome = mirror.handle(fs, &event);
                on_outcome(&event, &outcome);
                handled += 1;
            }
            Ok(None) => continue,
            Err(Error::Disconnected) => {
                tracing::debug!("deletion source disconnected");
                break;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(handled)
}
