//! Deletion sources: a real filesystem watch and an in-process channel

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use notify::event::{ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::mirror::{DeletionEvent, DeletionSource};
use crate::{Error, Result};

/// Deletions in one directory, reported by the platform watcher.
///
/// The notify callback thread only forwards into a channel; events are
/// consumed on the caller's thread. Dropping the source unwatches.
pub struct NotifySource {
    watcher: RecommendedWatcher,
    dir: PathBuf,
    events: Receiver<notify::Result<Event>>,
    pending: VecDeque<DeletionEvent>,
}

impl NotifySource {
    /// Start watching `dir` non-recursively.
    pub fn subscribe(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(move |event| {
            let _ = tx.send(event);
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::debug!(dir = %dir.display(), "watching for deletions");

        Ok(Self {
            watcher,
            dir,
            events: rx,
            pending: VecDeque::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DeletionSource for NotifySource {
    fn next_event(&mut self, timeout: Duration) -> Result<Option<DeletionEvent>> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }

        match self.events.recv_timeout(timeout) {
            Ok(Ok(event)) => {
                self.pending.extend(deletion_events(&event, &self.dir));
                Ok(self.pending.pop_front())
            }
            Ok(Err(e)) => {
                tracing::warn!("Watcher error: {e}");
                Ok(None)
            }
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(Error::Disconnected),
        }
    }
}

impl Drop for NotifySource {
    fn drop(&mut self) {
        if let Err(e) = self.watcher.unwatch(&self.dir) {
            tracing::debug!(dir = %self.dir.display(), "unwatch failed: {e}");
        }
    }
}

/// Map a raw watcher event on `dir` to deletion events.
///
/// A file renamed out of `dir` counts as deleted. Renames are reported
/// without a file kind, so they always map to file deletions. Every other
/// event maps to nothing.
pub fn deletion_events(event: &Event, dir: &Path) -> Vec<DeletionEvent> {
    match event.kind {
        EventKind::Remove(kind) => {
            let is_dir = matches!(kind, RemoveKind::Folder);
            event
                .paths
                .iter()
                .map(|path| DeletionEvent {
                    path: path.clone(),
                    is_dir,
                })
                .collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            event.paths.iter().map(DeletionEvent::file).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => match event.paths.as_slice() {
            [from, to] if to.parent() != Some(dir) => vec![DeletionEvent::file(from)],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// In-process source fed through a channel.
///
/// Dropping every sender disconnects the source, which ends a mirror run.
pub struct ChannelSource {
    events: Receiver<DeletionEvent>,
}

impl ChannelSource {
    pub fn channel() -> (Sender<DeletionEvent>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { events: rx })
    }
}

impl DeletionSource for ChannelSource {
    fn next_event(&mut self, timeout: Duration) -> Result<Option<DeletionEvent>> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(Error::Disconnected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::CreateKind;

    fn watched() -> &'static Path {
        Path::new("/w")
    }

    fn renamed(mode: RenameMode) -> Event {
        Event::new(EventKind::Modify(ModifyKind::Name(mode)))
    }

    #[test]
    fn only_removals_become_deletions() {
        let created = Event::new(EventKind::Create(CreateKind::File)).add_path("/w/a".into());
        assert!(deletion_events(&created, watched()).is_empty());

        let removed = Event::new(EventKind::Remove(RemoveKind::File))
            .add_path("/w/a".into())
            .add_path("/w/b".into());
        assert_eq!(
            deletion_events(&removed, watched()),
            vec![DeletionEvent::file("/w/a"), DeletionEvent::file("/w/b")]
        );
    }

    #[test]
    fn rename_out_of_dir_is_a_deletion() {
        let moved_out = renamed(RenameMode::From).add_path("/w/a.png".into());
        assert_eq!(
            deletion_events(&moved_out, watched()),
            vec![DeletionEvent::file("/w/a.png")]
        );

        let to_trash = renamed(RenameMode::Both)
            .add_path("/w/a.png".into())
            .add_path("/trash/a.png".into());
        assert_eq!(
            deletion_events(&to_trash, watched()),
            vec![DeletionEvent::file("/w/a.png")]
        );
    }

    #[test]
    fn rename_within_dir_is_not_a_deletion() {
        let within = renamed(RenameMode::Both)
            .add_path("/w/a.png".into())
            .add_path("/w/b.png".into());
        assert!(deletion_events(&within, watched()).is_empty());

        let moved_in = renamed(RenameMode::To).add_path("/w/c.png".into());
        assert!(deletion_events(&moved_in, watched()).is_empty());
    }

    #[test]
    fn folder_removal_sets_dir_flag() {
        let removed = Event::new(EventKind::Remove(RemoveKind::Folder)).add_path("/w/sub".into());
        assert_eq!(deletion_events(&removed, watched()), vec![DeletionEvent::dir("/w/sub")]);
    }

    #[test]
    fn channel_source_times_out_then_disconnects() {
        let (tx, mut source) = ChannelSource::channel();
        assert_eq!(source.next_event(Duration::from_millis(10)).unwrap(), None);

        tx.send(DeletionEvent::file("/w/a")).unwrap();
        assert_eq!(
            source.next_event(Duration::from_millis(10)).unwrap(),
            Some(DeletionEvent::file("/w/a"))
        );

        drop(tx);
        assert!(matches!(
            source.next_event(Duration::from_millis(10)),
            Err(Error::Disconnected)
        ));
    }
}
