//! The mirror command: follow deletions until interrupted

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use chrono::Local;
use colored::Colorize;
use serde::Serialize;

use recon_core::{DeleteMirror, DeletionEvent, MirrorOutcome, NotifySource, run_mirror};
use recon_fs::LocalFs;

use super::Options;
use crate::error::Result;
use crate::interactive;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Default, Serialize)]
struct MirrorCounts {
    events: usize,
    deleted: usize,
    absent: usize,
    ignored: usize,
    failed: usize,
}

impl MirrorCounts {
    fn record(&mut self, outcome: &MirrorOutcome) {
        self.events += 1;
        match outcome {
            MirrorOutcome::Deleted(_) => self.deleted += 1,
            MirrorOutcome::Absent(_) => self.absent += 1,
            MirrorOutcome::Ignored => self.ignored += 1,
            MirrorOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Mirror deletions from `watched` into `target` until Ctrl+C.
///
/// Both directories must already have been validated. Nothing is watched
/// until the user confirms, unless `--yes` was given.
pub fn run_mirror_job(watched: &Path, target: &Path, options: Options) -> Result<()> {
    if !options.json {
        println!(
            "{} Mirroring deletions from {} to {}",
            "=>".blue().bold(),
            watched.display().to_string().cyan(),
            target.display().to_string().cyan()
        );
    }

    if !options.yes && !interactive::confirm("Start mirroring deletions?")? {
        if options.json {
            let cancelled = serde_json::json!({ "cancelled": true });
            println!("{}", serde_json::to_string_pretty(&cancelled)?);
        } else {
            println!("Cancelled.");
        }
        return Ok(());
    }

    let stop = Arc::new(AtomicBool::new(false));
    install_interrupt_handler(Arc::clone(&stop));

    let mut source = NotifySource::subscribe(watched)?;
    let mirror = DeleteMirror::new(target);

    if !options.json {
        println!("   started at {}", Local::now().format(TIMESTAMP_FORMAT));
        println!("   press Ctrl+C to stop");
        println!();
    }

    let mut counts = MirrorCounts::default();
    run_mirror(&LocalFs, &mut source, &mirror, &stop, |event, outcome| {
        counts.record(outcome);
        if !options.json {
            print_outcome(event, outcome);
        }
    })?;
    drop(source);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
    } else {
        println!();
        println!(
            "{} Stopped at {}: {} deleted, {} without counterpart, {} failed",
            "OK".green().bold(),
            Local::now().format(TIMESTAMP_FORMAT),
            counts.deleted,
            counts.absent,
            counts.failed
        );
    }
    Ok(())
}

fn print_outcome(event: &DeletionEvent, outcome: &MirrorOutcome) {
    let now = Local::now().format("%H:%M:%S");
    match outcome {
        MirrorOutcome::Deleted(path) => {
            println!("[{now}] {} {}", "deleted".green(), path.display());
        }
        MirrorOutcome::Absent(path) => {
            println!("[{now}] {} {}", "absent".dimmed(), path.display());
        }
        MirrorOutcome::Ignored => {
            tracing::debug!(path = %event.path.display(), "directory event ignored");
        }
        MirrorOutcome::Failed { path, error } => {
            println!("[{now}] {} {}: {}", "failed".red(), path.display(), error);
        }
    }
}

/// Set `stop` on Ctrl+C. The signal is awaited on a small runtime in a
/// helper thread so the mirror loop itself stays synchronous.
fn install_interrupt_handler(stop: Arc<AtomicBool>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::warn!("Failed to start signal runtime: {e}");
                return;
            }
        };
        runtime.block_on(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::debug!("interrupt received, stopping mirror");
                    stop.store(true, Ordering::SeqCst);
                }
                Err(e) => tracing::warn!("Failed to listen for Ctrl+C: {e}"),
            }
        });
    });
}
