//! Applying an action to every entry of a plan
//!
//! Application is sequential and not atomic: a failure on one entry is
//! recorded and the run moves on to the next.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use recon_fs::FileSystem;

use crate::plan::{PlanEntry, ReconciliationPlan};

/// What to do with each planned source file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Action {
    #[default]
    Delete,
    Move { dest: PathBuf },
    Copy { dest: PathBuf },
}

impl Action {
    /// Destination directory for transfers.
    pub fn dest(&self) -> Option<&Path> {
        match self {
            Self::Delete => None,
            Self::Move { dest } | Self::Copy { dest } => Some(dest),
        }
    }

    /// Present-tense verb used in previews and logs.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Move { .. } => "move",
            Self::Copy { .. } => "copy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "error", rename_all = "kebab-case")]
pub enum ActionStatus {
    Done,
    /// Dry run; nothing was touched
    Planned,
    Failed(String),
}

/// Per-entry outcome of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub source: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<PathBuf>,
    #[serde(flatten)]
    pub status: ActionStatus,
}

impl ActionOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, ActionStatus::Failed(_))
    }
}

/// Summary of applying an action to a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Entries listed but not touched because of a dry run
    pub planned: usize,
    pub dry_run: bool,
    pub outcomes: Vec<ActionOutcome>,
}

impl ActionResult {
    fn dry(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    fn record(&mut self, outcome: ActionOutcome) {
        match outcome.status {
            ActionStatus::Done => {
                self.attempted += 1;
                self.succeeded += 1;
            }
            ActionStatus::Failed(_) => {
                self.attempted += 1;
                self.failed += 1;
            }
            ActionStatus::Planned => self.planned += 1,
        }
        self.outcomes.push(outcome);
    }

    /// Outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }
}

/// First free name in `dest_dir` for `desired`: the name itself, then
/// `stem_1.ext`, `stem_2.ext` and so on.
pub fn disambiguate(dest_dir: &Path, desired: &str, exists: impl Fn(&Path) -> bool) -> PathBuf {
    let candidate = dest_dir.join(desired);
    if !exists(&candidate) {
        return candidate;
    }

    let as_path = Path::new(desired);
    let stem = as_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| desired.to_string());
    let suffix = as_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1u64;
    loop {
        let candidate = dest_dir.join(format!("{stem}_{counter}{suffix}"));
        if !exists(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Apply `action` to every entry of `plan`.
///
/// With `dry_run` no filesystem mutation happens, but every outcome still
/// names the destination a real run would use.
pub fn apply_action(
    fs: &dyn FileSystem,
    plan: &ReconciliationPlan,
    action: &Action,
    dry_run: bool,
) -> ActionResult {
    let mut result = ActionResult::dry(dry_run);
    if plan.is_empty() {
        return result;
    }

    let dest_error = match action.dest() {
        Some(dest) if !dry_run => fs.create_dir_all(dest).err().map(|e| {
            tracing::warn!(dest = %dest.display(), "Failed to create destination: {}", e);
            e.to_string()
        }),
        _ => None,
    };

    // Names handed out earlier in this run count as taken
    let mut reserved: HashSet<PathBuf> = HashSet::new();

    for entry in plan.iter() {
        let reference = if plan.shows_reference() {
            entry.reference.as_ref().map(|r| r.path.clone())
        } else {
            None
        };

        let destination = action.dest().map(|dest| {
            let chosen = disambiguate(dest, &entry.source.name, |p| {
                reserved.contains(p) || fs.exists(p)
            });
            reserved.insert(chosen.clone());
            chosen
        });

        let status = if dry_run {
            tracing::debug!(source = %entry.source.path.display(), "would {}", action.verb());
            ActionStatus::Planned
        } else if let Some(message) = &dest_error {
            ActionStatus::Failed(message.clone())
        } else {
            perform(fs, entry, action, destination.as_deref())
        };

        result.record(ActionOutcome {
            source: entry.source.path.clone(),
            destination,
            reference,
            status,
        });
    }

    tracing::info!(
        action = action.verb(),
        attempted = result.attempted,
        succeeded = result.succeeded,
        failed = result.failed,
        dry_run,
        "action applied"
    );
    result
}

fn perform(
    fs: &dyn FileSystem,
    entry: &PlanEntry,
    action: &Action,
    destination: Option<&Path>,
) -> ActionStatus {
    let source = &entry.source.path;
    let outcome = match (action, destination) {
        (Action::Delete, _) => fs.delete(source),
        (Action::Move { .. }, Some(to)) => fs.move_file(source, to),
        (Action::Copy { .. }, Some(to)) => fs.copy(source, to).map(|_| ()),
        (_, None) => return ActionStatus::Failed("No destination resolved".to_string()),
    };

    match outcome {
        Ok(()) => {
            tracing::debug!(source = %source.display(), "{} done", action.verb());
            ActionStatus::Done
        }
        Err(e) => {
            tracing::warn!(source = %source.display(), "Failed to {}: {}", action.verb(), e);
            ActionStatus::Failed(e.to_string())
        }
    }
}
