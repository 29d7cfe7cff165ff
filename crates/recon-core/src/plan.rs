//! Reconciliation plans
//!
//! A plan is the ordered list of files selected for an action. It is computed
//! once, before any mutation, and is not re-validated against the filesystem.

use recon_fs::FileEntry;

use crate::index::DirectoryIndex;
use crate::key::{ComparisonKey, KeyMode, name_key};
use crate::{Error, Result};

/// How two indexes are combined into a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperation {
    /// Keys present in both indexes
    Intersection,
    /// Primary entries whose name is absent from the secondary index
    Difference,
}

/// One file selected for action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    /// 1-based position among the candidates the plan was built from
    pub position: usize,
    pub key: ComparisonKey,
    pub source: FileEntry,
    /// The matching file in the other directory, for intersection plans
    pub reference: Option<FileEntry>,
}

/// Files selected for an action, in application order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationPlan {
    pub key_mode: KeyMode,
    pub entries: Vec<PlanEntry>,
    /// Number of candidate files the entries were selected from
    pub considered: usize,
}

impl ReconciliationPlan {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlanEntry> {
        self.entries.iter()
    }

    /// Candidates not selected by the plan.
    pub fn unselected(&self) -> usize {
        self.considered.saturating_sub(self.entries.len())
    }

    /// Whether previews should show the matching reference file.
    ///
    /// Under name-only keys the reference has the same name and adds nothing.
    pub fn shows_reference(&self) -> bool {
        !self.key_mode.is_name_only()
    }
}

/// Combine two indexes built with the same key mode.
///
/// Every scanned file of `primary` is a candidate, even when several share a
/// key. Plan order follows `primary`'s scan order.
pub fn plan_by_set_operation(
    primary: &DirectoryIndex,
    secondary: &DirectoryIndex,
    operation: SetOperation,
) -> ReconciliationPlan {
    let entries = match operation {
        SetOperation::Intersection => primary
            .files()
            .enumerate()
            .filter_map(|(idx, (key, entry))| {
                secondary.get(key).map(|reference| PlanEntry {
                    position: idx + 1,
                    key: key.clone(),
                    source: entry.clone(),
                    reference: Some(reference.clone()),
                })
            })
            .collect(),
        SetOperation::Difference => {
            let names = secondary.names();
            primary
                .files()
                .enumerate()
                .filter(|(_, (_, entry))| !names.contains(entry.name.as_str()))
                .map(|(idx, (key, entry))| PlanEntry {
                    position: idx + 1,
                    key: key.clone(),
                    source: entry.clone(),
                    reference: None,
                })
                .collect()
        }
    };

    ReconciliationPlan {
        key_mode: primary.key_mode().clone(),
        entries,
        considered: primary.file_count(),
    }
}

/// Select every `interval`-th entry (1-based positions `interval`, `2*interval`, ...).
///
/// `entries` must already be sorted for the split to be reproducible.
pub fn plan_by_positional_stride(
    entries: &[FileEntry],
    interval: usize,
) -> Result<ReconciliationPlan> {
    if interval == 0 {
        return Err(Error::InvalidInterval { interval });
    }

    let selected = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| (idx + 1, entry))
        .filter(|(position, _)| position % interval == 0)
        .map(|(position, entry)| PlanEntry {
            position,
            key: name_key(&entry.name),
            source: entry.clone(),
            reference: None,
        })
        .collect();

    Ok(ReconciliationPlan {
        key_mode: KeyMode::Name,
        entries: selected,
        considered: entries.len(),
    })
}
