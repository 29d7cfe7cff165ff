//! Job orchestration: scan, plan, apply

use recon_fs::FileSystem;

use crate::action::{Action, ActionResult, apply_action};
use crate::index::{DirectoryIndex, scan_directory};
use crate::job::{JobSpec, Transfer};
use crate::key::KeyMode;
use crate::plan::{
    ReconciliationPlan, SetOperation, plan_by_positional_stride, plan_by_set_operation,
};
use crate::{Error, Result};

/// A planned batch job, ready to preview or execute.
#[derive(Debug, Clone)]
pub struct PreparedJob {
    pub plan: ReconciliationPlan,
    pub action: Action,
    /// Index of the directory the action applies to
    pub primary: DirectoryIndex,
    /// Index the primary was compared against, if any
    pub secondary: Option<DirectoryIndex>,
}

impl PreparedJob {
    /// Total warnings recorded while scanning.
    pub fn warning_count(&self) -> usize {
        self.primary.warnings().len()
            + self
                .secondary
                .as_ref()
                .map(|index| index.warnings().len())
                .unwrap_or(0)
    }

    /// Files left in the primary directory after the action.
    ///
    /// Copies leave every candidate in place.
    pub fn kept(&self) -> usize {
        match self.action {
            Action::Copy { .. } => self.plan.considered,
            Action::Delete | Action::Move { .. } => self.plan.unselected(),
        }
    }
}

/// Runs batch jobs against a [`FileSystem`].
pub struct Reconciler<F: FileSystem> {
    fs: F,
}

impl<F: FileSystem> Reconciler<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Scan and plan `job` without touching anything.
    ///
    /// Mirror jobs run continuously and return [`Error::NotBatch`].
    pub fn prepare(&self, job: &JobSpec) -> Result<PreparedJob> {
        tracing::debug!(operation = job.operation(), "preparing job");
        match job {
            JobSpec::Match {
                source,
                reference,
                key,
                action,
            } => {
                let primary = scan_directory(&self.fs, source, key);
                let secondary = scan_directory(&self.fs, reference, key);
                let plan = plan_by_set_operation(&primary, &secondary, SetOperation::Intersection);
                Ok(PreparedJob {
                    plan,
                    action: action.clone(),
                    primary,
                    secondary: Some(secondary),
                })
            }
            JobSpec::Prune { target, reference } => {
                let primary = scan_directory(&self.fs, target, &KeyMode::Name);
                let secondary = scan_directory(&self.fs, reference, &KeyMode::Name);
                let plan = plan_by_set_operation(&primary, &secondary, SetOperation::Difference);
                Ok(PreparedJob {
                    plan,
                    action: Action::Delete,
                    primary,
                    secondary: Some(secondary),
                })
            }
            JobSpec::Split {
                source,
                dest,
                interval,
                transfer,
            } => {
                let primary = scan_directory(&self.fs, source, &KeyMode::Name);
                let plan = plan_by_positional_stride(&primary.sorted_entries(), *interval)?;
                let action = match transfer {
                    Transfer::Move => Action::Move { dest: dest.clone() },
                    Transfer::Copy => Action::Copy { dest: dest.clone() },
                };
                Ok(PreparedJob {
                    plan,
                    action,
                    primary,
                    secondary: None,
                })
            }
            JobSpec::Mirror { .. } => Err(Error::NotBatch {
                operation: job.operation().to_string(),
            }),
        }
    }

    /// Apply a prepared job.
    pub fn execute(&self, prepared: &PreparedJob, dry_run: bool) -> ActionResult {
        apply_action(&self.fs, &prepared.plan, &prepared.action, dry_run)
    }

    /// Prepare and execute in one step.
    pub fn run(&self, job: &JobSpec, dry_run: bool) -> Result<ActionResult> {
        let prepared = self.prepare(job)?;
        Ok(self.execute(&prepared, dry_run))
    }
}
