//! Job configuration
//!
//! A job names the directories and the operation to run over them. It is
//! built from CLI flags or loaded from a job file; nothing here reads
//! process-wide state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use recon_fs::io::resolve_path;

use crate::action::Action;
use crate::key::KeyMode;
use crate::{Error, Result};

/// Stride used by `split` when none is given.
pub const DEFAULT_INTERVAL: usize = 5;

fn default_interval() -> usize {
    DEFAULT_INTERVAL
}

/// How `split` transfers the selected files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transfer {
    #[default]
    Move,
    Copy,
}

/// One reconciliation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum JobSpec {
    /// Apply `action` to source files whose key also appears in reference
    Match {
        source: PathBuf,
        reference: PathBuf,
        #[serde(default)]
        key: KeyMode,
        #[serde(default)]
        action: Action,
    },
    /// Delete target files whose name is absent from reference
    Prune { target: PathBuf, reference: PathBuf },
    /// Transfer every `interval`-th file of the name-sorted source to dest
    Split {
        source: PathBuf,
        dest: PathBuf,
        #[serde(default = "default_interval")]
        interval: usize,
        #[serde(default)]
        transfer: Transfer,
    },
    /// Mirror deletions from watched into target while running
    Mirror { watched: PathBuf, target: PathBuf },
}

impl JobSpec {
    /// Name of the operation as it appears in job files.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Match { .. } => "match",
            Self::Prune { .. } => "prune",
            Self::Split { .. } => "split",
            Self::Mirror { .. } => "mirror",
        }
    }

    /// Directories that must exist before the job runs, with their roles.
    pub fn required_dirs(&self) -> Vec<(&'static str, &Path)> {
        match self {
            Self::Match {
                source, reference, ..
            } => vec![("Source", source.as_path()), ("Reference", reference.as_path())],
            Self::Prune { target, reference } => {
                vec![("Target", target.as_path()), ("Reference", reference.as_path())]
            }
            Self::Split { source, .. } => vec![("Source", source.as_path())],
            Self::Mirror { watched, target } => {
                vec![("Watched", watched.as_path()), ("Target", target.as_path())]
            }
        }
    }

    /// Role pairs that must not name the same directory.
    fn distinct_dirs(&self) -> Vec<((&'static str, &Path), (&'static str, &Path))> {
        match self {
            Self::Match {
                source,
                reference,
                action,
                ..
            } => {
                let mut pairs = vec![(("Source", source.as_path()), ("Reference", reference.as_path()))];
                if let Some(dest) = action.dest() {
                    pairs.push((("Destination", dest), ("Source", source.as_path())));
                }
                pairs
            }
            Self::Prune { target, reference } => {
                vec![(("Target", target.as_path()), ("Reference", reference.as_path()))]
            }
            Self::Split { source, dest, .. } => {
                vec![(("Destination", dest.as_path()), ("Source", source.as_path()))]
            }
            Self::Mirror { watched, target } => {
                vec![(("Watched", watched.as_path()), ("Target", target.as_path()))]
            }
        }
    }

    /// Check the job before any scan: required directories exist, roles
    /// point at distinct directories, and the split interval is positive.
    pub fn validate(&self) -> Result<()> {
        for (role, path) in self.required_dirs() {
            if !path.is_dir() {
                return Err(Error::MissingDirectory {
                    role,
                    path: path.to_path_buf(),
                });
            }
        }

        for ((role, path), (other, other_path)) in self.distinct_dirs() {
            if resolve_path(path) == resolve_path(other_path) {
                return Err(Error::SameDirectory {
                    role,
                    other,
                    path: path.to_path_buf(),
                });
            }
        }

        if let Self::Split { interval, .. } = self
            && *interval == 0
        {
            return Err(Error::InvalidInterval {
                interval: *interval,
            });
        }

        Ok(())
    }

    /// Copy of the job with every existing directory canonicalized.
    pub fn resolved(&self) -> Self {
        let r = |p: &PathBuf| resolve_path(p);
        match self {
            Self::Match {
                source,
                reference,
                key,
                action,
            } => Self::Match {
                source: r(source),
                reference: r(reference),
                key: key.clone(),
                action: match action {
                    Action::Delete => Action::Delete,
                    Action::Move { dest } => Action::Move { dest: r(dest) },
                    Action::Copy { dest } => Action::Copy { dest: r(dest) },
                },
            },
            Self::Prune { target, reference } => Self::Prune {
                target: r(target),
                reference: r(reference),
            },
            Self::Split {
                source,
                dest,
                interval,
                transfer,
            } => Self::Split {
                source: r(source),
                dest: r(dest),
                interval: *interval,
                transfer: *transfer,
            },
            Self::Mirror { watched, target } => Self::Mirror {
                watched: r(watched),
                target: r(target),
            },
        }
    }
}

/// A job plus run options, as stored in a job file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    #[serde(flatten)]
    pub job: JobSpec,
    #[serde(default)]
    pub dry_run: bool,
}

impl JobConfig {
    pub fn new(job: JobSpec) -> Self {
        Self {
            job,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.job.validate()
    }
}
