//! Directory reconciliation engine for Dataset Reconciler
//!
//! This crate decides which files of one directory correspond to files of
//! another and acts on them:
//!
//! - **Keys**: name, name+size, size+name, regex token or content hash
//! - **Indexes**: non-recursive scans keyed by a [`KeyMode`]
//! - **Plans**: set intersection/difference between two indexes, or a
//!   positional stride over one
//! - **Actions**: delete, move or copy each planned file, with dry runs and
//!   collision-safe destination names
//! - **Mirror**: reactive deletion mirroring driven by a [`DeletionSource`]
//!
//! # Architecture
//!
//! ```text
//!            recon-cli
//!                |
//!           recon-core
//!       (jobs, reconciler, mirror)
//!                |
//!            recon-fs
//! ```
//!
//! # Example
//!
//! ```ignore
//! use recon_core::{JobSpec, KeyMode, Reconciler};
//! use recon_fs::LocalFs;
//!
//! let job = JobSpec::Prune {
//!     target: "data/labels".into(),
//!     reference: "data/images".into(),
//! };
//! job.validate()?;
//! let result = Reconciler::new(LocalFs).run(&job, true)?;
//! println!("{} files would be deleted", result.planned);
//! ```

pub mod action;
pub mod error;
pub mod index;
pub mod job;
pub mod key;
pub mod mirror;
pub mod plan;
pub mod reconciler;
pub mod watch;

pub use action::{Action, ActionOutcome, ActionResult, ActionStatus, apply_action, disambiguate};
pub use error::{Error, Result};
pub use index::{DirectoryIndex, ScanWarning, scan_directory};
pub use job::{DEFAULT_INTERVAL, JobConfig, JobSpec, Transfer};
pub use key::{ComparisonKey, FRAME_PATTERN, KeyMode, TokenPattern};
pub use mirror::{DeleteMirror, DeletionEvent, DeletionSource, IDLE_TICK, MirrorOutcome, run_mirror};
pub use plan::{
    PlanEntry, ReconciliationPlan, SetOperation, plan_by_positional_stride, plan_by_set_operation,
};
pub use reconciler::{PreparedJob, Reconciler};
pub use watch::{ChannelSource, NotifySource};
