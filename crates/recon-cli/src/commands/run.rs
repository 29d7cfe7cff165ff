//! The run command: execute a job file

use std::path::Path;

use recon_core::JobConfig;
use recon_fs::ConfigStore;

use super::{Options, run_job};
use crate::error::Result;

/// Load a toml/json/yaml job file and run it.
///
/// `--dry-run` on the command line wins over `dry_run = false` in the file.
pub fn run_job_file(path: &Path, dry_run: bool, options: Options) -> Result<()> {
    let config: JobConfig = ConfigStore::new().load(path)?;
    tracing::debug!(
        path = %path.display(),
        operation = config.job.operation(),
        "loaded job file"
    );

    let config = if dry_run {
        config.with_dry_run(true)
    } else {
        config
    };
    run_job(config, options)
}
