//! The template command: write an example job file

use std::path::Path;

use colored::Colorize;

use recon_core::{Action, DEFAULT_INTERVAL, JobConfig, JobSpec, KeyMode, Transfer};
use recon_fs::ConfigStore;

use crate::cli::Operation;
use crate::error::{CliError, Result};

/// Example job for each operation, with placeholder directories.
pub fn example_job(operation: Operation) -> JobConfig {
    let job = match operation {
        Operation::Match => JobSpec::Match {
            source: "data/train".into(),
            reference: "data/val".into(),
            key: KeyMode::NameSize,
            action: Action::Move {
                dest: "data/excluded".into(),
            },
        },
        Operation::Prune => JobSpec::Prune {
            target: "data/labels".into(),
            reference: "data/images".into(),
        },
        Operation::Split => JobSpec::Split {
            source: "data/images".into(),
            dest: "data/val".into(),
            interval: DEFAULT_INTERVAL,
            transfer: Transfer::Move,
        },
        Operation::Mirror => JobSpec::Mirror {
            watched: "data/images".into(),
            target: "data/labels".into(),
        },
    };
    JobConfig::new(job).with_dry_run(true)
}

/// Write the example job for `operation` to `path`.
pub fn run_template(path: &Path, operation: Operation, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::user(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let config = example_job(operation);
    ConfigStore::new().save(path, &config)?;

    println!(
        "{} Wrote {} job to {}",
        "OK".green().bold(),
        config.job.operation(),
        path.display().to_string().cyan()
    );
    println!("   Edit the directories, then run {}", format!("recon run {}", path.display()).cyan());
    Ok(())
}
