//! Batch jobs: match, frames, prune and split
//!
//! Every batch job follows the same path: validate, scan and plan, preview
//! or confirm, apply, report.

use colored::Colorize;

use recon_core::{ActionResult, JobConfig, JobSpec, Reconciler};
use recon_fs::LocalFs;

use super::Options;
use crate::error::Result;
use crate::interactive;
use crate::report::{self, JobReport};

/// Run a job described by `config`.
///
/// Mirror jobs are handed to the mirror loop; everything else runs once.
pub fn run_job(config: JobConfig, options: Options) -> Result<()> {
    config.validate()?;
    let job = config.job.resolved();

    if let JobSpec::Mirror { watched, target } = &job {
        return super::run_mirror_job(watched, target, options);
    }

    let dry_run = config.dry_run;
    if !options.json {
        report::print_header(&job, dry_run);
    }

    let reconciler = Reconciler::new(LocalFs);
    let prepared = reconciler.prepare(&job)?;

    if !options.json {
        report::print_scan(&prepared);
    }

    if prepared.plan.is_empty() {
        let result = ActionResult {
            dry_run,
            ..ActionResult::default()
        };
        if options.json {
            JobReport::new(&job, &prepared, &result).print()?;
        } else {
            report::print_empty_plan(&prepared);
            report::print_summary(&job, &prepared, &result);
        }
        return Ok(());
    }

    if !options.json {
        report::print_plan(&prepared);
    }

    if !dry_run && !options.yes && !interactive::confirm("Proceed?")? {
        if options.json {
            let result = ActionResult::default();
            JobReport::new(&job, &prepared, &result).cancelled().print()?;
        } else {
            println!("Cancelled.");
        }
        return Ok(());
    }

    let result = reconciler.execute(&prepared, dry_run);
    tracing::debug!(
        operation = job.operation(),
        succeeded = result.succeeded,
        failed = result.failed,
        "job finished"
    );

    if options.json {
        JobReport::new(&job, &prepared, &result).print()?;
    } else {
        report::print_outcomes(&result, &prepared.action);
        report::print_summary(&job, &prepared, &result);
        if result.failed > 0 {
            println!(
                "{} {} files could not be processed; see the lines marked FAILED.",
                "!".yellow(),
                result.failed
            );
        }
    }

    Ok(())
}
