//! Dataset Reconciler CLI
//!
//! The command-line interface for reconciling dataset directories.

mod cli;
mod commands;
mod error;
mod interactive;
mod report;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use commands::Options;
use error::{CliError, Result};
use recon_core::{Action, JobConfig, JobSpec, KeyMode, Transfer};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let options = Options {
        yes: cli.yes,
        json: cli.json,
    };

    match cli.command {
        Some(cmd) => execute_command(cmd, options),
        None => {
            // No command provided - show help hint
            println!("{} Dataset Reconciler CLI", "recon".green().bold());
            println!();
            println!("Run {} for available commands.", "recon --help".cyan());
            Ok(())
        }
    }
}

/// Logs go to stderr so they never mix with `--json` output.
fn init_tracing(verbose: bool) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_target(verbose);

    let result = if verbose {
        tracing::subscriber::set_global_default(builder.with_max_level(Level::DEBUG).finish())
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing::subscriber::set_global_default(builder.with_env_filter(filter).finish())
    };
    result.map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {e}")))?;

    tracing::debug!("Verbose mode enabled");
    Ok(())
}

fn execute_command(cmd: Commands, options: Options) -> Result<()> {
    match cmd {
        Commands::Match {
            source,
            reference,
            key,
            action,
            dry_run,
        } => {
            let job = JobSpec::Match {
                source,
                reference,
                key,
                action: action.action(),
            };
            commands::run_job(JobConfig::new(job).with_dry_run(dry_run), options)
        }
        Commands::Frames {
            reference,
            train,
            output,
            pattern,
            dry_run,
        } => {
            let job = JobSpec::Match {
                source: train,
                reference,
                key: KeyMode::regex(&pattern)?,
                action: Action::Copy { dest: output },
            };
            commands::run_job(JobConfig::new(job).with_dry_run(dry_run), options)
        }
        Commands::Prune {
            target,
            reference,
            dry_run,
        } => {
            let job = JobSpec::Prune { target, reference };
            commands::run_job(JobConfig::new(job).with_dry_run(dry_run), options)
        }
        Commands::Split {
            source,
            dest,
            interval,
            copy,
            dry_run,
        } => {
            let transfer = if copy { Transfer::Copy } else { Transfer::Move };
            let job = JobSpec::Split {
                source,
                dest,
                interval,
                transfer,
            };
            commands::run_job(JobConfig::new(job).with_dry_run(dry_run), options)
        }
        Commands::Mirror { watched, target } => {
            commands::run_job(JobConfig::new(JobSpec::Mirror { watched, target }), options)
        }
        Commands::Run { job_file, dry_run } => commands::run_job_file(&job_file, dry_run, options),
        Commands::Template {
            job_file,
            operation,
            force,
        } => commands::run_template(&job_file, operation, force),
        Commands::Completions { shell } => {
            commands::run_completions(shell);
            Ok(())
        }
    }
}
