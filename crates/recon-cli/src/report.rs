//! Human-readable and JSON reporting of job runs

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use recon_core::{
    Action, ActionOutcome, ActionResult, ActionStatus, DirectoryIndex, JobSpec, PreparedJob,
};

/// How many sample keys are shown when nothing matched.
const SAMPLE_KEYS: usize = 3;

/// Machine-readable summary of one job run, printed with `--json`.
#[derive(Debug, Serialize)]
pub struct JobReport<'a> {
    pub operation: &'static str,
    pub key_mode: String,
    pub considered: usize,
    pub selected: usize,
    pub kept: usize,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled: Option<bool>,
    pub result: &'a ActionResult,
}

impl<'a> JobReport<'a> {
    pub fn new(job: &JobSpec, prepared: &PreparedJob, result: &'a ActionResult) -> Self {
        let mut warnings: Vec<String> = prepared
            .primary
            .warnings()
            .iter()
            .map(|w| format!("{}: {}", w.path.display(), w.message))
            .collect();
        if let Some(secondary) = &prepared.secondary {
            warnings.extend(
                secondary
                    .warnings()
                    .iter()
                    .map(|w| format!("{}: {}", w.path.display(), w.message)),
            );
        }

        Self {
            operation: job.operation(),
            key_mode: prepared.plan.key_mode.to_string(),
            considered: prepared.plan.considered,
            selected: prepared.plan.len(),
            kept: prepared.kept(),
            warnings,
            cancelled: None,
            result,
        }
    }

    pub fn cancelled(mut self) -> Self {
        self.cancelled = Some(true);
        self
    }

    pub fn print(&self) -> crate::error::Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}

/// Print what the job is about to do.
pub fn print_header(job: &JobSpec, dry_run: bool) {
    let title = match job {
        JobSpec::Match { .. } => "Match",
        JobSpec::Prune { .. } => "Prune",
        JobSpec::Split { .. } => "Split",
        JobSpec::Mirror { .. } => "Mirror",
    };
    println!("{} {}", "=>".blue().bold(), title.bold());

    match job {
        JobSpec::Match {
            source,
            reference,
            key,
            action,
        } => {
            print_field("Source", &source.display().to_string());
            print_field("Reference", &reference.display().to_string());
            print_field("Key", &key.to_string());
            print_field("Action", &describe_action(action));
        }
        JobSpec::Prune { target, reference } => {
            print_field("Target", &target.display().to_string());
            print_field("Reference", &reference.display().to_string());
        }
        JobSpec::Split {
            source,
            dest,
            interval,
            transfer,
        } => {
            print_field("Source", &source.display().to_string());
            print_field("Destination", &dest.display().to_string());
            print_field("Interval", &format!("every {interval}th file"));
            print_field("Transfer", &format!("{transfer:?}").to_lowercase());
        }
        JobSpec::Mirror { watched, target } => {
            print_field("Watched", &watched.display().to_string());
            print_field("Target", &target.display().to_string());
        }
    }
    if dry_run {
        print_field("Mode", &"dry run (no changes)".yellow().to_string());
    }
    println!();
}

fn print_field(label: &str, value: &str) {
    println!("   {:<12} {}", format!("{label}:").dimmed(), value);
}

fn describe_action(action: &Action) -> String {
    match action {
        Action::Delete => "delete".to_string(),
        Action::Move { dest } => format!("move to {}", dest.display()),
        Action::Copy { dest } => format!("copy to {}", dest.display()),
    }
}

/// Print file counts and scan warnings.
pub fn print_scan(prepared: &PreparedJob) {
    print_index("Scanned", &prepared.primary);
    if let Some(secondary) = &prepared.secondary {
        print_index("Compared", secondary);
    }

    let warnings = prepared.primary.warnings().iter().chain(
        prepared
            .secondary
            .iter()
            .flat_map(|index| index.warnings().iter()),
    );
    for warning in warnings {
        println!(
            "   {} skipped {}: {}",
            "!".yellow(),
            warning.path.display().to_string().cyan(),
            warning.message
        );
    }
}

fn print_index(label: &str, index: &DirectoryIndex) {
    println!(
        "{} {} {} files in {}",
        "=>".blue().bold(),
        label,
        index.file_count(),
        index.dir().display().to_string().cyan()
    );
}

/// Explain an empty plan, with sample keys so a key-mode mismatch is visible.
pub fn print_empty_plan(prepared: &PreparedJob) {
    println!();
    println!(
        "{} No files selected under '{}' keys.",
        "OK".green().bold(),
        prepared.plan.key_mode
    );

    if let Some(secondary) = &prepared.secondary
        && !prepared.primary.is_empty()
        && !secondary.is_empty()
    {
        println!();
        println!("{}", "Sample keys:".dimmed());
        print_samples(&prepared.primary);
        print_samples(secondary);
    }
}

fn print_samples(index: &DirectoryIndex) {
    let samples: Vec<String> = index
        .sample_keys(SAMPLE_KEYS)
        .into_iter()
        .map(|k| k.to_string())
        .collect();
    println!("   {}: {:?}", index.dir().display(), samples);
}

/// Print how many files the plan selected.
pub fn print_plan(prepared: &PreparedJob) {
    println!(
        "{} {} of {} files selected to {}",
        "=>".blue().bold(),
        prepared.plan.len().to_string().bold(),
        prepared.plan.considered,
        prepared.action.verb()
    );
    if let Some(dest) = prepared.action.dest() {
        println!("   into {}", dest.display().to_string().cyan());
    }
    println!();
}

/// Print one line per outcome.
pub fn print_outcomes(result: &ActionResult, action: &Action) {
    for (i, outcome) in result.outcomes.iter().enumerate() {
        print_outcome(i + 1, outcome, action);
    }
    if !result.outcomes.is_empty() {
        println!();
    }
}

fn print_outcome(n: usize, outcome: &ActionOutcome, action: &Action) {
    let name = file_name(&outcome.source);
    let target = outcome
        .destination
        .as_deref()
        .map(|d| format!(" -> {}", file_name(d)))
        .unwrap_or_default();
    let verb = action.verb().to_uppercase();

    match &outcome.status {
        ActionStatus::Planned => {
            println!("   [{n:4}] {} {name}{target}", verb.yellow());
        }
        ActionStatus::Done => {
            println!("   [{n:4}] {} {name}{target}", verb.green());
        }
        ActionStatus::Failed(error) => {
            println!("   [{n:4}] {} {name}: {}", "FAILED".red().bold(), error);
        }
    }
    if let Some(reference) = &outcome.reference {
        println!("          {} {}", "matches".dimmed(), reference.display());
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Print totals, plus kept counts and the split ratio where they apply.
pub fn print_summary(job: &JobSpec, prepared: &PreparedJob, result: &ActionResult) {
    if result.dry_run {
        println!(
            "{} Dry run: {} files would be {}.",
            "OK".green().bold(),
            result.planned,
            past_tense(&prepared.action)
        );
    } else {
        let status = if result.failed == 0 {
            "OK".green().bold()
        } else {
            "PARTIAL".yellow().bold()
        };
        println!(
            "{} attempted {} / succeeded {} / failed {}",
            status,
            result.attempted,
            result.succeeded.to_string().green(),
            result.failed.to_string().red()
        );
        if result.attempted > 0 {
            let rate = result.succeeded as f64 / result.attempted as f64 * 100.0;
            println!("   success rate: {rate:.1}%");
        }
    }

    match job {
        JobSpec::Prune { .. } => {
            println!("   kept: {}", prepared.kept());
        }
        JobSpec::Split { .. } => {
            println!("   kept: {}", prepared.kept());
            if prepared.plan.considered > 0 {
                let ratio = prepared.plan.len() as f64 / prepared.plan.considered as f64 * 100.0;
                println!("   split ratio: {ratio:.1}%");
            }
        }
        _ => {}
    }
}

fn past_tense(action: &Action) -> &'static str {
    match action {
        Action::Delete => "deleted",
        Action::Move { .. } => "moved",
        Action::Copy { .. } => "copied",
    }
}
