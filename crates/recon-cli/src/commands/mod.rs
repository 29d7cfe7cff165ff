//! Command implementations for recon-cli

pub mod batch;
pub mod completions;
pub mod mirror;
pub mod run;
pub mod template;

pub use batch::run_job;
pub use completions::run_completions;
pub use mirror::run_mirror_job;
pub use run::run_job_file;
pub use template::run_template;

/// Global flags every command honours.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Skip the confirmation prompt
    pub yes: bool,
    /// Print JSON instead of the human-readable report
    pub json: bool,
}
