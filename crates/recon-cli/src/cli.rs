//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use recon_core::{Action, DEFAULT_INTERVAL, FRAME_PATTERN, KeyMode};

/// Dataset Reconciler - Reconcile dataset directories by file correspondence
#[derive(Parser, Debug)]
#[command(name = "recon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip the confirmation prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Print the result as JSON instead of a human-readable report
    #[arg(long, global = true)]
    pub json: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// What to do with matched files
#[derive(Args, Debug, Clone, PartialEq, Eq, Default)]
#[group(multiple = false)]
pub struct ActionArgs {
    /// Delete matched files from SOURCE (default)
    #[arg(long)]
    pub delete: bool,

    /// Move matched files into DIR instead of deleting them
    #[arg(long, value_name = "DIR")]
    pub move_to: Option<PathBuf>,

    /// Copy matched files into DIR, leaving SOURCE untouched
    #[arg(long, value_name = "DIR")]
    pub copy_to: Option<PathBuf>,
}

impl ActionArgs {
    pub fn action(&self) -> Action {
        match (&self.move_to, &self.copy_to) {
            (Some(dest), _) => Action::Move { dest: dest.clone() },
            (None, Some(dest)) => Action::Copy { dest: dest.clone() },
            (None, None) => Action::Delete,
        }
    }
}

/// Job kinds a template can be written for
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operation {
    #[default]
    Match,
    Prune,
    Split,
    Mirror,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Act on SOURCE files that have a counterpart in REFERENCE
    ///
    /// Examples:
    ///   recon match train val                       # Delete train files also in val
    ///   recon match train val --key name-size      # Match on name and size
    ///   recon match train val --move-to excluded   # Move instead of delete
    ///   recon match train val --dry-run            # Preview only
    Match {
        /// Directory whose files are acted on
        source: PathBuf,

        /// Directory the source is compared against
        reference: PathBuf,

        /// Comparison key: name, name-size, size-name, hash or regex:<pattern>
        #[arg(short, long, default_value = "name")]
        key: KeyMode,

        #[command(flatten)]
        action: ActionArgs,

        /// Preview without touching any file
        #[arg(long)]
        dry_run: bool,
    },

    /// Copy TRAIN files whose frame number appears in REFERENCE into OUTPUT
    Frames {
        /// Directory holding the frame numbers to look for
        reference: PathBuf,

        /// Directory the matching frames are copied from
        train: PathBuf,

        /// Directory the matching frames are copied into
        output: PathBuf,

        /// Regex whose first capture group is the frame number
        #[arg(long, default_value = FRAME_PATTERN)]
        pattern: String,

        /// Preview without touching any file
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete TARGET files whose name does not appear in REFERENCE
    Prune {
        /// Directory to clean up
        target: PathBuf,

        /// Directory whose file names are kept
        reference: PathBuf,

        /// Preview without touching any file
        #[arg(long)]
        dry_run: bool,
    },

    /// Move every N-th file of SOURCE (sorted by name) into DEST
    Split {
        /// Directory to split
        source: PathBuf,

        /// Directory receiving the selected files
        dest: PathBuf,

        /// Select positions N, 2N, 3N, ...
        #[arg(short = 'n', long, default_value_t = DEFAULT_INTERVAL)]
        interval: usize,

        /// Copy instead of move
        #[arg(long)]
        copy: bool,

        /// Preview without touching any file
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete files from TARGET as they are deleted from WATCHED
    ///
    /// Runs until interrupted with Ctrl+C.
    Mirror {
        /// Directory to watch for deletions
        watched: PathBuf,

        /// Directory whose same-named files are deleted
        target: PathBuf,
    },

    /// Run a job file (toml, json or yaml)
    Run {
        /// Path to the job file
        job_file: PathBuf,

        /// Preview without touching any file, overriding the job file
        #[arg(long)]
        dry_run: bool,
    },

    /// Write an example job file
    Template {
        /// Where to write the job file; the extension picks the format
        job_file: PathBuf,

        /// Kind of job to write
        #[arg(short, long, value_enum, default_value_t = Operation::Match)]
        operation: Operation,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completions
    ///
    /// Outputs completion script for your shell.
    ///
    /// Examples:
    ///   recon completions bash > ~/.local/share/bash-completion/completions/recon
    ///   recon completions zsh > ~/.zfunc/_recon
    ///   recon completions fish > ~/.config/fish/completions/recon.fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
