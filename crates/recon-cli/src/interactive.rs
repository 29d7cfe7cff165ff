//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for terminal-based confirmation. When stdin is not a
//! terminal the answer is read as a plain line so scripts can pipe it in.

use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::Confirm;

use crate::error::Result;

/// Ask before a mutating run. Defaults to no.
pub fn confirm(prompt: &str) -> Result<bool> {
    if io::stdin().is_terminal() {
        let answer = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        return Ok(answer);
    }

    eprint!("{prompt} [y/N] ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(is_yes(&line))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
