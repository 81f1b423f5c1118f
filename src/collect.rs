//! Operator answer collection.
//!
//! The full-screen browser is used when both stdin and stdout are terminals;
//! otherwise (or with `--no-tui`) questions are asked line by line. Either
//! way the result is `None` when the operator leaves without confirming.
mod line;
mod tui;

use crate::manifest::{Answers, ManifestGroups};
use anyhow::Result;
use std::io::{self, IsTerminal};

pub fn run(title: &str, groups: ManifestGroups, force_lines: bool) -> Result<Option<Answers>> {
    if groups.is_empty() {
        tracing::warn!("no known manifest entries in the catalog, nothing to ask");
        return Ok(Some(Answers::new()));
    }
    tracing::info!(
        prompts = groups.len(),
        entries = groups.entry_count(),
        "collecting manifest answers"
    );
    let terminal = io::stdin().is_terminal() && io::stdout().is_terminal();
    if force_lines || !terminal {
        let stdin = io::stdin();
        let stdout = io::stdout();
        return line::run(title, groups, &mut stdin.lock(), &mut stdout.lock());
    }
    tui::run(title, groups)
}

/// Append one decimal digit, refusing values that would overflow.
fn push_digit(current: Option<u64>, digit: u8) -> Option<u64> {
    current
        .unwrap_or(0)
        .checked_mul(10)
        .and_then(|value| value.checked_add(u64::from(digit)))
}
