// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Restore command

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use becupe_core::TargetId;

#[derive(clap::Args)]
pub struct RestoreArgs {
    /// Archive to restore (a .becupe file)
    pub archive: PathBuf,

    /// Which game's save directory to replace (MSC or MWC)
    pub target: TargetId,

    /// Take a protective backup of the current save data first
    #[arg(long)]
    pub protect: bool,

    /// Where to put the protective backup (defaults to the configured folder)
    #[arg(long, requires = "protect")]
    pub protect_dest: Option<PathBuf>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Ask the user to confirm the destructive restore.
/// Returns true when the user answered yes (or --yes was passed).
pub fn confirm(args: &RestoreArgs) -> Result<bool> {
    if args.yes {
        return Ok(true);
    }

    print!(
        "This will DELETE the current {} save data and replace it with {}.\nContinue? [y/N] ",
        args.target,
        args.archive.display()
    );
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();

    Ok(answer == "y" || answer == "yes")
}
