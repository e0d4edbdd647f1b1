// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manual backup command

use std::path::PathBuf;

use becupe_core::TargetId;

#[derive(clap::Args)]
pub struct BackupArgs {
    /// Which game to snapshot (MSC or MWC)
    pub target: TargetId,

    /// Destination folder (defaults to the configured folder)
    #[arg(long)]
    pub dest: Option<PathBuf>,

    /// Label used as the archive filename prefix
    #[arg(long)]
    pub label: Option<String>,
}
