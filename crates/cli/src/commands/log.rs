// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Audit journal command

#[derive(clap::Args)]
pub struct LogArgs {
    #[command(subcommand)]
    pub command: LogCommand,
}

#[derive(clap::Subcommand)]
pub enum LogCommand {
    /// Print the journal
    Show,
    /// Clear the journal
    Clear,
}
