// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terms acceptance command

#[derive(clap::Args)]
pub struct TermsArgs {
    #[command(subcommand)]
    pub command: TermsCommand,
}

#[derive(clap::Subcommand)]
pub enum TermsCommand {
    /// Record that the terms have been read and accepted
    Accept,
}
