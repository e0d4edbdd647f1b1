// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daily schedule command

use becupe_core::ScheduleTime;

#[derive(clap::Args)]
pub struct ScheduleArgs {
    #[command(subcommand)]
    pub command: ScheduleCommand,
}

#[derive(clap::Subcommand)]
pub enum ScheduleCommand {
    /// Arm the daily backup at a wall-clock time (HH:MM)
    Set { time: ScheduleTime },
    /// Disarm the daily backup
    Clear,
    /// Show the current schedule
    Show,
}
