// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod backup;
pub mod config;
pub mod daemon;
pub mod log;
pub mod restore;
pub mod rule;
pub mod schedule;
pub mod startup;
pub mod terms;

/// On/off switch argument shared by `rule` and `startup`
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        matches!(self, Toggle::On)
    }
}
