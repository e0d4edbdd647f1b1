// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Automation rule command

use becupe_core::{Edge, TargetId};

use super::Toggle;

#[derive(clap::Args)]
pub struct RuleArgs {
    /// Which game the rule applies to (MSC or MWC)
    pub target: TargetId,

    /// Which transition triggers the backup (open or close)
    pub edge: Edge,

    /// Enable or disable the rule
    pub state: Toggle,
}
