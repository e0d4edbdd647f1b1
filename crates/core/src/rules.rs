// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Automation rule decisions
//!
//! Pure functions only; the runtime owns settings loading and archive
//! execution.

use chrono::{DateTime, Local};

use crate::settings::Settings;
use crate::target::{Edge, TargetId};

/// Whether a rule-triggered backup should run for a presence transition.
///
/// Pause is a global kill-switch and does not clear the per-edge rules;
/// a missing destination folder also vetoes regardless of rules.
pub fn should_backup(settings: &Settings, target: TargetId, edge: Edge) -> bool {
    !settings.paused && settings.folder.is_some() && settings.rule(target, edge)
}

/// Archive prefix for a rule-triggered backup, e.g. `MSC_OPEN`
pub fn backup_prefix(target: TargetId, edge: Edge) -> String {
    format!("{}_{}", target.symbol(), edge.marker())
}

/// Date-partition subfolder name, e.g. `2026-08-21`
pub fn day_folder(now: &DateTime<Local>) -> String {
    now.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
