// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Poll-tick driver for presence detection
//!
//! One snapshot per tick, shared across all targets. Enumeration failures
//! are transient by contract: the tick is skipped and the held state is
//! untouched, so no spurious close events can come out of a bad poll.

use becupe_adapters::ProcessList;
use becupe_core::{PresenceEvent, PresenceTracker, Target, TargetId};
use tracing::debug;

/// Owns the process-list source and the per-target presence state.
pub struct Watcher<P: ProcessList> {
    process_list: P,
    tracker: PresenceTracker,
    targets: Vec<Target>,
}

impl<P: ProcessList> Watcher<P> {
    pub fn new(process_list: P, targets: Vec<Target>) -> Self {
        Self {
            process_list,
            tracker: PresenceTracker::new(),
            targets,
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn is_running(&self, target: TargetId) -> bool {
        self.tracker.is_running(target)
    }

    /// Run one poll tick, returning the transitions it detected
    pub fn tick(&mut self) -> Vec<PresenceEvent> {
        let snapshot = match self.process_list.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                debug!(error = %e, "process enumeration failed, skipping tick");
                return Vec::new();
            }
        };

        self.tracker.observe(&snapshot, &self.targets)
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
