// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Edge-triggered presence tracking
//!
//! Pure state machine: callers feed in one process-list snapshot per poll
//! tick and get back the transitions that occurred since the previous tick.

use std::collections::BTreeMap;

use crate::event::PresenceEvent;
use crate::snapshot::ProcessSnapshot;
use crate::target::{Target, TargetId};

/// Per-target running/not-running state across poll ticks.
///
/// Targets start as not-running, so a process already alive at startup
/// emits an `Opened` event on the first tick that sees it.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    states: BTreeMap<TargetId, bool>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self, target: TargetId) -> bool {
        self.states.get(&target).copied().unwrap_or(false)
    }

    /// Compare one snapshot against held state.
    ///
    /// Emits exactly one event per actual transition; steady state emits
    /// nothing. All targets are evaluated against the same snapshot.
    pub fn observe(&mut self, snapshot: &ProcessSnapshot, targets: &[Target]) -> Vec<PresenceEvent> {
        let mut events = Vec::new();

        for target in targets {
            let running_now = snapshot.contains(target.process_name);
            let state = self.states.entry(target.id).or_insert(false);

            if running_now && !*state {
                *state = true;
                events.push(PresenceEvent::Opened { target: target.id });
            } else if !running_now && *state {
                *state = false;
                events.push(PresenceEvent::Closed { target: target.id });
            }
        }

        events
    }
}

#[cfg(test)]
#[path = "presence_tests.rs"]
mod tests;
