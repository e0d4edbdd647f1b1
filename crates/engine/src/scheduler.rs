// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daily schedule tracking
//!
//! The daemon polls this once a minute. Matching is exact-minute against
//! the configured wall-clock time, so if the process is down at that
//! minute the day's pass is skipped entirely; there is no catch-up. That
//! is the documented contract, not a bug.

use becupe_core::ScheduleTime;
use chrono::{DateTime, Datelike, Local};

/// Holds the optional daily backup time and the once-per-minute guard.
#[derive(Debug, Default)]
pub struct DailySchedule {
    time: Option<ScheduleTime>,
    last_fired: Option<(i32, u32, u32, ScheduleTime)>,
}

impl DailySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(&self) -> Option<ScheduleTime> {
        self.time
    }

    /// Set or clear the daily time; `None` makes the schedule inert
    pub fn set_time(&mut self, time: Option<ScheduleTime>) {
        self.time = time;
        self.last_fired = None;
    }

    /// True when the pass should fire at `now`.
    ///
    /// At most once per matching minute, even if the caller polls faster
    /// than the nominal 60s cadence.
    pub fn due(&mut self, now: &DateTime<Local>) -> bool {
        let Some(time) = self.time else {
            return false;
        };
        if !time.matches(now) {
            return false;
        }

        let stamp = (now.year(), now.month(), now.day(), time);
        if self.last_fired == Some(stamp) {
            return false;
        }
        self.last_fired = Some(stamp);
        true
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
