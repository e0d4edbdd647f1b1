// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling
//!
//! Everything here is wall-clock: archive names, journal lines, and
//! schedule matching all consume local calendar time rather than a
//! monotonic instant.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local};

/// A clock that provides the current local time
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Real system clock
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Fake clock for testing with controllable time
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<DateTime<Local>>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::at(Local::now())
    }

    /// Start the clock at a specific moment
    pub fn at(moment: DateTime<Local>) -> Self {
        Self {
            current: Arc::new(Mutex::new(moment)),
        }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += chrono::Duration::milliseconds(duration.as_millis() as i64);
    }

    /// Set the clock to a specific moment
    pub fn set(&self, moment: DateTime<Local>) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = moment;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Local> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
