// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daily schedule time

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, Timelike};

/// A wall-clock time of day for the daily backup pass.
///
/// Matching is exact-minute: the pass fires only during the configured
/// minute, so a process that is down at that minute skips the whole day.
/// There is no catch-up; that is the documented contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleTime {
    hour: u8,
    minute: u8,
}

/// Error building or parsing a schedule time
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleTimeError {
    #[error("invalid schedule time: {0} (expected HH:MM)")]
    Format(String),
    #[error("schedule time out of range: {hour:02}:{minute:02}")]
    Range { hour: u32, minute: u32 },
}

impl ScheduleTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self, ScheduleTimeError> {
        if hour > 23 || minute > 59 {
            return Err(ScheduleTimeError::Range { hour, minute });
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.hour)
    }

    pub fn minute(&self) -> u32 {
        u32::from(self.minute)
    }

    /// True when `now` falls inside the configured minute
    pub fn matches(&self, now: &DateTime<Local>) -> bool {
        now.hour() == self.hour() && now.minute() == self.minute()
    }
}

impl fmt::Display for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ScheduleTime {
    type Err = ScheduleTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| ScheduleTimeError::Format(s.to_string()))?;
        let hour: u32 = h
            .parse()
            .map_err(|_| ScheduleTimeError::Format(s.to_string()))?;
        let minute: u32 = m
            .parse()
            .map_err(|_| ScheduleTimeError::Format(s.to_string()))?;
        Self::new(hour, minute)
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
