// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! becupe-core: domain model for the save backup/restore engine
//!
//! This crate provides:
//! - Monitored targets, presence edges, and presence events
//! - The pure edge-triggered presence state machine
//! - Automation rule decisions (pause / folder / per-edge flags)
//! - The persisted settings model with its exact on-disk keys
//! - Daily schedule time matching
//! - A wall-clock abstraction with a controllable fake for tests

pub mod clock;
pub mod event;
pub mod presence;
pub mod rules;
pub mod schedule;
pub mod settings;
pub mod snapshot;
pub mod target;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use event::PresenceEvent;
pub use presence::PresenceTracker;
pub use schedule::{ScheduleTime, ScheduleTimeError};
pub use settings::Settings;
pub use snapshot::ProcessSnapshot;
pub use target::{builtin_targets, Edge, Target, TargetId};
