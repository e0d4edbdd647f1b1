// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! becupe-engine: orchestration around the stores
//!
//! The watcher turns process-list snapshots into presence events, the
//! daily schedule decides when the time-based pass fires, and the runtime
//! executes backups and restores with per-target mutual exclusion.

mod error;
mod runtime;
mod scheduler;
mod watcher;

pub use error::RuntimeError;
pub use runtime::{RestoreReport, Runtime};
pub use scheduler::DailySchedule;
pub use watcher::Watcher;
