// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-listing capability

use becupe_core::ProcessSnapshot;

/// Failure to enumerate the OS process list.
///
/// Transient by nature; the watcher swallows it and skips the tick rather
/// than surfacing it anywhere. Individual unreadable entries never produce
/// this error; implementations drop them from the snapshot instead.
#[derive(Debug, thiserror::Error)]
#[error("process enumeration failed: {0}")]
pub struct ProcessQueryError(pub String);

/// Source of process-list snapshots.
///
/// One snapshot is taken per poll tick and shared across all targets.
pub trait ProcessList: Send {
    fn snapshot(&mut self) -> Result<ProcessSnapshot, ProcessQueryError>;
}
