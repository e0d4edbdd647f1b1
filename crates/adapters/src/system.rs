// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Real process listing backed by sysinfo

use becupe_core::ProcessSnapshot;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::trace;

use crate::process::{ProcessList, ProcessQueryError};

/// Process listing over the live OS process table.
///
/// Holds one `System` and refreshes it per snapshot; dead processes are
/// dropped on refresh so a stale entry can never mask a close transition.
pub struct SystemProcessList {
    system: System,
}

impl SystemProcessList {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SystemProcessList {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessList for SystemProcessList {
    fn snapshot(&mut self) -> Result<ProcessSnapshot, ProcessQueryError> {
        // Names only; no cpu/memory/exe refresh work
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );

        let mut snapshot = ProcessSnapshot::new();
        for process in self.system.processes().values() {
            // Entries without a UTF-8 image name are dropped, not fatal
            let Some(name) = process.name().to_str() else {
                trace!(pid = process.pid().as_u32(), "skipping unreadable process name");
                continue;
            };
            snapshot.insert(name);
        }

        Ok(snapshot)
    }
}
