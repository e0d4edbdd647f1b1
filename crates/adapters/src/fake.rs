// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake process listing for tests

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use becupe_core::ProcessSnapshot;

use crate::process::{ProcessList, ProcessQueryError};

/// Scripted process list with shared interior state.
///
/// Clones share the same underlying set, so a test can hold one handle
/// while the watcher owns another.
#[derive(Clone, Default)]
pub struct FakeProcessList {
    inner: Arc<Mutex<FakeState>>,
}

#[derive(Default)]
struct FakeState {
    names: BTreeSet<String>,
    fail_next: bool,
    snapshots_taken: usize,
}

impl FakeProcessList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a process as running
    pub fn start(&self, name: &str) {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.names.insert(name.to_string());
    }

    /// Mark a process as exited
    pub fn stop(&self, name: &str) {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.names.remove(name);
    }

    /// Make the next snapshot fail with a `ProcessQueryError`
    pub fn fail_next(&self) {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.fail_next = true;
    }

    /// Number of snapshots taken so far
    pub fn snapshots_taken(&self) -> usize {
        let state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.snapshots_taken
    }
}

impl ProcessList for FakeProcessList {
    fn snapshot(&mut self) -> Result<ProcessSnapshot, ProcessQueryError> {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.snapshots_taken += 1;

        if state.fail_next {
            state.fail_next = false;
            return Err(ProcessQueryError("injected failure".to_string()));
        }

        Ok(state.names.iter().collect())
    }
}
