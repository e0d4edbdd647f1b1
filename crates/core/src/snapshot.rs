// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-list snapshots

use std::collections::BTreeSet;

/// One instantaneous view of the OS process list, as lowercased image names.
///
/// A single snapshot is captured per poll tick and shared across all
/// targets, so every target is evaluated against the same instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSnapshot {
    names: BTreeSet<String>,
}

impl ProcessSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str) {
        self.names.insert(name.to_ascii_lowercase());
    }

    /// Case-insensitive membership test for a process image name
    pub fn contains(&self, process_name: &str) -> bool {
        self.names.contains(&process_name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ProcessSnapshot {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for name in iter {
            snapshot.insert(name.as_ref());
        }
        snapshot
    }
}
