// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only audit journal
//!
//! One line per entry: `[YYYY-MM-DD HH:MM:SS] [KIND] message`. This file is
//! the user-facing history of what the engine did; `tracing` output is for
//! operators and lives elsewhere. Never rotated or size-capped.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use becupe_core::Clock;
use thiserror::Error;
use tracing::warn;

/// Category tag for a journal line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Info,
    Error,
    Config,
    Backup,
    Restore,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            EntryKind::Info => "INFO",
            EntryKind::Error => "ERROR",
            EntryKind::Config => "CONFIG",
            EntryKind::Backup => "BACKUP",
            EntryKind::Restore => "RESTORE",
        };
        f.write_str(tag)
    }
}

/// Errors reading or clearing the journal
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Append-only journal over a single text file.
///
/// `record` is best-effort: a journal write failure must never take down
/// the operation being journaled, so it logs via `tracing` and swallows.
#[derive(Clone)]
pub struct Journal<C: Clock> {
    path: PathBuf,
    clock: C,
}

impl<C: Clock> Journal<C> {
    pub fn new(path: PathBuf, clock: C) -> Self {
        Self { path, clock }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Append one entry, flushed immediately
    pub fn record(&self, kind: EntryKind, message: &str) {
        if let Err(e) = self.append(kind, message) {
            warn!(error = %e, path = %self.path.display(), "journal write failed");
        }
    }

    fn append(&self, kind: EntryKind, message: &str) -> Result<(), io::Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let stamp = self.clock.now().format("%Y-%m-%d %H:%M:%S");
        writeln!(file, "[{}] [{}] {}", stamp, kind, message)?;
        file.flush()
    }

    /// Whole journal contents, oldest first; empty string when absent
    pub fn read_all(&self) -> Result<String, JournalError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the whole journal file
    pub fn clear(&self) -> Result<(), JournalError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
