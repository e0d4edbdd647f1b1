// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable settings persistence
//!
//! Reads never fail: a missing or unreadable `config.json` degrades to
//! defaults. Writes surface errors, because losing an explicit setting
//! change is user-visible data loss.

use std::io;
use std::path::PathBuf;

use becupe_core::{Clock, Settings};
use thiserror::Error;
use tracing::debug;

use crate::journal::{EntryKind, Journal};

/// Errors writing the settings file
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load/save of the persisted automation settings.
///
/// Every mutation in the runtime is load → mutate → save; nothing caches
/// the settings in memory between operations.
#[derive(Clone)]
pub struct SettingsStore<C: Clock> {
    path: PathBuf,
    journal: Journal<C>,
}

impl<C: Clock> SettingsStore<C> {
    pub fn new(path: PathBuf, journal: Journal<C>) -> Self {
        Self { path, journal }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load settings, degrading to defaults when the file is missing or
    /// unreadable. Never fails.
    pub fn load(&self) -> Settings {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file, using defaults");
                self.journal
                    .record(EntryKind::Config, "no saved settings, starting from defaults");
                return Settings::default();
            }
            Err(e) => {
                self.journal.record(
                    EntryKind::Error,
                    &format!("settings unreadable, using defaults: {}", e),
                );
                return Settings::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                self.journal.record(
                    EntryKind::Error,
                    &format!("settings corrupt, using defaults: {}", e),
                );
                Settings::default()
            }
        }
    }

    /// Persist settings synchronously
    pub fn save(&self, settings: &Settings) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "settings_store_tests.rs"]
mod tests;
