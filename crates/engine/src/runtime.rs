// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime for the backup/restore engine
//!
//! Owns the stores and executes every operation that touches a target's
//! save directory. Archive work is blocking (filesystem + compression)
//! and runs under `spawn_blocking`; a per-target async mutex is held for
//! the whole of any directory-touching operation, so a restore can never
//! interleave with an in-flight backup for the same target.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use becupe_core::rules::{backup_prefix, day_folder, should_backup};
use becupe_core::{Clock, PresenceEvent, Settings, Target, TargetId};
use becupe_storage::{ArchiveOutcome, ArchiveStore, EntryKind, Journal, SettingsStore};
use tokio::sync::Mutex;
use tracing::info;

use crate::error::RuntimeError;

/// Outcome of a restore, including the protective-backup step.
///
/// A protective failure does not abort the restore, but it must be
/// surfaced, so the report carries it alongside the success.
#[derive(Debug)]
pub struct RestoreReport {
    /// `None` when no protective backup was requested
    pub protective: Option<Result<PathBuf, String>>,
}

/// Coordinates stores and settings for backups and restores.
pub struct Runtime<C: Clock + 'static> {
    targets: Vec<Target>,
    archive: ArchiveStore<C>,
    settings: SettingsStore<C>,
    journal: Journal<C>,
    clock: C,
    locks: HashMap<TargetId, Arc<Mutex<()>>>,
}

impl<C: Clock + 'static> Runtime<C> {
    pub fn new(
        targets: Vec<Target>,
        archive: ArchiveStore<C>,
        settings: SettingsStore<C>,
        journal: Journal<C>,
        clock: C,
    ) -> Self {
        let locks = targets
            .iter()
            .map(|t| (t.id, Arc::new(Mutex::new(()))))
            .collect();
        Self {
            targets,
            archive,
            settings,
            journal,
            clock,
            locks,
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn target(&self, id: TargetId) -> Result<&Target, RuntimeError> {
        self.targets
            .iter()
            .find(|t| t.id == id)
            .ok_or(RuntimeError::UnknownTarget(id))
    }

    /// Current persisted settings (read through, never cached)
    pub fn settings(&self) -> Settings {
        self.settings.load()
    }

    fn target_lock(&self, id: TargetId) -> Arc<Mutex<()>> {
        self.locks
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Arc::new(Mutex::new(())))
    }

    /// Run the blocking archive creation off the event loop
    async fn create_blocking(
        &self,
        source: PathBuf,
        dest: PathBuf,
        prefix: String,
    ) -> Result<ArchiveOutcome, RuntimeError> {
        let store = self.archive.clone();
        tokio::task::spawn_blocking(move || store.create(&source, &dest, &prefix))
            .await
            .map_err(|e| RuntimeError::TaskJoin(e.to_string()))?
            .map_err(RuntimeError::from)
    }

    async fn extract_blocking(
        &self,
        archive_path: PathBuf,
        target_dir: PathBuf,
    ) -> Result<(), RuntimeError> {
        let store = self.archive.clone();
        tokio::task::spawn_blocking(move || store.extract(&archive_path, &target_dir))
            .await
            .map_err(|e| RuntimeError::TaskJoin(e.to_string()))?
            .map_err(RuntimeError::from)
    }

    /// Date-partitioned destination under the configured folder
    fn partitioned_dest(&self, folder: &Path) -> PathBuf {
        folder.join(day_folder(&self.clock.now()))
    }

    /// React to a presence transition.
    ///
    /// Returns `Ok(None)` when pause state, a missing folder, or the
    /// per-edge rule vetoes the backup.
    pub async fn handle_event(
        &self,
        event: &PresenceEvent,
    ) -> Result<Option<ArchiveOutcome>, RuntimeError> {
        let settings = self.settings.load();
        let target_id = event.target();
        let edge = event.edge();

        if !should_backup(&settings, target_id, edge) {
            return Ok(None);
        }
        // should_backup already requires the folder to be set
        let Some(folder) = settings.folder else {
            return Ok(None);
        };

        info!(event = event.name(), target = %target_id, "rule-triggered backup");

        let target = self.target(target_id)?;
        let dest = self.partitioned_dest(&folder);
        let prefix = backup_prefix(target_id, edge);

        let lock = self.target_lock(target_id);
        let _guard = lock.lock().await;
        let outcome = self
            .create_blocking(target.save_dir.clone(), dest, prefix)
            .await?;
        Ok(Some(outcome))
    }

    /// User-initiated backup, outside the rule engine.
    ///
    /// `dest` defaults to the configured folder; `label` overrides the
    /// target symbol as the archive prefix. Manual backups land directly
    /// in the destination, not in a date partition.
    pub async fn backup_now(
        &self,
        target_id: TargetId,
        dest: Option<PathBuf>,
        label: Option<String>,
    ) -> Result<ArchiveOutcome, RuntimeError> {
        let dest = match dest {
            Some(dest) => dest,
            None => self
                .settings
                .load()
                .folder
                .ok_or(RuntimeError::NoDestination)?,
        };
        let prefix = match label {
            Some(label) => sanitize_label(&label, target_id),
            None => target_id.symbol().to_string(),
        };

        let target = self.target(target_id)?;
        let lock = self.target_lock(target_id);
        let _guard = lock.lock().await;
        self.create_blocking(target.save_dir.clone(), dest, prefix)
            .await
    }

    /// Daily scheduled pass over every target whose save directory exists.
    ///
    /// Invoked by the scheduler directly: pause state and per-edge rules
    /// do not apply, but the configured folder is still required.
    pub async fn scheduled_pass(&self) -> Vec<(TargetId, Result<ArchiveOutcome, RuntimeError>)> {
        let Some(folder) = self.settings.load().folder else {
            self.journal.record(
                EntryKind::Info,
                "scheduled backup skipped: no destination folder configured",
            );
            return Vec::new();
        };

        let mut results = Vec::new();
        for target in &self.targets {
            if !target.save_dir.is_dir() {
                continue;
            }
            let dest = self.partitioned_dest(&folder);
            let prefix = format!("{}_SCHEDULED", target.id.symbol());

            let lock = self.target_lock(target.id);
            let _guard = lock.lock().await;
            let result = self
                .create_blocking(target.save_dir.clone(), dest, prefix)
                .await;
            results.push((target.id, result));
        }
        results
    }

    /// Destructively restore an archive over the target's save directory.
    ///
    /// Ignores pause state and rules entirely; confirmation happens at the
    /// caller. The protective backup and the extraction run inside one
    /// critical section, so no automatic backup can fire in between.
    pub async fn restore(
        &self,
        archive_path: PathBuf,
        target_id: TargetId,
        protect_dest: Option<PathBuf>,
    ) -> Result<RestoreReport, RuntimeError> {
        let target = self.target(target_id)?;
        let save_dir = target.save_dir.clone();

        let lock = self.target_lock(target_id);
        let _guard = lock.lock().await;

        let protective = match protect_dest {
            Some(dest) => {
                let prefix = format!("{}_PRE_RESTORE", target_id.symbol());
                // Failure here is surfaced but does not abort the restore
                // the user explicitly confirmed
                match self.create_blocking(save_dir.clone(), dest, prefix).await {
                    Ok(outcome) => Some(Ok(outcome.path().to_path_buf())),
                    Err(e) => Some(Err(e.to_string())),
                }
            }
            None => None,
        };

        self.extract_blocking(archive_path, save_dir).await?;

        Ok(RestoreReport { protective })
    }

    /// Toggle the global pause flag.
    ///
    /// Unpausing without a destination folder is refused, so automation
    /// can never silently no-op its way through transitions.
    pub fn set_paused(&self, paused: bool) -> Result<(), RuntimeError> {
        let mut settings = self.settings.load();
        if !paused && settings.folder.is_none() {
            return Err(RuntimeError::UnpauseWithoutFolder);
        }
        settings.paused = paused;
        self.settings.save(&settings)?;
        self.journal.record(
            EntryKind::Config,
            if paused {
                "automation paused"
            } else {
                "automation resumed"
            },
        );
        Ok(())
    }

    pub fn set_rule(
        &self,
        target_id: TargetId,
        edge: becupe_core::Edge,
        enabled: bool,
    ) -> Result<(), RuntimeError> {
        let mut settings = self.settings.load();
        settings.set_rule(target_id, edge, enabled);
        self.settings.save(&settings)?;
        self.journal.record(
            EntryKind::Config,
            &format!(
                "rule {}_{} {}",
                target_id.key_fragment(),
                edge.key_fragment(),
                if enabled { "enabled" } else { "disabled" }
            ),
        );
        Ok(())
    }

    pub fn set_folder(&self, folder: PathBuf) -> Result<(), RuntimeError> {
        let mut settings = self.settings.load();
        settings.folder = Some(folder.clone());
        self.settings.save(&settings)?;
        self.journal.record(
            EntryKind::Config,
            &format!("destination folder set: {}", folder.display()),
        );
        Ok(())
    }

    pub fn set_startup_enabled(&self, enabled: bool) -> Result<(), RuntimeError> {
        let mut settings = self.settings.load();
        settings.startup_enabled = enabled;
        self.settings.save(&settings)?;
        self.journal.record(
            EntryKind::Config,
            if enabled {
                "startup registration enabled"
            } else {
                "startup registration disabled"
            },
        );
        Ok(())
    }

    pub fn accept_terms(&self) -> Result<(), RuntimeError> {
        let mut settings = self.settings.load();
        settings.terms_accepted = true;
        self.settings.save(&settings)?;
        self.journal.record(EntryKind::Config, "disclaimer accepted");
        Ok(())
    }
}

/// Keep user-chosen labels inside the filename contract
fn sanitize_label(label: &str, fallback: TargetId) -> String {
    let cleaned: String = label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        fallback.symbol().to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
