// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: paths, startup, shutdown.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use becupe_adapters::SystemProcessList;
use becupe_core::{builtin_targets, SystemClock};
use becupe_engine::{DailySchedule, Runtime, Watcher};
use becupe_storage::{ArchiveStore, EntryKind, Journal, SettingsStore};
use fs2::FileExt;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};

/// Every filesystem location the daemon touches, resolved once at startup
/// and passed down explicitly; there are no ambient path globals.
#[derive(Debug, Clone)]
pub struct Paths {
    /// State directory holding config, journal, log, pid, lock
    pub state_dir: PathBuf,
    /// Unix socket path (short, under /tmp by default)
    pub socket_path: PathBuf,
    /// Root under which the per-game save directories live
    pub save_root: PathBuf,
    pub config_path: PathBuf,
    pub journal_path: PathBuf,
    pub log_path: PathBuf,
    pub pid_path: PathBuf,
    pub version_path: PathBuf,
    pub lock_path: PathBuf,
}

impl Paths {
    /// Resolve all paths from the environment.
    ///
    /// State dir: `BECUPE_STATE_DIR`, else `$XDG_STATE_HOME/becupe`, else
    /// `$HOME/.local/state/becupe`. Socket dir: `BECUPE_SOCKET_DIR`, else
    /// `/tmp/becupe`; the socket filename hashes the state dir, which
    /// keeps the path short (SUN_LEN) and isolates parallel test
    /// environments. Save root: `BECUPE_SAVE_ROOT`, else the per-user
    /// LocalLow layout under `$HOME`.
    pub fn resolve() -> Result<Self, LifecycleError> {
        let state_dir = state_dir()?;
        let socket_dir = socket_dir();
        let socket_path = socket_dir.join(format!("{}.sock", state_hash(&state_dir)));
        let save_root = save_root()?;

        Ok(Self {
            config_path: state_dir.join("config.json"),
            journal_path: state_dir.join("journal.txt"),
            log_path: state_dir.join("daemon.log"),
            pid_path: state_dir.join("daemon.pid"),
            version_path: state_dir.join("daemon.version"),
            lock_path: state_dir.join("daemon.lock"),
            state_dir,
            socket_path,
            save_root,
        })
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Daemon state during operation
pub struct DaemonState {
    pub paths: Paths,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// Unix socket listener
    pub listener: UnixListener,
    /// Backup/restore runtime, shared with background archive jobs
    pub runtime: Arc<Runtime<SystemClock>>,
    /// Presence watcher over the live process table
    pub watcher: Watcher<SystemProcessList>,
    /// Daily backup schedule (daemon memory only, not persisted)
    pub schedule: DailySchedule,
    /// Audit journal handle for daemon-level entries
    pub journal: Journal<SystemClock>,
    /// When daemon started
    pub start_time: Instant,
    /// Shutdown requested flag
    pub shutdown_requested: bool,
}

impl DaemonState {
    /// Shutdown the daemon gracefully
    pub fn shutdown(&mut self) {
        info!("Shutting down daemon...");
        self.journal.record(EntryKind::Info, "daemon stopped");

        for path in [
            &self.paths.socket_path,
            &self.paths.pid_path,
            &self.paths.version_path,
        ] {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(path) {
                    warn!("Failed to remove {}: {}", path.display(), e);
                }
            }
        }

        // Lock file is released when self.lock_file is dropped
        info!("Daemon shutdown complete");
    }
}

/// Start the daemon
pub async fn startup(paths: &Paths, verify_archives: bool) -> Result<DaemonState, LifecycleError> {
    match startup_inner(paths, verify_archives).await {
        Ok(state) => Ok(state),
        Err(e) => {
            cleanup_on_failure(paths);
            Err(e)
        }
    }
}

/// Inner startup logic - cleanup_on_failure called if this fails
async fn startup_inner(
    paths: &Paths,
    verify_archives: bool,
) -> Result<DaemonState, LifecycleError> {
    // 1. Create state and socket directories
    std::fs::create_dir_all(&paths.state_dir)?;
    if let Some(parent) = paths.socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // 2. Acquire the instance lock FIRST - prevents races. Failure is an
    // ordinary error value, not an exceptional path.
    let lock_file = File::create(&paths.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    // 3. Write pid and version files
    std::fs::write(&paths.pid_path, format!("{}\n", std::process::id()))?;
    std::fs::write(&paths.version_path, env!("CARGO_PKG_VERSION"))?;

    // 4. Build the stores and runtime
    let clock = SystemClock;
    let journal = Journal::new(paths.journal_path.clone(), clock.clone());
    let archive = ArchiveStore::new(clock.clone(), journal.clone()).with_verification(verify_archives);
    let settings = SettingsStore::new(paths.config_path.clone(), journal.clone());
    let targets = builtin_targets(&paths.save_root);
    let runtime = Runtime::new(
        targets.clone(),
        archive,
        settings,
        journal.clone(),
        clock.clone(),
    );
    let watcher = Watcher::new(SystemProcessList::new(), targets);

    journal.record(EntryKind::Info, "daemon started");

    // 5. Remove stale socket and bind (LAST - only after all validation)
    if paths.socket_path.exists() {
        std::fs::remove_file(&paths.socket_path)?;
    }
    let listener = UnixListener::bind(&paths.socket_path)
        .map_err(|e| LifecycleError::BindFailed(paths.socket_path.clone(), e))?;

    info!(state_dir = %paths.state_dir.display(), "Daemon started");

    Ok(DaemonState {
        paths: paths.clone(),
        lock_file,
        listener,
        runtime: Arc::new(runtime),
        watcher,
        schedule: DailySchedule::new(),
        journal,
        start_time: Instant::now(),
        shutdown_requested: false,
    })
}

/// Clean up resources on startup failure
fn cleanup_on_failure(paths: &Paths) {
    for path in [&paths.socket_path, &paths.version_path, &paths.pid_path] {
        if path.exists() {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Get the state directory for becupe
fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("BECUPE_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("becupe"));
    }

    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/becupe"))
}

/// Get the socket directory for becupe
///
/// Uses /tmp/becupe by default to keep paths short (macOS SUN_LEN = 104).
/// Can be overridden with BECUPE_SOCKET_DIR for testing.
fn socket_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BECUPE_SOCKET_DIR") {
        return PathBuf::from(dir);
    }
    PathBuf::from("/tmp/becupe")
}

/// Root under which the two games keep their save directories
fn save_root() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("BECUPE_SAVE_ROOT") {
        return Ok(PathBuf::from(dir));
    }

    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join("AppData").join("LocalLow"))
}

/// Short hash of the state dir for the socket filename
fn state_hash(path: &std::path::Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    let result = hasher.finalize();
    // First 16 hex chars are plenty for isolation
    result[..8].iter().map(|b| format!("{:02x}", b)).collect()
}
