// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine runtime

use becupe_core::TargetId;
use becupe_storage::{PersistenceError, StorageError};
use thiserror::Error;

/// Errors that can occur in the runtime
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("settings write failed: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("unknown target: {0}")]
    UnknownTarget(TargetId),
    #[error("no destination folder configured")]
    NoDestination,
    #[error("cannot resume automation without a destination folder")]
    UnpauseWithoutFolder,
    #[error("archive task failed: {0}")]
    TaskJoin(String),
}
