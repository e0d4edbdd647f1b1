// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! becupe-storage: the durable side of the engine
//!
//! Archive store (ZIP snapshots committed by rename to `.becupe`),
//! settings store (`config.json` load/save), and the append-only audit
//! journal.

pub mod archive;
pub mod journal;
pub mod settings_store;

pub use archive::{ArchiveOutcome, ArchiveStore, StorageError, FINAL_EXTENSION};
pub use journal::{EntryKind, Journal, JournalError};
pub use settings_store::{PersistenceError, SettingsStore};
