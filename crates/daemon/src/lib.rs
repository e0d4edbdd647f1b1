// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! becupe-daemon: daemon lifecycle, IPC protocol, and connection handling
//!
//! The binary lives in `main.rs`; this library surface exists so the CLI
//! client can share the protocol types and the path/startup-marker
//! conventions.

pub mod lifecycle;
pub mod protocol;
pub mod server;

pub use lifecycle::{LifecycleError, Paths};
pub use protocol::{
    Query, Request, Response, RestoreOutcome, StatusReport, TargetStatus, PROTOCOL_VERSION,
};

/// Startup marker prefix written to the log before anything else.
/// The CLI uses this to find where the current startup attempt begins.
/// Full format: `--- becuped: starting (pid: 12345)`
pub const STARTUP_MARKER_PREFIX: &str = "--- becuped: starting (pid: ";
