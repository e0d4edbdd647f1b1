// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use tempfile::TempDir;

/// A `becupe` command that cannot reach (or start) any daemon: state and
/// socket dirs point into a throwaway tempdir and the daemon binary is a
/// path that does not exist.
pub fn becupe_detached(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("becupe").expect("becupe binary");
    cmd.env("BECUPE_STATE_DIR", temp.path().join("state"))
        .env("BECUPE_SOCKET_DIR", temp.path().join("sockets"))
        .env("BECUPE_SAVE_ROOT", temp.path().join("saves"))
        .env("BECUPE_DAEMON_BINARY", temp.path().join("missing/becuped"))
        .env("BECUPE_TIMEOUT_CONNECT_MS", "500")
        .env("HOME", temp.path());
    cmd
}
