//! Daemon lifecycle specs
//!
//! Verify daemon start/stop/status lifecycle and the files it leaves
//! in the state directory.

use crate::prelude::*;

#[test]
fn daemon_status_reports_not_running() {
    let env = Env::new();

    env.becupe()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Daemon not running");
}

#[test]
fn daemon_start_reports_success() {
    let env = Env::new();

    env.becupe()
        .args(&["daemon", "start"])
        .passes()
        .stdout_has("Daemon started");
}

#[test]
fn daemon_start_twice_reports_already_running() {
    let env = Env::new();
    env.becupe().args(&["daemon", "start"]).passes();

    env.becupe()
        .args(&["daemon", "start"])
        .passes()
        .stdout_has("Daemon already running");
}

#[test]
fn daemon_status_shows_running_after_start() {
    let env = Env::new();
    env.becupe().args(&["daemon", "start"]).passes();

    env.becupe()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Daemon running");
}

#[test]
fn daemon_stop_reports_success() {
    let env = Env::new();
    env.becupe().args(&["daemon", "start"]).passes();

    env.becupe()
        .args(&["daemon", "stop"])
        .passes()
        .stdout_has("Daemon stopped");
}

#[test]
fn daemon_status_reports_not_running_after_stop() {
    let env = Env::new();
    env.becupe().args(&["daemon", "start"]).passes();
    env.becupe().args(&["daemon", "stop"]).passes();

    env.becupe()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Daemon not running");
}

#[test]
fn daemon_restart_reports_success() {
    let env = Env::new();
    env.becupe().args(&["daemon", "start"]).passes();

    env.becupe()
        .args(&["daemon", "restart"])
        .passes()
        .stdout_has("Daemon restarted");
}

#[test]
fn daemon_creates_pid_and_version_files() {
    let env = Env::new();
    env.becupe().args(&["daemon", "start"]).passes();

    let pid_path = env.state_path().join("daemon.pid");
    let version_path = env.state_path().join("daemon.version");

    assert!(wait_for(SPEC_WAIT_MAX_MS, || pid_path.exists()));
    assert!(wait_for(SPEC_WAIT_MAX_MS, || version_path.exists()));
}

#[test]
fn daemon_creates_socket_file() {
    let env = Env::new();
    env.becupe().args(&["daemon", "start"]).passes();

    let socket_dir = env.socket_path();
    let has_socket = wait_for(SPEC_WAIT_MAX_MS, || {
        std::fs::read_dir(&socket_dir)
            .ok()
            .map(|entries| {
                entries.filter_map(|e| e.ok()).any(|entry| {
                    entry
                        .path()
                        .extension()
                        .map(|ext| ext == "sock")
                        .unwrap_or(false)
                })
            })
            .unwrap_or(false)
    });

    assert!(has_socket, "daemon socket file should exist");
}

#[test]
fn daemon_stop_removes_socket_and_pid() {
    let env = Env::new();
    env.becupe().args(&["daemon", "start"]).passes();
    env.becupe().args(&["daemon", "stop"]).passes();

    let pid_path = env.state_path().join("daemon.pid");
    assert!(wait_for(SPEC_WAIT_MAX_MS, || !pid_path.exists()));
}

#[test]
fn status_command_autostarts_daemon() {
    let env = Env::new();

    env.becupe()
        .args(&["status"])
        .passes()
        .stdout_has("Status: running");

    env.becupe()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Daemon running");
}

#[test]
fn status_shows_targets_and_uptime() {
    let env = Env::new();

    env.becupe()
        .args(&["status"])
        .passes()
        .stdout_has("Uptime:")
        .stdout_has("Version:")
        .stdout_has("MSC:")
        .stdout_has("MWC:")
        .stdout_has("not running");
}

#[test]
fn status_flags_missing_save_dir() {
    let env = Env::new();
    std::fs::remove_dir_all(env.save_dir("My Winter Car")).unwrap();

    env.becupe()
        .args(&["status"])
        .passes()
        .stdout_has("(missing)");
}
