//! Daily schedule specs
//!
//! The schedule lives in daemon memory: set/show/clear, and it is gone
//! after a daemon restart.

use crate::prelude::*;

#[test]
fn schedule_show_reports_none_by_default() {
    let env = Env::new();

    env.becupe()
        .args(&["schedule", "show"])
        .passes()
        .stdout_has("Schedule: (none)");
}

#[test]
fn schedule_set_is_reflected_in_show() {
    let env = Env::new();

    env.becupe()
        .args(&["schedule", "set", "03:30"])
        .passes()
        .stdout_has("Daily backup scheduled at 03:30");

    env.becupe()
        .args(&["schedule", "show"])
        .passes()
        .stdout_has("Schedule: 03:30");
}

#[test]
fn schedule_clear_disarms() {
    let env = Env::new();
    env.becupe().args(&["schedule", "set", "03:30"]).passes();

    env.becupe()
        .args(&["schedule", "clear"])
        .passes()
        .stdout_has("Daily backup schedule cleared");

    env.becupe()
        .args(&["schedule", "show"])
        .passes()
        .stdout_has("Schedule: (none)");
}

#[test]
fn schedule_rejects_out_of_range_time() {
    let env = Env::new();

    env.becupe()
        .args(&["schedule", "set", "25:00"])
        .fails()
        .stderr_has("out of range");
}

#[test]
fn schedule_rejects_malformed_time() {
    let env = Env::new();

    env.becupe()
        .args(&["schedule", "set", "half past three"])
        .fails()
        .stderr_has("expected HH:MM");
}

#[test]
fn schedule_does_not_survive_daemon_restart() {
    let env = Env::new();
    env.becupe().args(&["schedule", "set", "03:30"]).passes();
    env.becupe().args(&["daemon", "restart"]).passes();

    env.becupe()
        .args(&["schedule", "show"])
        .passes()
        .stdout_has("Schedule: (none)");
}

#[test]
fn schedule_appears_in_status() {
    let env = Env::new();
    env.becupe().args(&["schedule", "set", "12:00"]).passes();

    env.becupe()
        .args(&["status"])
        .passes()
        .stdout_has("Schedule: 12:00");
}
