//! Configuration flow specs
//!
//! Folder, pause/resume, rules, terms, startup, and persistence across
//! daemon restarts.

use crate::prelude::*;

#[test]
fn config_show_prints_defaults_as_json() {
    let env = Env::new();

    let out = env.becupe().args(&["config", "show"]).passes();
    let parsed: serde_json::Value = serde_json::from_str(&out.stdout).expect("valid JSON");

    assert_eq!(parsed["paused"], serde_json::json!(true));
    assert_eq!(parsed["msc_open"], serde_json::json!(false));
    assert_eq!(parsed["termos_lidos_e_aceitos"], serde_json::json!(false));
}

#[test]
fn folder_set_is_reflected_in_config() {
    let env = Env::new();
    let dest = env.dest();

    env.becupe()
        .args(&["folder", dest.to_str().unwrap()])
        .passes()
        .stdout_has("Folder set:");

    let out = env.becupe().args(&["config", "show"]).passes();
    let parsed: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
    assert_eq!(
        parsed["folder"],
        serde_json::json!(dest.to_str().unwrap())
    );
}

#[test]
fn resume_without_folder_is_refused() {
    let env = Env::new();

    env.becupe()
        .args(&["resume"])
        .fails()
        .stderr_has("without a destination folder");
}

#[test]
fn resume_works_once_folder_is_set() {
    let env = Env::new();
    let dest = env.dest();

    env.becupe()
        .args(&["folder", dest.to_str().unwrap()])
        .passes();
    env.becupe()
        .args(&["resume"])
        .passes()
        .stdout_has("Automation resumed");

    let out = env.becupe().args(&["config", "show"]).passes();
    let parsed: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
    assert_eq!(parsed["paused"], serde_json::json!(false));
}

#[test]
fn pause_always_succeeds() {
    let env = Env::new();

    env.becupe()
        .args(&["pause"])
        .passes()
        .stdout_has("Automation paused");
}

#[test]
fn rule_toggles_are_persisted() {
    let env = Env::new();

    env.becupe()
        .args(&["rule", "msc", "close", "on"])
        .passes()
        .stdout_has("Rule msc_close enabled");
    env.becupe()
        .args(&["rule", "mwc", "open", "on"])
        .passes();
    env.becupe()
        .args(&["rule", "mwc", "open", "off"])
        .passes()
        .stdout_has("Rule mwc_open disabled");

    let out = env.becupe().args(&["config", "show"]).passes();
    let parsed: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
    assert_eq!(parsed["msc_close"], serde_json::json!(true));
    assert_eq!(parsed["mwc_open"], serde_json::json!(false));
}

#[test]
fn rule_rejects_unknown_target() {
    let env = Env::new();

    env.becupe()
        .args(&["rule", "gta", "open", "on"])
        .fails()
        .stderr_has("unknown target");
}

#[test]
fn terms_accept_is_persisted() {
    let env = Env::new();

    env.becupe()
        .args(&["terms", "accept"])
        .passes()
        .stdout_has("Terms accepted");

    let out = env.becupe().args(&["config", "show"]).passes();
    let parsed: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
    assert_eq!(parsed["termos_lidos_e_aceitos"], serde_json::json!(true));
}

#[test]
fn startup_toggle_is_persisted() {
    let env = Env::new();

    env.becupe()
        .args(&["startup", "on"])
        .passes()
        .stdout_has("Launch at login enabled");

    let out = env.becupe().args(&["config", "show"]).passes();
    let parsed: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
    assert_eq!(parsed["startup_enabled"], serde_json::json!(true));
}

#[test]
fn config_survives_daemon_restart() {
    let env = Env::new();
    let dest = env.dest();

    env.becupe()
        .args(&["folder", dest.to_str().unwrap()])
        .passes();
    env.becupe().args(&["rule", "msc", "open", "on"]).passes();
    env.becupe().args(&["daemon", "restart"]).passes();

    let out = env.becupe().args(&["config", "show"]).passes();
    let parsed: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
    assert_eq!(parsed["msc_open"], serde_json::json!(true));
    assert_eq!(
        parsed["folder"],
        serde_json::json!(dest.to_str().unwrap())
    );
}

#[test]
fn unknown_config_keys_survive_a_write() {
    let env = Env::new();
    env.file(
        "state/config.json",
        r#"{"paused": true, "future_knob": 7}"#,
    );

    env.becupe().args(&["terms", "accept"]).passes();
    env.becupe().args(&["daemon", "stop"]).passes();

    let raw = std::fs::read_to_string(env.state_path().join("config.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["future_knob"], serde_json::json!(7));
    assert_eq!(parsed["termos_lidos_e_aceitos"], serde_json::json!(true));
}
