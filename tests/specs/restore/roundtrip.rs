//! Restore specs
//!
//! `becupe restore` replaces a save directory with an archive's
//! contents, optionally taking a protective backup first.

use std::path::{Path, PathBuf};

use crate::prelude::*;

/// Take a backup of the current MSC save and return the archive path
fn snapshot_msc(env: &Env, dest: &Path) -> PathBuf {
    env.becupe()
        .args(&["backup", "msc", "--dest", dest.to_str().unwrap()])
        .passes();
    std::fs::read_dir(dest)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.extension().map(|e| e == "becupe").unwrap_or(false))
        .expect("archive written")
}

#[test]
fn restore_replaces_save_directory() {
    let env = Env::new();
    let dest = env.dest();
    env.file("saves/Amistech/My Summer Car/save.dat", "original");
    let archive = snapshot_msc(&env, &dest);

    // Mutate the save, then add a file the archive doesn't have
    env.file("saves/Amistech/My Summer Car/save.dat", "corrupted");
    env.file("saves/Amistech/My Summer Car/stale.dat", "stale");

    env.becupe()
        .args(&["restore", archive.to_str().unwrap(), "msc", "--yes"])
        .passes()
        .stdout_has("Restore complete");

    let save = std::fs::read_to_string(env.save_dir("My Summer Car").join("save.dat")).unwrap();
    similar_asserts::assert_eq!(save, "original");
    assert!(
        !env.save_dir("My Summer Car").join("stale.dat").exists(),
        "restore must replace, not merge"
    );
}

#[test]
fn restore_prompts_and_aborts_without_consent() {
    let env = Env::new();
    let dest = env.dest();
    env.file("saves/Amistech/My Summer Car/save.dat", "original");
    let archive = snapshot_msc(&env, &dest);

    env.file("saves/Amistech/My Summer Car/save.dat", "current");

    env.becupe()
        .args(&["restore", archive.to_str().unwrap(), "msc"])
        .stdin("n\n")
        .passes()
        .stdout_has("Aborted");

    // Save untouched
    let save = std::fs::read_to_string(env.save_dir("My Summer Car").join("save.dat")).unwrap();
    assert_eq!(save, "current");
}

#[test]
fn restore_proceeds_on_yes_answer() {
    let env = Env::new();
    let dest = env.dest();
    env.file("saves/Amistech/My Summer Car/save.dat", "original");
    let archive = snapshot_msc(&env, &dest);

    env.file("saves/Amistech/My Summer Car/save.dat", "current");

    env.becupe()
        .args(&["restore", archive.to_str().unwrap(), "msc"])
        .stdin("y\n")
        .passes()
        .stdout_has("Restore complete");
}

#[test]
fn restore_with_protect_writes_protective_backup() {
    let env = Env::new();
    let dest = env.dest();
    env.file("saves/Amistech/My Summer Car/save.dat", "original");
    let archive = snapshot_msc(&env, &dest);

    env.file("saves/Amistech/My Summer Car/save.dat", "current");

    env.becupe()
        .args(&[
            "restore",
            archive.to_str().unwrap(),
            "msc",
            "--protect",
            "--protect-dest",
            dest.to_str().unwrap(),
            "--yes",
        ])
        .passes()
        .stdout_has("Protective backup:")
        .stdout_has("Restore complete");

    let protective = std::fs::read_dir(&dest)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().contains("PRE_RESTORE"))
                .unwrap_or(false)
        })
        .count();
    assert_eq!(protective, 1, "one protective archive expected");
}

#[test]
fn restore_protect_without_any_destination_fails() {
    let env = Env::new();
    let dest = env.dest();
    env.file("saves/Amistech/My Summer Car/save.dat", "original");
    let archive = snapshot_msc(&env, &dest);

    env.becupe()
        .args(&["restore", archive.to_str().unwrap(), "msc", "--protect", "--yes"])
        .fails()
        .stderr_has("no destination folder for the protective backup");
}

#[test]
fn restore_of_non_archive_fails_and_keeps_save() {
    let env = Env::new();
    env.file("saves/Amistech/My Summer Car/save.dat", "current");
    env.file("dest/not-an-archive.becupe", "plain text");

    env.becupe()
        .args(&[
            "restore",
            env.dest().join("not-an-archive.becupe").to_str().unwrap(),
            "msc",
            "--yes",
        ])
        .fails();

    // The save dir is only removed after the archive opens
    let save = std::fs::read_to_string(env.save_dir("My Summer Car").join("save.dat")).unwrap();
    assert_eq!(save, "current");
}

#[test]
fn restore_is_journaled() {
    let env = Env::new();
    let dest = env.dest();
    env.file("saves/Amistech/My Summer Car/save.dat", "original");
    let archive = snapshot_msc(&env, &dest);

    env.becupe()
        .args(&["restore", archive.to_str().unwrap(), "msc", "--yes"])
        .passes();

    env.becupe()
        .args(&["log", "show"])
        .passes()
        .stdout_has("[RESTORE]");
}

#[test]
fn restore_works_while_automation_paused() {
    let env = Env::new();
    let dest = env.dest();
    env.file("saves/Amistech/My Summer Car/save.dat", "original");
    let archive = snapshot_msc(&env, &dest);

    env.becupe().args(&["pause"]).passes();

    env.becupe()
        .args(&["restore", archive.to_str().unwrap(), "msc", "--yes"])
        .passes()
        .stdout_has("Restore complete");
}
