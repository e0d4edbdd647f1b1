//! Manual backup specs
//!
//! `becupe backup` snapshots a save directory into a `.becupe` archive.

use std::path::{Path, PathBuf};

use crate::prelude::*;

fn becupe_archives(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().map(|e| e == "becupe").unwrap_or(false))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn backup_fails_without_destination() {
    let env = Env::new();

    env.becupe()
        .args(&["backup", "msc"])
        .fails()
        .stderr_has("no destination folder configured");
}

#[test]
fn backup_writes_archive_to_explicit_dest() {
    let env = Env::new();
    let dest = env.dest();
    env.file("saves/Amistech/My Summer Car/save.dat", "car parts");

    env.becupe()
        .args(&["backup", "msc", "--dest", dest.to_str().unwrap()])
        .passes()
        .stdout_has("Backup written:");

    let archives = becupe_archives(&dest);
    assert_eq!(archives.len(), 1);
    let name = archives[0].file_name().unwrap().to_string_lossy();
    assert!(name.starts_with("MSC_"), "unexpected name: {name}");
}

#[test]
fn backup_defaults_to_configured_folder() {
    let env = Env::new();
    let dest = env.dest();
    env.file("saves/Amistech/My Winter Car/save.dat", "winter");

    env.becupe()
        .args(&["folder", dest.to_str().unwrap()])
        .passes();
    env.becupe().args(&["backup", "mwc"]).passes();

    let archives = becupe_archives(&dest);
    assert_eq!(archives.len(), 1);
    let name = archives[0].file_name().unwrap().to_string_lossy();
    assert!(name.starts_with("MWC_"), "unexpected name: {name}");
}

#[test]
fn backup_label_becomes_archive_prefix() {
    let env = Env::new();
    let dest = env.dest();
    env.file("saves/Amistech/My Summer Car/save.dat", "x");

    env.becupe()
        .args(&[
            "backup",
            "msc",
            "--dest",
            dest.to_str().unwrap(),
            "--label",
            "before-mods",
        ])
        .passes();

    let archives = becupe_archives(&dest);
    assert_eq!(archives.len(), 1);
    let name = archives[0].file_name().unwrap().to_string_lossy();
    assert!(name.starts_with("before-mods_"), "unexpected name: {name}");
}

#[test]
fn backup_leaves_no_intermediate_zip() {
    let env = Env::new();
    let dest = env.dest();
    env.file("saves/Amistech/My Summer Car/save.dat", "x");

    env.becupe()
        .args(&["backup", "msc", "--dest", dest.to_str().unwrap()])
        .passes();

    let leftover_zip = std::fs::read_dir(&dest)
        .unwrap()
        .filter_map(|e| e.ok())
        .any(|e| e.path().extension().map(|x| x == "zip").unwrap_or(false));
    assert!(!leftover_zip, "intermediate .zip should have been renamed");
}

#[test]
fn backup_archive_contains_the_save_tree() {
    let env = Env::new();
    let dest = env.dest();
    env.file("saves/Amistech/My Summer Car/save.dat", "car parts");
    env.file("saves/Amistech/My Summer Car/garage/truck.dat", "truck");

    env.becupe()
        .args(&["backup", "msc", "--dest", dest.to_str().unwrap()])
        .passes();

    let archives = becupe_archives(&dest);
    let file = std::fs::File::open(&archives[0]).unwrap();
    let mut zip = zip::ZipArchive::new(file).unwrap();

    let mut save = String::new();
    std::io::Read::read_to_string(&mut zip.by_name("save.dat").unwrap(), &mut save).unwrap();
    similar_asserts::assert_eq!(save, "car parts");

    let mut truck = String::new();
    std::io::Read::read_to_string(&mut zip.by_name("garage/truck.dat").unwrap(), &mut truck)
        .unwrap();
    similar_asserts::assert_eq!(truck, "truck");
}

#[test]
fn backup_fails_when_save_dir_missing() {
    let env = Env::new();
    let dest = env.dest();
    std::fs::remove_dir_all(env.save_dir("My Summer Car")).unwrap();

    env.becupe()
        .args(&["backup", "msc", "--dest", dest.to_str().unwrap()])
        .fails()
        .stderr_has("source directory not found");
}

#[test]
fn backup_is_journaled() {
    let env = Env::new();
    let dest = env.dest();
    env.file("saves/Amistech/My Summer Car/save.dat", "x");

    env.becupe()
        .args(&["backup", "msc", "--dest", dest.to_str().unwrap()])
        .passes();

    env.becupe()
        .args(&["log", "show"])
        .passes()
        .stdout_has("[BACKUP]");
}
