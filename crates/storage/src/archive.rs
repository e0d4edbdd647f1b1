// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timestamped ZIP snapshots committed under the `.becupe` extension
//!
//! An archive is written with the intermediate `.zip` extension and only
//! renamed to `.becupe` once the write has completed; the final extension
//! is what marks a backup as finished and restorable. Both files are
//! ordinary ZIP containers, the extension convention is the only custom
//! part.

use std::fs::{self, File};
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};

use becupe_core::Clock;
use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::journal::{EntryKind, Journal};

/// Extension marking a completed, restorable archive
pub const FINAL_EXTENSION: &str = "becupe";

/// Extension of the in-progress intermediate file
pub const INTERMEDIATE_EXTENSION: &str = "zip";

/// Errors creating or extracting archives
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("source directory not found: {0}")]
    SourceMissing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("archive verification failed for {path}: {source}")]
    Verification {
        path: PathBuf,
        source: zip::result::ZipError,
    },
}

/// Result of a create call.
///
/// The degraded variant reports the intermediate path when the write
/// nominally succeeded but the file is not where it should be; the caller
/// always receives some path to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// Archive written and renamed to the final extension
    Committed(PathBuf),
    /// Intermediate file went missing before commit; nothing was renamed
    Unverified(PathBuf),
}

impl ArchiveOutcome {
    pub fn path(&self) -> &Path {
        match self {
            ArchiveOutcome::Committed(path) | ArchiveOutcome::Unverified(path) => path,
        }
    }
}

/// Creates and extracts snapshot archives.
///
/// `verify_on_create` re-opens the intermediate ZIP before the commit
/// rename. It defaults off: the observed contract trusts the presence of
/// the intermediate file, so verification is opt-in hardening.
#[derive(Clone)]
pub struct ArchiveStore<C: Clock> {
    clock: C,
    journal: Journal<C>,
    verify_on_create: bool,
}

impl<C: Clock> ArchiveStore<C> {
    pub fn new(clock: C, journal: Journal<C>) -> Self {
        Self {
            clock,
            journal,
            verify_on_create: false,
        }
    }

    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify_on_create = verify;
        self
    }

    /// Snapshot `source_dir` into `dest_folder` under the naming contract
    /// `{prefix}_{YYYY-MM-DD_HH-MM-SS}.becupe`.
    ///
    /// A same-named final file is removed first (last-write-wins). Every
    /// failure path journals an ERROR before propagating.
    pub fn create(
        &self,
        source_dir: &Path,
        dest_folder: &Path,
        prefix: &str,
    ) -> Result<ArchiveOutcome, StorageError> {
        self.journal.record(
            EntryKind::Backup,
            &format!("backup started: {} <- {}", prefix, source_dir.display()),
        );

        match self.create_inner(source_dir, dest_folder, prefix) {
            Ok(outcome) => {
                match &outcome {
                    ArchiveOutcome::Committed(path) => {
                        info!(path = %path.display(), "archive committed");
                        self.journal.record(
                            EntryKind::Backup,
                            &format!("backup finished: {}", path.display()),
                        );
                    }
                    ArchiveOutcome::Unverified(path) => {
                        self.journal.record(
                            EntryKind::Error,
                            &format!(
                                "backup produced no archive, expected at {}",
                                path.display()
                            ),
                        );
                    }
                }
                Ok(outcome)
            }
            Err(e) => {
                self.journal
                    .record(EntryKind::Error, &format!("backup failed: {} ({})", prefix, e));
                Err(e)
            }
        }
    }

    fn create_inner(
        &self,
        source_dir: &Path,
        dest_folder: &Path,
        prefix: &str,
    ) -> Result<ArchiveOutcome, StorageError> {
        if !source_dir.is_dir() {
            return Err(StorageError::SourceMissing(source_dir.to_path_buf()));
        }
        fs::create_dir_all(dest_folder)?;

        let stem = archive_stem(prefix, &self.clock.now());
        let intermediate = dest_folder.join(format!("{}.{}", stem, INTERMEDIATE_EXTENSION));
        let final_path = dest_folder.join(format!("{}.{}", stem, FINAL_EXTENSION));

        let file = File::create(&intermediate)?;
        let mut writer = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        add_directory(&mut writer, source_dir, "", options)?;
        writer.finish()?;

        // The commit rename is what tells a finished backup apart from a
        // partially written intermediate file
        if !intermediate.is_file() {
            return Ok(ArchiveOutcome::Unverified(intermediate));
        }

        if self.verify_on_create {
            let file = File::open(&intermediate)?;
            if let Err(e) = ZipArchive::new(file) {
                return Err(StorageError::Verification {
                    path: intermediate,
                    source: e,
                });
            }
        }

        if final_path.exists() {
            fs::remove_file(&final_path)?;
        }
        fs::rename(&intermediate, &final_path)?;

        Ok(ArchiveOutcome::Committed(final_path))
    }

    /// Replace `target_dir` with the contents of `archive_path`.
    ///
    /// Destructive and non-transactional: the existing directory is removed
    /// before extraction, and a failure partway leaves whatever was
    /// extracted so far. Deliberately not masked; the caller reports it.
    pub fn extract(&self, archive_path: &Path, target_dir: &Path) -> Result<(), StorageError> {
        self.journal.record(
            EntryKind::Restore,
            &format!(
                "restore started: {} -> {}",
                archive_path.display(),
                target_dir.display()
            ),
        );

        match self.extract_inner(archive_path, target_dir) {
            Ok(()) => {
                info!(path = %target_dir.display(), "restore finished");
                self.journal.record(
                    EntryKind::Restore,
                    &format!("restore finished: {}", target_dir.display()),
                );
                Ok(())
            }
            Err(e) => {
                self.journal.record(
                    EntryKind::Error,
                    &format!("restore failed: {} ({})", archive_path.display(), e),
                );
                Err(e)
            }
        }
    }

    fn extract_inner(&self, archive_path: &Path, target_dir: &Path) -> Result<(), StorageError> {
        let file = File::open(archive_path)?;
        let mut archive = ZipArchive::new(file)?;

        if target_dir.exists() {
            fs::remove_dir_all(target_dir)?;
        }
        fs::create_dir_all(target_dir)?;

        archive.extract(target_dir)?;
        Ok(())
    }
}

/// Filename stem under the naming contract, zero-padded and fixed-width so
/// names for t1 < t2 sort lexically in chronological order
fn archive_stem(prefix: &str, now: &DateTime<Local>) -> String {
    format!("{}_{}", prefix, now.format("%Y-%m-%d_%H-%M-%S"))
}

/// Recursively add a directory's contents to the ZIP, with entry paths
/// stored relative to the walk root using forward slashes
fn add_directory<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    dir: &Path,
    zip_prefix: &str,
    options: SimpleFileOptions,
) -> Result<(), StorageError> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let entry_name = if zip_prefix.is_empty() {
            name
        } else {
            format!("{}/{}", zip_prefix, name)
        };

        if path.is_dir() {
            zip.add_directory(format!("{}/", entry_name), options)?;
            add_directory(zip, &path, &entry_name, options)?;
        } else {
            zip.start_file(&entry_name, options)?;
            let mut file = File::open(&path)?;
            io::copy(&mut file, zip)?;
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
