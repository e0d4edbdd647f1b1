// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Monitored game targets and presence edges

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier for a monitored game
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetId {
    /// My Summer Car
    Msc,
    /// My Winter Car
    Mwc,
}

impl TargetId {
    pub const ALL: [TargetId; 2] = [TargetId::Msc, TargetId::Mwc];

    /// Symbol used in archive prefixes and status output
    pub fn symbol(&self) -> &'static str {
        match self {
            TargetId::Msc => "MSC",
            TargetId::Mwc => "MWC",
        }
    }

    /// Lowercase fragment used in config keys (`msc_open`, `mwc_close`, ...)
    pub fn key_fragment(&self) -> &'static str {
        match self {
            TargetId::Msc => "msc",
            TargetId::Mwc => "mwc",
        }
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Error parsing a target identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown target: {0} (expected MSC or MWC)")]
pub struct ParseTargetError(String);

impl FromStr for TargetId {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MSC" => Ok(TargetId::Msc),
            "MWC" => Ok(TargetId::Mwc),
            _ => Err(ParseTargetError(s.to_string())),
        }
    }
}

/// A presence transition direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// not-running -> running
    Open,
    /// running -> not-running
    Close,
}

impl Edge {
    /// Lowercase fragment used in config keys
    pub fn key_fragment(&self) -> &'static str {
        match self {
            Edge::Open => "open",
            Edge::Close => "close",
        }
    }

    /// Uppercase marker used in archive prefixes (`MSC_OPEN`, ...)
    pub fn marker(&self) -> &'static str {
        match self {
            Edge::Open => "OPEN",
            Edge::Close => "CLOSE",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_fragment())
    }
}

/// Error parsing an edge name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown edge: {0} (expected open or close)")]
pub struct ParseEdgeError(String);

impl FromStr for Edge {
    type Err = ParseEdgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(Edge::Open),
            "close" => Ok(Edge::Close),
            _ => Err(ParseEdgeError(s.to_string())),
        }
    }
}

/// A monitored game: its process image name plus its save-data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub id: TargetId,
    /// Image name matched (case-insensitively) against the process list
    pub process_name: &'static str,
    /// Directory snapshotted on backup and replaced on restore
    pub save_dir: PathBuf,
}

/// The two built-in targets, with save directories under `save_root`
pub fn builtin_targets(save_root: &Path) -> Vec<Target> {
    vec![
        Target {
            id: TargetId::Msc,
            process_name: "mysummercar.exe",
            save_dir: save_root.join("Amistech").join("My Summer Car"),
        },
        Target {
            id: TargetId::Mwc,
            process_name: "mywintercar.exe",
            save_dir: save_root.join("Amistech").join("My Winter Car"),
        },
    ]
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
