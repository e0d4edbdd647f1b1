// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted automation settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::target::{Edge, TargetId};

/// Automation settings, serialized as `config.json`.
///
/// Field names match the on-disk keys exactly. Keys this version does not
/// recognize are carried in `extra` so a rewrite never drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Destination folder for automatic backups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<PathBuf>,

    /// Global kill-switch for rule-triggered backups; starts paused
    #[serde(default = "default_paused")]
    pub paused: bool,

    #[serde(default)]
    pub msc_open: bool,
    #[serde(default)]
    pub msc_close: bool,
    #[serde(default)]
    pub mwc_open: bool,
    #[serde(default)]
    pub mwc_close: bool,

    /// Whether the app is registered to start with the OS session
    #[serde(default)]
    pub startup_enabled: bool,

    /// Disclaimer-accepted flag (on-disk key: `termos_lidos_e_aceitos`)
    #[serde(default, rename = "termos_lidos_e_aceitos")]
    pub terms_accepted: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_paused() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            folder: None,
            paused: true,
            msc_open: false,
            msc_close: false,
            mwc_open: false,
            mwc_close: false,
            startup_enabled: false,
            terms_accepted: false,
            extra: Map::new(),
        }
    }
}

impl Settings {
    /// Per-(target, edge) automatic-backup flag
    pub fn rule(&self, target: TargetId, edge: Edge) -> bool {
        match (target, edge) {
            (TargetId::Msc, Edge::Open) => self.msc_open,
            (TargetId::Msc, Edge::Close) => self.msc_close,
            (TargetId::Mwc, Edge::Open) => self.mwc_open,
            (TargetId::Mwc, Edge::Close) => self.mwc_close,
        }
    }

    pub fn set_rule(&mut self, target: TargetId, edge: Edge, enabled: bool) {
        match (target, edge) {
            (TargetId::Msc, Edge::Open) => self.msc_open = enabled,
            (TargetId::Msc, Edge::Close) => self.msc_close = enabled,
            (TargetId::Mwc, Edge::Open) => self.mwc_open = enabled,
            (TargetId::Mwc, Edge::Close) => self.mwc_close = enabled,
        }
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
