// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Presence transition events

use serde::{Deserialize, Serialize};

use crate::target::{Edge, TargetId};

/// A detected presence transition for a monitored target.
///
/// Emitted by the presence tracker exactly once per actual OS-level
/// transition; steady state produces nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresenceEvent {
    /// Target process appeared in the process list
    Opened { target: TargetId },
    /// Target process disappeared from the process list
    Closed { target: TargetId },
}

impl PresenceEvent {
    pub fn target(&self) -> TargetId {
        match self {
            PresenceEvent::Opened { target } | PresenceEvent::Closed { target } => *target,
        }
    }

    pub fn edge(&self) -> Edge {
        match self {
            PresenceEvent::Opened { .. } => Edge::Open,
            PresenceEvent::Closed { .. } => Edge::Close,
        }
    }

    /// Event name for logging
    pub fn name(&self) -> &'static str {
        match self {
            PresenceEvent::Opened { .. } => "presence:opened",
            PresenceEvent::Closed { .. } => "presence:closed",
        }
    }
}
