// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launch-at-login preference command

use super::Toggle;

#[derive(clap::Args)]
pub struct StartupArgs {
    /// Enable or disable launching at login
    pub state: Toggle,
}
