// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon management command

use anyhow::Result;

use crate::client::{self, ClientError, DaemonClient};

#[derive(clap::Args)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: DaemonCommand,
}

#[derive(clap::Subcommand)]
pub enum DaemonCommand {
    /// Start the daemon in the background
    Start,
    /// Stop the daemon
    Stop,
    /// Show whether the daemon is running
    Status,
    /// Stop and start the daemon
    Restart,
}

pub async fn daemon(args: DaemonArgs) -> Result<()> {
    match args.command {
        DaemonCommand::Start => {
            if DaemonClient::connect().is_ok() {
                println!("Daemon already running");
                return Ok(());
            }
            let client = DaemonClient::connect_or_start().await?;
            let version = client.hello().await?;
            println!("Daemon started (version {})", version);
        }

        DaemonCommand::Stop => {
            if client::daemon_stop().await? {
                println!("Daemon stopped");
            } else {
                println!("Daemon not running");
            }
        }

        DaemonCommand::Status => match DaemonClient::connect() {
            Ok(client) => {
                let version = client.hello().await?;
                match client::read_daemon_pid()? {
                    Some(pid) => println!("Daemon running (pid {}, version {})", pid, version),
                    None => println!("Daemon running (version {})", version),
                }
            }
            Err(ClientError::DaemonNotRunning) => println!("Daemon not running"),
            Err(e) => return Err(e.into()),
        },

        DaemonCommand::Restart => {
            client::daemon_stop().await?;
            let client = DaemonClient::connect_or_start().await?;
            let version = client.hello().await?;
            println!("Daemon restarted (version {})", version);
        }
    }

    Ok(())
}
