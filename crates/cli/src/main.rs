// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! becupe - save backup CLI

mod client;
mod commands;
mod completions;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{backup, config, daemon, log, restore, rule, schedule, startup, terms};
use std::path::PathBuf;

use crate::client::DaemonClient;
use becupe_daemon::protocol::StatusReport;

#[derive(Parser)]
#[command(
    name = "becupe",
    version,
    about = "Becupe - automatic save backups for My Summer Car and My Winter Car"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show daemon and target status
    Status,
    /// Take a manual backup now
    Backup(backup::BackupArgs),
    /// Restore an archive over a save directory
    Restore(restore::RestoreArgs),
    /// Pause automatic backups
    Pause,
    /// Resume automatic backups
    Resume,
    /// Enable or disable an automation rule
    Rule(rule::RuleArgs),
    /// Set the destination folder for backups
    Folder { path: PathBuf },
    /// Manage the daily backup schedule
    Schedule(schedule::ScheduleArgs),
    /// Show or clear the audit journal
    Log(log::LogArgs),
    /// Show configuration
    Config(config::ConfigArgs),
    /// Enable or disable launching at login
    Startup(startup::StartupArgs),
    /// Terms of use
    Terms(terms::TermsArgs),
    /// Daemon management
    Daemon(daemon::DaemonArgs),
    /// Generate shell completions
    Completions { shell: Shell },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Commands that don't need a daemon connection
    match cli.command {
        Commands::Completions { shell } => {
            completions::generate_completions::<Cli>(shell);
            return Ok(());
        }
        Commands::Daemon(args) => return daemon::daemon(args).await,
        _ => {}
    }

    // All other commands go through the daemon
    let client = DaemonClient::connect_or_start().await?;

    match cli.command {
        Commands::Status => {
            let report = client.status().await?;
            print_status(&report);
        }

        Commands::Backup(args) => {
            let (path, committed) = client
                .backup_now(args.target, args.dest, args.label)
                .await?;
            if committed {
                println!("Backup written: {}", path.display());
            } else {
                println!("WARNING: archive left unverified at {}", path.display());
            }
        }

        Commands::Restore(args) => {
            if !restore::confirm(&args)? {
                println!("Aborted");
                return Ok(());
            }

            let outcome = client
                .restore(
                    args.archive.clone(),
                    args.target,
                    args.protect,
                    args.protect_dest,
                )
                .await?;

            if let Some(path) = outcome.protective_path {
                println!("Protective backup: {}", path.display());
            }
            if let Some(message) = outcome.protective_error {
                println!("WARNING: protective backup failed: {}", message);
            }
            println!("Restore complete");
        }

        Commands::Pause => {
            client.set_paused(true).await?;
            println!("Automation paused");
        }

        Commands::Resume => {
            client.set_paused(false).await?;
            println!("Automation resumed");
        }

        Commands::Rule(args) => {
            let enabled = args.state.enabled();
            client.set_rule(args.target, args.edge, enabled).await?;
            println!(
                "Rule {}_{} {}",
                args.target.key_fragment(),
                args.edge.key_fragment(),
                if enabled { "enabled" } else { "disabled" }
            );
        }

        Commands::Folder { path } => {
            client.set_folder(path.clone()).await?;
            println!("Folder set: {}", path.display());
        }

        Commands::Schedule(args) => {
            use commands::schedule::ScheduleCommand;

            match args.command {
                ScheduleCommand::Set { time } => {
                    client.set_schedule(Some(time)).await?;
                    println!("Daily backup scheduled at {}", time);
                }
                ScheduleCommand::Clear => {
                    client.set_schedule(None).await?;
                    println!("Daily backup schedule cleared");
                }
                ScheduleCommand::Show => {
                    let report = client.status().await?;
                    match report.schedule {
                        Some(time) => println!("Schedule: {}", time),
                        None => println!("Schedule: (none)"),
                    }
                }
            }
        }

        Commands::Log(args) => {
            use commands::log::LogCommand;

            match args.command {
                LogCommand::Show => {
                    let contents = client.read_journal().await?;
                    if contents.is_empty() {
                        println!("Journal is empty");
                    } else {
                        print!("{}", contents);
                    }
                }
                LogCommand::Clear => {
                    client.clear_journal().await?;
                    println!("Journal cleared");
                }
            }
        }

        Commands::Config(args) => {
            use commands::config::ConfigCommand;

            match args.command {
                ConfigCommand::Show => {
                    let settings = client.get_config().await?;
                    println!("{}", serde_json::to_string_pretty(&settings)?);
                }
            }
        }

        Commands::Startup(args) => {
            let enabled = args.state.enabled();
            client.set_startup(enabled).await?;
            println!(
                "Launch at login {}",
                if enabled { "enabled" } else { "disabled" }
            );
        }

        Commands::Terms(args) => {
            use commands::terms::TermsCommand;

            match args.command {
                TermsCommand::Accept => {
                    client.accept_terms().await?;
                    println!("Terms accepted");
                }
            }
        }

        Commands::Daemon(_) | Commands::Completions { .. } => unreachable!(),
    }

    Ok(())
}

fn print_status(report: &StatusReport) {
    println!("Status: running");
    println!("Version: {}", report.version);
    println!("Uptime: {}s", report.uptime_secs);
    println!("Paused: {}", if report.paused { "yes" } else { "no" });
    match &report.folder {
        Some(folder) => println!("Folder: {}", folder.display()),
        None => println!("Folder: (not set)"),
    }
    match &report.schedule {
        Some(time) => println!("Schedule: {}", time),
        None => println!("Schedule: (none)"),
    }
    println!("Targets:");
    for target in &report.targets {
        let presence = if target.running {
            "running"
        } else {
            "not running"
        };
        let missing = if target.save_dir_exists {
            ""
        } else {
            " (missing)"
        };
        println!(
            "  {}: {}, saves at {}{}",
            target.id,
            presence,
            target.save_dir.display(),
            missing
        );
    }
}
