// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! becuped - save backup daemon
//!
//! Background process that watches the two game processes, runs the
//! automation rules and the daily schedule, and serves the CLI socket.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::time::Duration;

use becupe_daemon::lifecycle::{self, LifecycleError, Paths};
use becupe_daemon::{server, STARTUP_MARKER_PREFIX};
use chrono::Local;
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinSet;
use tracing::{error, info};

/// Default presence poll cadence; low enough to catch short-lived
/// launches, high enough to keep enumeration cost negligible
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// The schedule is compared once per minute, exact-minute match
const SCHEDULE_TICK: Duration = Duration::from_secs(60);

struct Args {
    poll_interval: Duration,
    verify_archives: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        poll_interval: DEFAULT_POLL_INTERVAL,
        verify_archives: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--poll-interval" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--poll-interval needs a value (e.g. 2s)".to_string())?;
                args.poll_interval = humantime::parse_duration(&value)
                    .map_err(|e| format!("invalid --poll-interval: {}", e))?;
            }
            "--verify-archives" => args.verify_archives = true,
            other => return Err(format!("unknown argument: {}", other)),
        }
    }

    Ok(args)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(2);
        }
    };

    let paths = Paths::resolve()?;

    // Write startup marker to log (before tracing setup, so CLI can find it)
    write_startup_marker(&paths)?;

    // Set up logging
    let log_guard = setup_logging(&paths)?;

    info!(state_dir = %paths.state_dir.display(), "Starting becuped");

    let mut daemon = match lifecycle::startup(&paths, args.verify_archives).await {
        Ok(d) => d,
        Err(e) => {
            // Write error synchronously (tracing is non-blocking and may
            // not flush in time)
            write_startup_error(&paths, &e);
            error!("Failed to start daemon: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!(
        "Daemon ready, listening on {}",
        paths.socket_path.display()
    );

    // Signal ready for the CLI waiting on startup
    println!("READY");

    let mut poll_timer = tokio::time::interval(args.poll_interval);
    let mut schedule_timer = tokio::time::interval(SCHEDULE_TICK);
    // Skip the immediate first tick of each interval
    poll_timer.tick().await;
    schedule_timer.tick().await;

    // In-flight archive work runs here, polled as its own arm, so a
    // backup or restore in progress never stalls the poll tick or the
    // socket
    let mut jobs: JoinSet<()> = JoinSet::new();

    loop {
        tokio::select! {
            // Accept client connections
            result = daemon.listener.accept() => {
                match result {
                    Ok((stream, _)) => {
                        if let Err(e) = server::handle_connection(&mut daemon, stream, &mut jobs).await {
                            error!("Error handling connection: {}", e);
                        }
                    }
                    Err(e) => {
                        error!("Error accepting connection: {}", e);
                    }
                }
            }

            // Presence poll tick
            _ = poll_timer.tick() => {
                for event in daemon.watcher.tick() {
                    info!(event = event.name(), target = %event.target(), "presence transition");
                    let runtime = daemon.runtime.clone();
                    jobs.spawn(async move {
                        if let Err(e) = runtime.handle_event(&event).await {
                            // Already journaled by the store; the log carries it
                            // to the operator as well
                            error!(event = event.name(), "automatic backup failed: {}", e);
                        }
                    });
                }
            }

            // Daily schedule tick (once per minute)
            _ = schedule_timer.tick() => {
                if daemon.schedule.due(&Local::now()) {
                    info!("daily schedule fired");
                    let runtime = daemon.runtime.clone();
                    jobs.spawn(async move {
                        for (target, result) in runtime.scheduled_pass().await {
                            if let Err(e) = result {
                                error!(target = %target, "scheduled backup failed: {}", e);
                            }
                        }
                    });
                }
            }

            // Reap finished archive jobs
            Some(result) = jobs.join_next() => {
                if let Err(e) = result {
                    error!("archive job failed: {}", e);
                }
            }

            // Graceful shutdown on SIGTERM
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
                break;
            }

            // Graceful shutdown on SIGINT
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down...");
                break;
            }
        }

        // Check if shutdown was requested via IPC
        if daemon.shutdown_requested {
            info!("Shutdown requested via IPC, shutting down...");
            break;
        }
    }

    // Let in-flight archive work finish; those clients are still waiting
    // on responses
    while let Some(result) = jobs.join_next().await {
        if let Err(e) = result {
            error!("archive job failed: {}", e);
        }
    }

    daemon.shutdown();

    info!("Daemon stopped");
    Ok(())
}

/// Write startup marker to log file (appends to existing log)
fn write_startup_marker(paths: &Paths) -> Result<(), LifecycleError> {
    use std::io::Write;

    std::fs::create_dir_all(&paths.state_dir)?;

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.log_path)?;
    writeln!(file, "{}{})", STARTUP_MARKER_PREFIX, std::process::id())?;

    Ok(())
}

/// Write startup error synchronously to log file.
/// This ensures the error is visible to the CLI even if the process exits
/// quickly.
fn write_startup_error(paths: &Paths, error: &LifecycleError) {
    use std::io::Write;

    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.log_path)
    else {
        return;
    };
    let _ = writeln!(file, "ERROR Failed to start daemon: {}", error);
}

fn setup_logging(
    paths: &Paths,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    std::fs::create_dir_all(&paths.state_dir)?;

    let file_appender = tracing_appender::rolling::never(
        paths.log_path.parent().ok_or(LifecycleError::NoStateDir)?,
        paths
            .log_path
            .file_name()
            .ok_or(LifecycleError::NoStateDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env("BECUPE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
