// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket server and connection handling.

use std::path::PathBuf;

use becupe_core::{ScheduleTime, SystemClock, TargetId};
use becupe_engine::Runtime;
use becupe_storage::ArchiveOutcome;
use tokio::io::AsyncWrite;
use tokio::net::UnixStream;
use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::lifecycle::DaemonState;
use crate::protocol::{
    self, Query, Request, Response, RestoreOutcome, StatusReport, TargetStatus, DEFAULT_TIMEOUT,
    PROTOCOL_VERSION,
};

/// Handle a single client connection.
///
/// Requests that perform archive work (manual backup, restore) are
/// spawned into `jobs` and answered from there, so the caller's select
/// loop keeps polling presence and serving other clients while the
/// archive is written or extracted.
pub async fn handle_connection(
    daemon: &mut DaemonState,
    stream: UnixStream,
    jobs: &mut JoinSet<()>,
) -> Result<(), ServerError> {
    let (mut reader, mut writer) = stream.into_split();

    let request = match protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await {
        Ok(req) => req,
        Err(protocol::ProtocolError::Timeout) => {
            error!("Request read timeout");
            return Err(ServerError::Timeout);
        }
        Err(protocol::ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected before sending request");
            return Ok(());
        }
        Err(e) => {
            error!("Failed to read request: {}", e);
            return Err(ServerError::Protocol(e));
        }
    };

    debug!("Received request: {:?}", request);

    match request {
        Request::BackupNow {
            target,
            dest,
            label,
        } => {
            let runtime = daemon.runtime.clone();
            jobs.spawn(async move {
                let response = backup_response(&runtime, target, dest, label).await;
                send_from_job(&mut writer, &response).await;
            });
            Ok(())
        }

        Request::Restore {
            archive,
            target,
            protect,
            protect_dest,
        } => {
            let runtime = daemon.runtime.clone();
            jobs.spawn(async move {
                let response =
                    restore_response(&runtime, archive, target, protect, protect_dest).await;
                send_from_job(&mut writer, &response).await;
            });
            Ok(())
        }

        request => {
            let response = handle_request(daemon, request).await;

            debug!("Sending response: {:?}", response);

            protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT)
                .await
                .map_err(ServerError::Protocol)?;

            Ok(())
        }
    }
}

/// Write a response from a background job. The client is gone if this
/// fails, so the error is logged rather than propagated.
async fn send_from_job<W: AsyncWrite + Unpin>(writer: &mut W, response: &Response) {
    debug!("Sending response: {:?}", response);
    if let Err(e) = protocol::write_response(writer, response, DEFAULT_TIMEOUT).await {
        error!("Failed to send response: {}", e);
    }
}

/// Handle a single request and return a response
async fn handle_request(daemon: &mut DaemonState, request: Request) -> Response {
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version: _ } => Response::Hello {
            version: PROTOCOL_VERSION.to_string(),
        },

        Request::Status => status_report(daemon),

        Request::Shutdown => {
            daemon.shutdown_requested = true;
            Response::ShuttingDown
        }

        // Normally intercepted by `handle_connection` and run as a job;
        // this direct path serves callers without a job set
        Request::BackupNow {
            target,
            dest,
            label,
        } => backup_response(&daemon.runtime, target, dest, label).await,

        Request::Restore {
            archive,
            target,
            protect,
            protect_dest,
        } => restore_response(&daemon.runtime, archive, target, protect, protect_dest).await,

        Request::SetPaused { paused } => reply(daemon.runtime.set_paused(paused)),

        Request::SetRule {
            target,
            edge,
            enabled,
        } => reply(daemon.runtime.set_rule(target, edge, enabled)),

        Request::SetFolder { path } => reply(daemon.runtime.set_folder(path)),

        Request::SetSchedule { time } => {
            let parsed = match time {
                Some(text) => match text.parse::<ScheduleTime>() {
                    Ok(time) => Some(time),
                    Err(e) => {
                        return Response::Error {
                            message: e.to_string(),
                        }
                    }
                },
                None => None,
            };
            daemon.schedule.set_time(parsed);
            Response::Ok
        }

        Request::SetStartup { enabled } => reply(daemon.runtime.set_startup_enabled(enabled)),

        Request::AcceptTerms => reply(daemon.runtime.accept_terms()),

        Request::ClearJournal => match daemon.journal.clear() {
            Ok(()) => Response::Ok,
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        },

        Request::Query { query } => handle_query(daemon, query),
    }
}

/// Run a manual backup and shape the wire response
async fn backup_response(
    runtime: &Runtime<SystemClock>,
    target: TargetId,
    dest: Option<PathBuf>,
    label: Option<String>,
) -> Response {
    match runtime.backup_now(target, dest, label).await {
        Ok(outcome) => Response::Backup {
            committed: matches!(outcome, ArchiveOutcome::Committed(_)),
            path: outcome.path().to_path_buf(),
        },
        Err(e) => Response::Error {
            message: e.to_string(),
        },
    }
}

/// Run a restore and shape the wire response
async fn restore_response(
    runtime: &Runtime<SystemClock>,
    archive: PathBuf,
    target: TargetId,
    protect: bool,
    protect_dest: Option<PathBuf>,
) -> Response {
    // The protective destination falls back to the configured folder;
    // with neither, the protective step is attempted and its failure
    // reported, never the restore blocked
    let protect_dest = if protect {
        match protect_dest.or_else(|| runtime.settings().folder) {
            Some(dest) => Some(dest),
            None => {
                return Response::Error {
                    message: "no destination folder for the protective backup; \
                              pass one or configure a folder"
                        .to_string(),
                }
            }
        }
    } else {
        None
    };

    match runtime.restore(archive, target, protect_dest).await {
        Ok(report) => {
            let (protective_path, protective_error) = match report.protective {
                Some(Ok(path)) => (Some(path), None),
                Some(Err(message)) => (None, Some(message)),
                None => (None, None),
            };
            Response::Restored {
                outcome: RestoreOutcome {
                    protective_path,
                    protective_error,
                },
            }
        }
        Err(e) => Response::Error {
            message: e.to_string(),
        },
    }
}

fn reply<E: std::fmt::Display>(result: Result<(), E>) -> Response {
    match result {
        Ok(()) => Response::Ok,
        Err(e) => Response::Error {
            message: e.to_string(),
        },
    }
}

fn status_report(daemon: &DaemonState) -> Response {
    let settings = daemon.runtime.settings();
    let targets = daemon
        .runtime
        .targets()
        .iter()
        .map(|t| TargetStatus {
            id: t.id,
            running: daemon.watcher.is_running(t.id),
            save_dir: t.save_dir.clone(),
            save_dir_exists: t.save_dir.is_dir(),
        })
        .collect();

    Response::Status {
        report: Box::new(StatusReport {
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: daemon.start_time.elapsed().as_secs(),
            paused: settings.paused,
            folder: settings.folder,
            schedule: daemon.schedule.time().map(|t| t.to_string()),
            targets,
        }),
    }
}

/// Handle query requests
fn handle_query(daemon: &DaemonState, query: Query) -> Response {
    match query {
        Query::GetConfig => Response::Config {
            settings: daemon.runtime.settings(),
        },

        Query::ReadJournal => match daemon.journal.read_all() {
            Ok(contents) => Response::Journal { contents },
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        },
    }
}

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),

    #[error("Request timeout")]
    Timeout,
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
