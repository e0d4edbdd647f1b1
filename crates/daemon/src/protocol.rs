// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol between CLI and daemon
//!
//! JSON payloads framed with a 4-byte big-endian length prefix over a
//! Unix socket. One request/response pair per connection.

use std::path::PathBuf;
use std::time::Duration;

use becupe_core::{Edge, TargetId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Protocol version, checked during the Hello handshake
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for reading/writing one message
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound on one frame; anything larger is a protocol violation
const MAX_FRAME_BYTES: usize = 1024 * 1024;

/// Requests the CLI sends to the daemon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Request {
    Hello {
        version: String,
    },
    Ping,
    Status,
    Shutdown,
    /// Manual backup; `dest` defaults to the configured folder
    BackupNow {
        target: TargetId,
        dest: Option<PathBuf>,
        label: Option<String>,
    },
    /// Restore an archive over the target's save directory
    Restore {
        archive: PathBuf,
        target: TargetId,
        protect: bool,
        protect_dest: Option<PathBuf>,
    },
    SetPaused {
        paused: bool,
    },
    SetRule {
        target: TargetId,
        edge: Edge,
        enabled: bool,
    },
    SetFolder {
        path: PathBuf,
    },
    /// `HH:MM`, or `None` to disarm the daily schedule
    SetSchedule {
        time: Option<String>,
    },
    SetStartup {
        enabled: bool,
    },
    AcceptTerms,
    ClearJournal,
    Query {
        query: Query,
    },
}

/// Read-only queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Query {
    GetConfig,
    ReadJournal,
}

/// Per-target view in a status report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetStatus {
    pub id: TargetId,
    pub running: bool,
    pub save_dir: PathBuf,
    pub save_dir_exists: bool,
}

/// Daemon status snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub version: String,
    pub uptime_secs: u64,
    pub paused: bool,
    pub folder: Option<PathBuf>,
    pub schedule: Option<String>,
    pub targets: Vec<TargetStatus>,
}

/// Outcome of a restore, protective step included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestoreOutcome {
    pub protective_path: Option<PathBuf>,
    pub protective_error: Option<String>,
}

/// Responses the daemon sends back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    Hello { version: String },
    Pong,
    Ok,
    ShuttingDown,
    Status { report: Box<StatusReport> },
    Backup { path: PathBuf, committed: bool },
    Restored { outcome: RestoreOutcome },
    Config { settings: becupe_core::Settings },
    Journal { contents: String },
    Error { message: String },
}

/// Protocol errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("timed out")]
    Timeout,

    #[error("connection closed")]
    ConnectionClosed,

    #[error("message too large: {0} bytes")]
    MessageTooLarge(usize),
}

/// Serialize a message to its JSON payload (no length prefix)
pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(message)?)
}

/// Deserialize a message from its JSON payload
pub fn decode<T: for<'de> Deserialize<'de>>(data: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(data)?)
}

/// Write one length-prefixed frame
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    data: &[u8],
) -> Result<(), ProtocolError> {
    if data.len() > MAX_FRAME_BYTES {
        return Err(ProtocolError::MessageTooLarge(data.len()));
    }
    let len = data.len() as u32;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(data).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one length-prefixed frame
pub async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, ProtocolError> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(ProtocolError::ConnectionClosed);
        }
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_FRAME_BYTES {
        return Err(ProtocolError::MessageTooLarge(len));
    }

    let mut data = vec![0u8; len];
    match reader.read_exact(&mut data).await {
        Ok(_) => Ok(data),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            Err(ProtocolError::ConnectionClosed)
        }
        Err(e) => Err(e.into()),
    }
}

/// Read one request with a timeout
pub async fn read_request<R: AsyncRead + Unpin>(
    reader: &mut R,
    timeout: Duration,
) -> Result<Request, ProtocolError> {
    let data = tokio::time::timeout(timeout, read_message(reader))
        .await
        .map_err(|_| ProtocolError::Timeout)??;
    decode(&data)
}

/// Write one response with a timeout
pub async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &Response,
    timeout: Duration,
) -> Result<(), ProtocolError> {
    let data = encode(response)?;
    tokio::time::timeout(timeout, write_message(writer, &data))
        .await
        .map_err(|_| ProtocolError::Timeout)?
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
