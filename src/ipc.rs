//! Control IPC for a running session
//!
//! Newline-delimited JSON over a Unix socket. Each connection carries one
//! command; the server feeds it into the session loop and writes one JSON
//! reply. The CLI subcommands (`lock`, `refresh`, `status`, ...) are thin
//! clients of this socket.

use crate::error::{AnamnesisError, Result};
use crate::session::{SessionEvent, SessionStatus};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};

/// Command sent over the control socket
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", content = "args")]
pub enum IpcCommand {
    /// Toggle the context lock
    #[serde(rename = "toggle-lock")]
    ToggleLock,

    /// Re-resolve the current context
    #[serde(rename = "refresh")]
    Refresh,

    /// Replace the notes for the displayed context
    #[serde(rename = "note")]
    Note { content: String },

    /// Get session status
    #[serde(rename = "status")]
    GetStatus,

    /// Stop the session
    #[serde(rename = "shutdown")]
    Shutdown,
}

/// Reply written back for every command
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
pub enum IpcReply {
    Ack,
    Status(SessionStatus),
    Error { message: String },
}

/// Start the control server
pub async fn start_ipc_server(
    socket_path: PathBuf,
    tx: mpsc::Sender<SessionEvent>,
) -> Result<()> {
    // Remove existing socket if present
    if socket_path.exists() {
        tokio::fs::remove_file(&socket_path).await.map_err(|e| {
            AnamnesisError::Ipc(format!("Failed to remove existing socket: {}", e))
        })?;
    }

    info!("Starting control server on {}", socket_path.display());
    let listener = UnixListener::bind(&socket_path)
        .map_err(|e| AnamnesisError::Ipc(format!("Failed to bind control socket: {}", e)))?;

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut stream, _addr)) => {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let (reader, mut writer) = stream.split();
                        let mut reader = BufReader::new(reader);
                        let mut line = String::new();

                        match reader.read_line(&mut line).await {
                            Ok(0) => return, // connection closed
                            Ok(_) => {
                                let reply = match serde_json::from_str::<IpcCommand>(&line) {
                                    Ok(command) => handle_command(command, &tx).await,
                                    Err(e) => {
                                        warn!("Invalid control command: {}. Error: {}", line.trim(), e);
                                        IpcReply::Error {
                                            message: format!("invalid command: {}", e),
                                        }
                                    }
                                };

                                match serde_json::to_string(&reply) {
                                    Ok(json) => {
                                        if let Err(e) = writer.write_all(json.as_bytes()).await {
                                            error!("Failed to write control reply: {}", e);
                                            return;
                                        }
                                        if let Err(e) = writer.write_all(b"\n").await {
                                            error!("Failed to write newline: {}", e);
                                        }
                                    }
                                    Err(e) => error!("Failed to serialize reply: {}", e),
                                }
                            }
                            Err(e) => error!("Failed to read from control socket: {}", e),
                        }
                    });
                }
                Err(e) => {
                    error!("Failed to accept control connection: {}", e);
                }
            }
        }
    });

    Ok(())
}

async fn handle_command(command: IpcCommand, tx: &mpsc::Sender<SessionEvent>) -> IpcReply {
    let event = match command {
        IpcCommand::ToggleLock => SessionEvent::ToggleLock,
        IpcCommand::Refresh => SessionEvent::Refresh,
        IpcCommand::Note { content } => SessionEvent::EditorChanged(content),
        IpcCommand::Shutdown => SessionEvent::Shutdown,
        IpcCommand::GetStatus => {
            let (reply_tx, reply_rx) = oneshot::channel();
            if tx.send(SessionEvent::Status(reply_tx)).await.is_err() {
                return IpcReply::Error {
                    message: "session loop is gone".to_string(),
                };
            }
            return match reply_rx.await {
                Ok(status) => IpcReply::Status(status),
                Err(_) => IpcReply::Error {
                    message: "session loop dropped the request".to_string(),
                },
            };
        }
    };

    if tx.send(event).await.is_err() {
        return IpcReply::Error {
            message: "session loop is gone".to_string(),
        };
    }
    IpcReply::Ack
}

/// Send one command to a running session and return its reply
pub async fn send_command(socket_path: &Path, command: &IpcCommand) -> Result<IpcReply> {
    let mut stream = UnixStream::connect(socket_path).await.map_err(|e| {
        AnamnesisError::Ipc(format!(
            "Failed to connect to control socket {}: {}",
            socket_path.display(),
            e
        ))
    })?;

    let json = serde_json::to_string(command)?;
    stream
        .write_all(json.as_bytes())
        .await
        .map_err(|e| AnamnesisError::Ipc(format!("Failed to write to control socket: {}", e)))?;
    stream
        .write_all(b"\n")
        .await
        .map_err(|e| AnamnesisError::Ipc(format!("Failed to write newline: {}", e)))?;

    let reader = BufReader::new(stream);
    let mut lines = reader.lines();

    match lines
        .next_line()
        .await
        .map_err(|e| AnamnesisError::Ipc(format!("Failed to read from control socket: {}", e)))?
    {
        Some(line) => Ok(serde_json::from_str(&line)?),
        None => Err(AnamnesisError::Ipc(
            "control socket closed without reply".to_string(),
        )),
    }
}

/// Query status from a running session
pub async fn query_status(socket_path: &Path) -> Result<SessionStatus> {
    match send_command(socket_path, &IpcCommand::GetStatus).await? {
        IpcReply::Status(status) => Ok(status),
        IpcReply::Error { message } => Err(AnamnesisError::Ipc(message)),
        IpcReply::Ack => Err(AnamnesisError::Ipc(
            "expected status reply, got ack".to_string(),
        )),
    }
}
