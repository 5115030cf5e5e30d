// ABOUTME: SSH-specific error types.
// ABOUTME: Covers connection, authentication, host key, and remote command failures.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("connection to {host}:{port} timed out after {timeout:?}")]
    ConnectTimeout {
        host: String,
        port: u16,
        timeout: Duration,
    },

    #[error("authentication failed for user {0}")]
    AuthenticationFailed(String),

    #[error("private key not found at {0}")]
    KeyNotFound(PathBuf),

    #[error("failed to load key from {path}: {reason}")]
    KeyLoadFailed { path: PathBuf, reason: String },

    #[error("could not determine home directory for the default private key")]
    NoHomeDirectory,

    #[error("command execution failed: {0}")]
    ExecFailed(String),

    #[error("`{command}` exited with status {exit_code}: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: u32,
        stderr: String,
    },

    #[error("command timed out after {0:?}")]
    CommandTimeout(Duration),

    #[error("channel closed unexpectedly without exit status")]
    ChannelClosed,

    #[error("SSH protocol error: {0}")]
    Protocol(#[from] russh::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConnectionError {
    /// True when the remote end was reached and the command itself failed.
    pub fn is_command_failure(&self) -> bool {
        matches!(self, ConnectionError::CommandFailed { .. })
    }
}

pub type Result<T> = std::result::Result<T, ConnectionError>;
