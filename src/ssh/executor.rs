// ABOUTME: One-command-per-session remote executor.
// ABOUTME: Opens a fresh SSH session for every call and turns non-zero exits into typed errors.

use super::client::{Session, SessionConfig};
use super::error::{ConnectionError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Runs a single shell command on the remote machine.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Run `command` and return its stdout with trailing newlines removed.
    ///
    /// A command that ran but exited non-zero is
    /// [`ConnectionError::CommandFailed`], never an empty string.
    async fn run(&self, command: &str, timeout: Duration) -> Result<String>;
}

/// Executor backed by russh. Holds only connection parameters, no session.
#[derive(Debug, Clone)]
pub struct SshExecutor {
    config: SessionConfig,
}

impl SshExecutor {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl RemoteExecutor for SshExecutor {
    async fn run(&self, command: &str, timeout: Duration) -> Result<String> {
        tracing::debug!(host = %self.config.host, %command, "running remote command");

        let session = Session::connect(self.config.clone()).await?;
        let result = session.exec(command, timeout).await;

        if let Err(e) = session.disconnect().await {
            tracing::warn!("SSH disconnect failed for {}: {}", self.config.host, e);
        }

        let output = result?;
        if !output.success() {
            return Err(ConnectionError::CommandFailed {
                command: command.to_string(),
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }

        Ok(output.stdout.trim_end_matches(['\r', '\n']).to_string())
    }
}
