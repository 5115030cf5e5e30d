// ABOUTME: Copies local build output to the remote machine with scp.
// ABOUTME: Ensures the destination exists first and keeps scp's diagnostics on failure.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;

use crate::process::combine_output;
use crate::remote::RemoteTarget;
use crate::remote::shell::quote;
use crate::ssh::RemoteExecutor;

/// Default limit for one scp invocation.
pub const DEFAULT_TRANSFER_TIMEOUT: Duration = Duration::from_secs(600);

const MKDIR_TIMEOUT: Duration = Duration::from_secs(30);
/// scp (through ssh) exits with 255 when the connection itself failed.
const SSH_TRANSPORT_FAILURE: i32 = 255;

/// Result of copying artifacts to the remote machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferResult {
    Ok,
    ConnectionFailed(String),
    CopyError {
        exit_code: Option<i32>,
        diagnostics: String,
    },
    Timeout(Duration),
}

impl TransferResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, TransferResult::Ok)
    }
}

impl fmt::Display for TransferResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferResult::Ok => write!(f, "transfer complete"),
            TransferResult::ConnectionFailed(reason) => {
                write!(f, "could not reach the remote host: {}", reason)
            }
            TransferResult::CopyError {
                exit_code: Some(code),
                diagnostics,
            } => write!(f, "scp exited with code {}: {}", code, diagnostics),
            TransferResult::CopyError {
                exit_code: None,
                diagnostics,
            } => write!(f, "copy failed: {}", diagnostics),
            TransferResult::Timeout(limit) => write!(f, "transfer timed out after {:?}", limit),
        }
    }
}

/// Copies directory trees to a [`RemoteTarget`] using an scp-compatible program.
pub struct ArtifactTransfer {
    executor: Arc<dyn RemoteExecutor>,
    scp_program: PathBuf,
    timeout: Duration,
}

impl ArtifactTransfer {
    pub fn new(executor: Arc<dyn RemoteExecutor>) -> Self {
        Self {
            executor,
            scp_program: PathBuf::from("scp"),
            timeout: DEFAULT_TRANSFER_TIMEOUT,
        }
    }

    pub fn scp_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.scp_program = program.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Copy the contents of `local_dir` into `remote_dir`.
    pub async fn transfer(
        &self,
        local_dir: &Path,
        remote_dir: &str,
        target: &RemoteTarget,
    ) -> TransferResult {
        let sources = match top_level_entries(local_dir) {
            Ok(sources) if sources.is_empty() => {
                return TransferResult::CopyError {
                    exit_code: None,
                    diagnostics: format!("{} is empty, nothing to copy", local_dir.display()),
                };
            }
            Ok(sources) => sources,
            Err(e) => {
                return TransferResult::CopyError {
                    exit_code: None,
                    diagnostics: format!("cannot read {}: {}", local_dir.display(), e),
                };
            }
        };

        // The debug dir may have been pruned since preparation
        let mkdir = format!("mkdir -p {}", quote(remote_dir));
        if let Err(e) = self.executor.run(&mkdir, MKDIR_TIMEOUT).await {
            return TransferResult::ConnectionFailed(e.to_string());
        }

        let mut command = Command::new(&self.scp_program);
        command
            .args(self.scp_args(target))
            .args(&sources)
            .arg(format!("{}:{}/", target.login(), remote_dir))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(
            "copying {} entries from {} to {}:{}",
            sources.len(),
            local_dir.display(),
            target.host(),
            remote_dir
        );

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                return TransferResult::CopyError {
                    exit_code: None,
                    diagnostics: format!(
                        "failed to start {}: {}",
                        self.scp_program.display(),
                        e
                    ),
                };
            }
        };

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return TransferResult::CopyError {
                    exit_code: None,
                    diagnostics: format!("failed waiting for scp: {}", e),
                };
            }
            // Dropping the future drops the child, which kills it
            Err(_) => return TransferResult::Timeout(self.timeout),
        };

        if output.status.success() {
            return TransferResult::Ok;
        }

        let diagnostics = combine_output(&output.stdout, &output.stderr);
        match output.status.code() {
            Some(SSH_TRANSPORT_FAILURE) => TransferResult::ConnectionFailed(diagnostics),
            exit_code => TransferResult::CopyError {
                exit_code,
                diagnostics,
            },
        }
    }

    fn scp_args(&self, target: &RemoteTarget) -> Vec<String> {
        vec![
            "-B".to_string(),
            "-p".to_string(),
            "-r".to_string(),
            "-i".to_string(),
            target.private_key().display().to_string(),
            "-P".to_string(),
            target.ssh_port().to_string(),
            "-o".to_string(),
            "ConnectTimeout=5".to_string(),
        ]
    }
}

fn top_level_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_error_display_includes_code_and_text() {
        let result = TransferResult::CopyError {
            exit_code: Some(2),
            diagnostics: "permission denied".to_string(),
        };
        let text = result.to_string();
        assert!(text.contains('2'));
        assert!(text.contains("permission denied"));
    }
}
