// ABOUTME: Hand-off of a session descriptor to whatever starts the debug adapter.
// ABOUTME: CommandAdapter runs a configured command with the descriptor path substituted.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use snafu::{OptionExt, ResultExt, ensure};
use tokio::process::Command;

use super::error::{AdapterExitSnafu, AdapterSpawnSnafu, EmptyCommandSnafu, LaunchError};
use crate::process::combine_output;

/// Placeholder replaced by the descriptor path in adapter command arguments.
pub const DESCRIPTOR_PLACEHOLDER: &str = "{descriptor}";

#[async_trait]
pub trait DebugAdapter: Send + Sync {
    /// Start a debug session from the descriptor at `descriptor`. The file is
    /// deleted once this returns.
    async fn launch(&self, descriptor: &Path) -> Result<(), LaunchError>;
}

/// Runs `program args...`, replacing `{descriptor}` in any argument.
/// When no argument carries the placeholder the path is appended.
#[derive(Debug, Clone)]
pub struct CommandAdapter {
    command: Vec<String>,
}

impl CommandAdapter {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    fn resolve(&self, descriptor: &Path) -> Result<(PathBuf, Vec<String>), LaunchError> {
        let (program, args) = self.command.split_first().context(EmptyCommandSnafu)?;
        let path = descriptor.display().to_string();

        let mut substituted = false;
        let mut resolved: Vec<String> = args
            .iter()
            .map(|arg| {
                if arg.contains(DESCRIPTOR_PLACEHOLDER) {
                    substituted = true;
                    arg.replace(DESCRIPTOR_PLACEHOLDER, &path)
                } else {
                    arg.clone()
                }
            })
            .collect();
        if !substituted {
            resolved.push(path);
        }

        Ok((PathBuf::from(program), resolved))
    }
}

#[async_trait]
impl DebugAdapter for CommandAdapter {
    async fn launch(&self, descriptor: &Path) -> Result<(), LaunchError> {
        let (program, args) = self.resolve(descriptor)?;
        tracing::debug!("starting debug adapter {} {:?}", program.display(), args);

        let output = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .context(AdapterSpawnSnafu { program })?;

        ensure!(
            output.status.success(),
            AdapterExitSnafu {
                code: output.status.code(),
                output: combine_output(&output.stdout, &output.stderr),
            }
        );
        Ok(())
    }
}
