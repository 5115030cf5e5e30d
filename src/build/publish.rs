// ABOUTME: Publish build variant: runs `dotnet publish` for the remote runtime identifier.
// ABOUTME: The architecture is queried with `uname -m` before publishing.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::outcome::{BuildError, BuildOutcome};
use super::trigger::{BuildStrategy, BuildTrigger, PendingBuild};
use crate::process::combine_output;
use crate::project::DeploymentContext;
use crate::ssh::RemoteExecutor;
use crate::types::RuntimeIdentifier;

const ARCH_PROBE_TIMEOUT: Duration = Duration::from_secs(15);

pub struct PublishTrigger {
    executor: Arc<dyn RemoteExecutor>,
    program: PathBuf,
}

impl PublishTrigger {
    pub fn new(executor: Arc<dyn RemoteExecutor>) -> Self {
        Self {
            executor,
            program: PathBuf::from("dotnet"),
        }
    }

    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    async fn remote_runtime(&self) -> Result<RuntimeIdentifier, BuildError> {
        let machine = self.executor.run("uname -m", ARCH_PROBE_TIMEOUT).await?;
        let rid = RuntimeIdentifier::from_machine(&machine)?;
        tracing::debug!(machine = %machine.trim(), rid = %rid, "detected remote runtime");
        Ok(rid)
    }

    fn publish_args(ctx: &DeploymentContext, rid: RuntimeIdentifier) -> Vec<String> {
        vec![
            "publish".to_string(),
            ctx.project_full_path().display().to_string(),
            "-c".to_string(),
            ctx.build_configuration_name().to_string(),
            "-r".to_string(),
            rid.as_str().to_string(),
            "--self-contained".to_string(),
            "false".to_string(),
            "-o".to_string(),
            ctx.output_dir().display().to_string(),
        ]
    }
}

#[async_trait]
impl BuildTrigger for PublishTrigger {
    fn strategy(&self) -> BuildStrategy {
        BuildStrategy::Publish
    }

    async fn start(&self, ctx: &DeploymentContext) -> Result<PendingBuild, BuildError> {
        let rid = self.remote_runtime().await?;

        tracing::info!(
            project = ctx.project_name(),
            configuration = ctx.build_configuration_name(),
            "publishing for {}",
            rid
        );

        let output = Command::new(&self.program)
            .args(Self::publish_args(ctx, rid))
            .current_dir(ctx.solution_dir())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| BuildError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(PendingBuild::ready(BuildOutcome::Succeeded));
        }

        Ok(PendingBuild::ready(BuildOutcome::FailedPublish {
            exit_code: output.status.code(),
            output: combine_output(&output.stdout, &output.stderr),
        }))
    }
}
