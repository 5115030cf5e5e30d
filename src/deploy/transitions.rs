// ABOUTME: State transition methods for a deployment run.
// ABOUTME: Each method consumes the run and returns the next state or the error that ends it.

use crate::project::launch_args::{self, LaunchArgs};
use crate::project::DeploymentContext;

use super::error::DeployError;
use super::orchestrator::Orchestrator;
use super::stage::Stage;
use super::state::{Built, Connected, Done, Idle, Prepared, Resolved, Transferred};

/// Command used to check the remote host answers at all.
pub const PROBE_COMMAND: &str = "echo hello";

/// A run in progress, parameterized by its current state.
pub struct Run<'a, S> {
    orchestrator: &'a Orchestrator,
    state: S,
}

impl<'a, S> Run<'a, S> {
    fn advance<T>(self, state: T) -> Run<'a, T> {
        Run {
            orchestrator: self.orchestrator,
            state,
        }
    }
}

// =============================================================================
// Idle -> Connected
// =============================================================================

impl<'a> Run<'a, Idle> {
    pub(crate) fn new(orchestrator: &'a Orchestrator) -> Self {
        Run {
            orchestrator,
            state: Idle,
        }
    }

    /// Probe the remote host. Nothing else touches the remote before this succeeds.
    pub async fn check_connectivity(self) -> Result<Run<'a, Connected>, DeployError> {
        let orch = self.orchestrator;
        orch.enter(Stage::CheckingConnectivity);

        orch.executor()
            .run(PROBE_COMMAND, orch.settings().command_timeout)
            .await
            .map_err(|source| DeployError::ConnectionRefused {
                host: orch.target().host().to_string(),
                source,
            })?;

        Ok(self.advance(Connected))
    }
}

// =============================================================================
// Connected -> Resolved
// =============================================================================

impl<'a> Run<'a, Connected> {
    pub fn resolve_project(self) -> Result<Run<'a, Resolved>, DeployError> {
        let orch = self.orchestrator;
        orch.enter(Stage::ResolvingProject);

        let project = orch
            .project_model()
            .startup_project()
            .ok_or(DeployError::NoStartupProject)?;
        tracing::info!(project = %project.name, path = %project.full_path.display(), "resolved startup project");

        Ok(self.advance(Resolved { project }))
    }
}

// =============================================================================
// Resolved -> Prepared
// =============================================================================

impl<'a> Run<'a, Resolved> {
    pub fn project_name(&self) -> &str {
        &self.state.project.name
    }

    /// Capture the run's context, then create and clean the remote directories.
    pub async fn prepare_remote(self) -> Result<Run<'a, Prepared>, DeployError> {
        let orch = self.orchestrator;
        orch.enter(Stage::PreparingRemote);

        let settings = orch.settings();
        let args = if settings.use_command_line_args {
            self.command_line_args()
        } else {
            None
        };
        let ctx = DeploymentContext::capture(&self.state.project, args, settings.include_wwwroot);

        orch.preparer()
            .prepare(orch.target())
            .await
            .map_err(DeployError::RemoteSetup)?;

        Ok(self.advance(Prepared { ctx }))
    }

    fn command_line_args(&self) -> Option<String> {
        let orch = self.orchestrator;
        let scan = launch_args::scan(self.state.project.solution_dir());

        for (file, reason) in &scan.unreadable {
            orch.warn(format!(
                "ignoring unreadable {}: {}",
                file.display(),
                reason
            ));
        }

        match scan.resolve() {
            LaunchArgs::None => None,
            LaunchArgs::Single(args) => {
                tracing::debug!("forwarding command line arguments: {}", args);
                Some(args)
            }
            LaunchArgs::Ambiguous(occurrences) => {
                let files: Vec<String> = occurrences
                    .iter()
                    .map(|o| o.file.display().to_string())
                    .collect();
                orch.warn(format!(
                    "found {} commandLineArgs entries ({}); starting without arguments",
                    occurrences.len(),
                    files.join(", ")
                ));
                None
            }
        }
    }
}

// =============================================================================
// Prepared -> Built
// =============================================================================

impl<'a> Run<'a, Prepared> {
    /// Build and wait for the outcome. Event callbacks are released before this returns.
    pub async fn build(self) -> Result<Run<'a, Built>, DeployError> {
        let orch = self.orchestrator;
        orch.enter(Stage::Building);

        let trigger = orch.build_trigger();
        tracing::info!(strategy = %trigger.strategy(), "building {}", self.state.ctx.project_name());

        let pending = trigger.start(&self.state.ctx).await?;
        let outcome = pending.outcome(orch.settings().build_timeout).await?;
        if !outcome.is_success() {
            return Err(DeployError::from_outcome(outcome));
        }

        let Prepared { ctx } = self.state;
        Ok(Run {
            orchestrator: orch,
            state: Built { ctx },
        })
    }
}

// =============================================================================
// Built -> Transferred
// =============================================================================

impl<'a> Run<'a, Built> {
    pub async fn transfer(self) -> Result<Run<'a, Transferred>, DeployError> {
        let orch = self.orchestrator;
        orch.enter(Stage::Transferring);

        let target = orch.target();
        let ctx = &self.state.ctx;
        let transfer = orch.artifact_transfer();

        let result = transfer
            .transfer(ctx.output_dir(), target.debug_dir(), target)
            .await;
        if !result.is_ok() {
            return Err(DeployError::Transfer(result));
        }

        if let Some(wwwroot) = ctx.wwwroot_dir() {
            let remote = format!("{}/wwwroot", target.debug_dir());
            let result = transfer.transfer(wwwroot, &remote, target).await;
            if !result.is_ok() {
                return Err(DeployError::Transfer(result));
            }
        }

        let Built { ctx } = self.state;
        Ok(Run {
            orchestrator: orch,
            state: Transferred { ctx },
        })
    }
}

// =============================================================================
// Transferred -> Done
// =============================================================================

impl<'a> Run<'a, Transferred> {
    /// Start the debug session, or stop here when debugging is disabled.
    pub async fn launch(self) -> Result<Run<'a, Done>, DeployError> {
        let orch = self.orchestrator;

        if orch.settings().no_debug {
            tracing::info!("deployed without debugging");
            let Transferred { ctx } = self.state;
            return Ok(Run {
                orchestrator: orch,
                state: Done {
                    ctx,
                    launched: false,
                },
            });
        }

        orch.enter(Stage::Launching);
        orch.launcher().launch(&self.state.ctx, orch.target()).await?;

        let Transferred { ctx } = self.state;
        Ok(Run {
            orchestrator: orch,
            state: Done {
                ctx,
                launched: true,
            },
        })
    }
}

impl Run<'_, Done> {
    pub fn finish(self) -> RunReport {
        self.orchestrator.enter(Stage::Done);
        let Done { ctx, launched } = self.state;
        RunReport {
            project: ctx.project_name().to_string(),
            remote_dir: self.orchestrator.target().debug_dir().to_string(),
            launched,
        }
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub project: String,
    pub remote_dir: String,
    /// False when the run stopped after transfer because debugging was disabled.
    pub launched: bool,
}
