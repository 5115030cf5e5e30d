// ABOUTME: The deployment orchestrator: owns the collaborators and drives one run at a time.
// ABOUTME: Progress and warnings are published as DeployEvents on an mpsc channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::error::DeployError;
use super::events::DeployEvent;
use super::guard::{RunGuard, RunPermit};
use super::stage::Stage;
use super::transitions::{Run, RunReport};
use crate::build::BuildTrigger;
use crate::launch::DebugLauncher;
use crate::project::ProjectModel;
use crate::remote::{PrepareOptions, RemotePreparer, RemoteTarget};
use crate::ssh::RemoteExecutor;
use crate::transfer::{ArtifactTransfer, DEFAULT_TRANSFER_TIMEOUT};

const EVENT_BUFFER: usize = 256;

/// Per-orchestrator behavior switches and limits.
#[derive(Debug, Clone)]
pub struct DeploySettings {
    /// Stop after transfer without starting a debug session.
    pub no_debug: bool,
    /// Scan launchSettings.json files for arguments to forward.
    pub use_command_line_args: bool,
    /// Also copy the project's wwwroot folder.
    pub include_wwwroot: bool,
    pub prepare: PrepareOptions,
    pub scp_program: String,
    /// Limit for the probe and other short remote commands.
    pub command_timeout: Duration,
    pub build_timeout: Duration,
    pub transfer_timeout: Duration,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            no_debug: false,
            use_command_line_args: true,
            include_wwwroot: false,
            prepare: PrepareOptions::default(),
            scp_program: "scp".to_string(),
            command_timeout: Duration::from_secs(30),
            build_timeout: Duration::from_secs(600),
            transfer_timeout: DEFAULT_TRANSFER_TIMEOUT,
        }
    }
}

/// Sequences connectivity check, project resolution, remote preparation, build,
/// transfer, and debug launch for a single [`RemoteTarget`].
pub struct Orchestrator {
    target: RemoteTarget,
    settings: DeploySettings,
    executor: Arc<dyn RemoteExecutor>,
    project_model: Arc<dyn ProjectModel>,
    build: Arc<dyn BuildTrigger>,
    preparer: RemotePreparer,
    transfer: ArtifactTransfer,
    launcher: DebugLauncher,
    guard: RunGuard,
    events_tx: mpsc::Sender<DeployEvent>,
    events_rx: Option<mpsc::Receiver<DeployEvent>>,
}

impl Orchestrator {
    pub fn new(
        target: RemoteTarget,
        settings: DeploySettings,
        executor: Arc<dyn RemoteExecutor>,
        project_model: Arc<dyn ProjectModel>,
        build: Arc<dyn BuildTrigger>,
        launcher: DebugLauncher,
    ) -> Self {
        let preparer = RemotePreparer::new(Arc::clone(&executor), settings.prepare);
        let transfer = ArtifactTransfer::new(Arc::clone(&executor))
            .scp_program(&settings.scp_program)
            .timeout(settings.transfer_timeout);
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);

        Self {
            target,
            settings,
            executor,
            project_model,
            build,
            preparer,
            transfer,
            launcher,
            guard: RunGuard::new(),
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<DeployEvent>> {
        self.events_rx.take()
    }

    /// Run the whole pipeline once. A second call while a run is active is refused.
    pub async fn run(&self) -> Result<RunReport, DeployError> {
        let permit = match self.guard.acquire() {
            Ok(permit) => permit,
            Err(e) => {
                self.fail(&e);
                return Err(e);
            }
        };

        let result = self.drive(&permit).await;
        match &result {
            Ok(report) => {
                tracing::info!(project = %report.project, launched = report.launched, "deployment complete");
                self.emit(DeployEvent::Completed {
                    launched: report.launched,
                });
            }
            Err(e) => self.fail(e),
        }
        result
    }

    async fn drive(&self, permit: &RunPermit<'_>) -> Result<RunReport, DeployError> {
        let resolved = Run::new(self)
            .check_connectivity()
            .await?
            .resolve_project()?;
        permit.set_project(resolved.project_name());

        let report = resolved
            .prepare_remote()
            .await?
            .build()
            .await?
            .transfer()
            .await?
            .launch()
            .await?
            .finish();
        Ok(report)
    }

    pub fn target(&self) -> &RemoteTarget {
        &self.target
    }

    pub fn settings(&self) -> &DeploySettings {
        &self.settings
    }

    pub(crate) fn executor(&self) -> &dyn RemoteExecutor {
        self.executor.as_ref()
    }

    pub(crate) fn project_model(&self) -> &dyn ProjectModel {
        self.project_model.as_ref()
    }

    pub(crate) fn build_trigger(&self) -> &dyn BuildTrigger {
        self.build.as_ref()
    }

    pub(crate) fn preparer(&self) -> &RemotePreparer {
        &self.preparer
    }

    pub(crate) fn artifact_transfer(&self) -> &ArtifactTransfer {
        &self.transfer
    }

    pub(crate) fn launcher(&self) -> &DebugLauncher {
        &self.launcher
    }

    pub(crate) fn enter(&self, stage: Stage) {
        tracing::info!("{}", stage);
        self.emit(DeployEvent::StageEntered { stage });
    }

    pub(crate) fn warn(&self, message: String) {
        tracing::warn!("{}", message);
        self.emit(DeployEvent::Warning { message });
    }

    fn fail(&self, error: &DeployError) {
        let stage = error.stage();
        tracing::error!(%stage, "deployment failed: {}", error);
        self.emit(DeployEvent::Failed {
            stage,
            message: error.to_string(),
        });
    }

    // Never blocks the pipeline; events are dropped when nobody is listening.
    fn emit(&self, event: DeployEvent) {
        if let Err(e) = self.events_tx.try_send(event) {
            tracing::trace!("deploy event not delivered: {}", e);
        }
    }
}
