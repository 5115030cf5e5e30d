// ABOUTME: Error types for deployment runs.
// ABOUTME: Every variant is attributed to the pipeline stage that produced it.

use chrono::{DateTime, Utc};

use super::stage::Stage;
use crate::build::{BuildError, BuildOutcome};
use crate::launch::LaunchError;
use crate::ssh::ConnectionError;
use crate::transfer::TransferResult;

/// Errors that end a deployment run.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The reachability probe failed.
    #[error("cannot reach {host}: {source}")]
    ConnectionRefused {
        host: String,
        #[source]
        source: ConnectionError,
    },

    /// Nothing to deploy.
    #[error(
        "no startup project found; set `project` in rdeploy.yml or run from a directory with a single .csproj"
    )]
    NoStartupProject,

    #[error("failed to prepare remote directories: {0}")]
    RemoteSetup(#[source] ConnectionError),

    /// Compile or publish failure.
    #[error("{0}")]
    BuildFailed(BuildOutcome),

    #[error("build finished without a successful result for {tracked}")]
    ProjectMismatch { tracked: String },

    /// The build could not be started or awaited.
    #[error("build did not complete: {0}")]
    Build(#[from] BuildError),

    #[error("failed to copy artifacts: {0}")]
    Transfer(TransferResult),

    #[error("failed to launch debug session: {0}")]
    Launch(#[from] LaunchError),

    #[error("a deployment{} is already running (started {started_at})", project_label(.project))]
    RunInProgress {
        project: Option<String>,
        started_at: DateTime<Utc>,
    },
}

fn project_label(project: &Option<String>) -> String {
    project
        .as_deref()
        .map(|p| format!(" of {p}"))
        .unwrap_or_default()
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    ConnectionRefused,
    /// A user-input problem rather than an infrastructure one.
    NoStartupProject,
    RemoteSetup,
    BuildFailed,
    ProjectMismatch,
    Build,
    Transfer,
    Launch,
    RunInProgress,
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::ConnectionRefused { .. } => DeployErrorKind::ConnectionRefused,
            DeployError::NoStartupProject => DeployErrorKind::NoStartupProject,
            DeployError::RemoteSetup(_) => DeployErrorKind::RemoteSetup,
            DeployError::BuildFailed(_) => DeployErrorKind::BuildFailed,
            DeployError::ProjectMismatch { .. } => DeployErrorKind::ProjectMismatch,
            DeployError::Build(_) => DeployErrorKind::Build,
            DeployError::Transfer(_) => DeployErrorKind::Transfer,
            DeployError::Launch(_) => DeployErrorKind::Launch,
            DeployError::RunInProgress { .. } => DeployErrorKind::RunInProgress,
        }
    }

    /// The stage the run was in when this error ended it.
    pub fn stage(&self) -> Stage {
        match self {
            DeployError::ConnectionRefused { .. } => Stage::CheckingConnectivity,
            DeployError::NoStartupProject => Stage::ResolvingProject,
            DeployError::RemoteSetup(_) => Stage::PreparingRemote,
            DeployError::BuildFailed(_)
            | DeployError::ProjectMismatch { .. }
            | DeployError::Build(_) => Stage::Building,
            DeployError::Transfer(_) => Stage::Transferring,
            DeployError::Launch(_) => Stage::Launching,
            DeployError::RunInProgress { .. } => Stage::Idle,
        }
    }

    /// Map a non-successful build outcome to its error.
    pub(crate) fn from_outcome(outcome: BuildOutcome) -> Self {
        match outcome {
            BuildOutcome::ProjectMismatch { tracked } => DeployError::ProjectMismatch { tracked },
            other => DeployError::BuildFailed(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_outcome_maps_to_its_own_variant() {
        let err = DeployError::from_outcome(BuildOutcome::ProjectMismatch {
            tracked: "App.csproj".to_string(),
        });
        assert_eq!(err.kind(), DeployErrorKind::ProjectMismatch);
        assert_eq!(err.stage(), Stage::Building);
    }

    #[test]
    fn transfer_message_keeps_diagnostics() {
        let err = DeployError::Transfer(TransferResult::CopyError {
            exit_code: Some(2),
            diagnostics: "scp: /srv/app/debug/: permission denied".to_string(),
        });
        let message = err.to_string();
        assert!(message.contains("permission denied"));
        assert!(message.contains('2'));
        assert_eq!(err.stage(), Stage::Transferring);
    }

    #[test]
    fn run_in_progress_names_project_when_known() {
        let err = DeployError::RunInProgress {
            project: Some("App".to_string()),
            started_at: Utc::now(),
        };
        assert!(err.to_string().contains("deployment of App is already running"));
    }
}
