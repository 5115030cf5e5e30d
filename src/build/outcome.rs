// ABOUTME: Build outcome and build trigger errors.
// ABOUTME: BuildOutcome is the single value both build variants produce.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::ssh::ConnectionError;
use crate::types::RuntimeIdError;

/// How a build for the tracked project ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Succeeded,
    /// A project failed to compile. `output` holds the compiler diagnostics, if any.
    FailedCompile { project: String, output: String },
    /// The external publish process exited non-zero.
    FailedPublish {
        exit_code: Option<i32>,
        output: String,
    },
    /// The build finished without a successful event for the tracked project.
    ProjectMismatch { tracked: String },
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Succeeded)
    }
}

impl fmt::Display for BuildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildOutcome::Succeeded => write!(f, "build succeeded"),
            BuildOutcome::FailedCompile { project, output } if output.is_empty() => {
                write!(f, "build for project {} failed", project)
            }
            BuildOutcome::FailedCompile { project, output } => {
                write!(f, "build for project {} failed:\n{}", project, output)
            }
            BuildOutcome::FailedPublish {
                exit_code: Some(code),
                output,
            } => write!(f, "publish exited with code {}: {}", code, output),
            BuildOutcome::FailedPublish {
                exit_code: None,
                output,
            } => write!(f, "publish was terminated: {}", output),
            BuildOutcome::ProjectMismatch { tracked } => write!(
                f,
                "build finished without a successful result for {}",
                tracked
            ),
        }
    }
}

/// Errors that stop a build from producing an outcome at all.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not detect remote architecture: {0}")]
    Remote(#[from] ConnectionError),

    #[error(transparent)]
    Architecture(#[from] RuntimeIdError),

    #[error("build event callbacks are already registered by another run")]
    AlreadyRegistered,

    #[error("build event source stopped before reporting completion")]
    SourceClosed,

    #[error("build did not complete within {0:?}")]
    Timeout(Duration),
}
