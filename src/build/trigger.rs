// ABOUTME: BuildTrigger trait shared by the publish and IDE build variants.
// ABOUTME: PendingBuild is awaited by the orchestrator with a timeout.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::events::Registration;
use super::outcome::{BuildError, BuildOutcome};
use crate::project::DeploymentContext;

/// Which build variant a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStrategy {
    /// External publish process for the remote runtime identifier.
    Publish,
    /// IDE build observed through build events.
    Ide,
}

impl BuildStrategy {
    pub fn from_publish_flag(publish: bool) -> Self {
        if publish {
            BuildStrategy::Publish
        } else {
            BuildStrategy::Ide
        }
    }
}

impl std::fmt::Display for BuildStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildStrategy::Publish => write!(f, "publish"),
            BuildStrategy::Ide => write!(f, "ide"),
        }
    }
}

/// Starts a build and hands back something to await for its outcome.
#[async_trait]
pub trait BuildTrigger: Send + Sync {
    fn strategy(&self) -> BuildStrategy;

    async fn start(&self, ctx: &DeploymentContext) -> Result<PendingBuild, BuildError>;
}

/// A started build.
#[derive(Debug)]
pub enum PendingBuild {
    /// The outcome is already known.
    Ready(BuildOutcome),
    /// Waiting on build events; the registration is released when this resolves.
    Waiting {
        registration: Registration,
        receiver: oneshot::Receiver<BuildOutcome>,
    },
}

impl PendingBuild {
    pub fn ready(outcome: BuildOutcome) -> Self {
        PendingBuild::Ready(outcome)
    }

    pub fn waiting(registration: Registration, receiver: oneshot::Receiver<BuildOutcome>) -> Self {
        PendingBuild::Waiting {
            registration,
            receiver,
        }
    }

    /// Wait for the outcome. Event callbacks are detached on every path out of here.
    pub async fn outcome(self, timeout: Duration) -> Result<BuildOutcome, BuildError> {
        match self {
            PendingBuild::Ready(outcome) => Ok(outcome),
            PendingBuild::Waiting {
                registration,
                receiver,
            } => {
                let result = tokio::time::timeout(timeout, receiver).await;
                registration.release();
                match result {
                    Ok(Ok(outcome)) => Ok(outcome),
                    Ok(Err(_)) => Err(BuildError::SourceClosed),
                    Err(_) => Err(BuildError::Timeout(timeout)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::events::{BuildEventHandler, BuildEvents, ProjectConfigDone};
    use crate::build::{BuildAction, BuildScope};
    use std::sync::Arc;

    struct Silent;

    impl BuildEventHandler for Silent {
        fn on_project_config_done(&self, _event: &ProjectConfigDone) {}
        fn on_build_done(&self, _scope: BuildScope, _action: BuildAction) {}
    }

    #[tokio::test]
    async fn timeout_releases_registration() {
        let events = BuildEvents::new();
        let registration = events.register(|_| Arc::new(Silent)).unwrap();
        let (_tx, rx) = oneshot::channel();

        let result = PendingBuild::waiting(registration, rx)
            .outcome(Duration::from_millis(20))
            .await;

        assert!(matches!(result, Err(BuildError::Timeout(_))));
        assert!(!events.is_registered());
    }

    #[tokio::test]
    async fn dropped_sender_is_source_closed() {
        let events = BuildEvents::new();
        let registration = events.register(|_| Arc::new(Silent)).unwrap();
        let (tx, rx) = oneshot::channel::<BuildOutcome>();
        drop(tx);

        let result = PendingBuild::waiting(registration, rx)
            .outcome(Duration::from_secs(1))
            .await;

        assert!(matches!(result, Err(BuildError::SourceClosed)));
        assert!(!events.is_registered());
    }

    #[test]
    fn publish_flag_selects_strategy() {
        assert_eq!(BuildStrategy::from_publish_flag(true), BuildStrategy::Publish);
        assert_eq!(BuildStrategy::from_publish_flag(false), BuildStrategy::Ide);
    }
}
