// ABOUTME: Turns per-project and build-done callbacks into one BuildOutcome.
// ABOUTME: Success for the tracked project is latched; the outcome is resolved exactly once.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::events::{
    BuildAction, BuildEventHandler, BuildScope, ProjectConfigDone, SubscriptionHandle,
};
use super::outcome::BuildOutcome;
use crate::types::ProjectFileName;

/// Event handler tracking a single project through one IDE build.
pub struct EventBridge {
    tracked: ProjectFileName,
    build_succeeded: AtomicBool,
    subscription: SubscriptionHandle,
    resolve: Mutex<Option<oneshot::Sender<BuildOutcome>>>,
}

impl EventBridge {
    pub fn new(
        tracked: ProjectFileName,
        subscription: SubscriptionHandle,
        resolve: oneshot::Sender<BuildOutcome>,
    ) -> Self {
        Self {
            tracked,
            build_succeeded: AtomicBool::new(false),
            subscription,
            resolve: Mutex::new(Some(resolve)),
        }
    }

    fn finish(&self, outcome: BuildOutcome) {
        self.subscription.release();
        let Some(sender) = self.resolve.lock().take() else {
            return;
        };
        tracing::debug!(tracked = %self.tracked, "build resolved: {}", outcome);
        // The waiting side may have timed out already
        let _ = sender.send(outcome);
    }
}

impl BuildEventHandler for EventBridge {
    fn on_project_config_done(&self, event: &ProjectConfigDone) {
        let name = ProjectFileName::from_path(&event.project);

        if !event.success {
            tracing::warn!(project = %event.project, "project build failed");
            self.finish(BuildOutcome::FailedCompile {
                project: name.as_str().to_string(),
                output: event.output.clone(),
            });
            return;
        }

        if name == self.tracked {
            self.build_succeeded.store(true, Ordering::SeqCst);
        } else {
            tracing::debug!(project = %name, tracked = %self.tracked, "ignoring success for other project");
        }
    }

    fn on_build_done(&self, _scope: BuildScope, _action: BuildAction) {
        let outcome = if self.build_succeeded.load(Ordering::SeqCst) {
            BuildOutcome::Succeeded
        } else {
            BuildOutcome::ProjectMismatch {
                tracked: self.tracked.as_str().to_string(),
            }
        };
        self.finish(outcome);
    }
}
