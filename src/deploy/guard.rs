// ABOUTME: Single-run guard so one orchestrator never runs two deployments at once.
// ABOUTME: The permit records the active run and clears it on drop.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use super::DeployError;

/// Information about the run currently holding the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRun {
    /// Project being deployed, once resolved.
    pub project: Option<String>,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct RunGuard {
    active: Mutex<Option<ActiveRun>>,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the guard, or report the run that already holds it.
    pub fn acquire(&self) -> Result<RunPermit<'_>, DeployError> {
        let mut active = self.active.lock();
        if let Some(run) = active.as_ref() {
            return Err(DeployError::RunInProgress {
                project: run.project.clone(),
                started_at: run.started_at,
            });
        }
        *active = Some(ActiveRun {
            project: None,
            started_at: Utc::now(),
        });
        Ok(RunPermit { guard: self })
    }

    pub fn active(&self) -> Option<ActiveRun> {
        self.active.lock().clone()
    }
}

/// A held run guard that releases on drop.
pub struct RunPermit<'a> {
    guard: &'a RunGuard,
}

impl std::fmt::Debug for RunPermit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunPermit")
            .field("active", &self.guard.active())
            .finish()
    }
}

impl RunPermit<'_> {
    pub fn set_project(&self, project: &str) {
        if let Some(run) = self.guard.active.lock().as_mut() {
            run.project = Some(project.to_string());
        }
    }
}

impl Drop for RunPermit<'_> {
    fn drop(&mut self) {
        self.guard.active.lock().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_refused_until_release() {
        let guard = RunGuard::new();
        let permit = guard.acquire().unwrap();
        permit.set_project("App");

        match guard.acquire() {
            Err(DeployError::RunInProgress { project, .. }) => {
                assert_eq!(project.as_deref(), Some("App"))
            }
            other => panic!("expected RunInProgress, got {:?}", other),
        }

        drop(permit);
        assert!(guard.active().is_none());
        assert!(guard.acquire().is_ok());
    }

    #[test]
    fn started_at_is_recorded() {
        let guard = RunGuard::new();
        let before = Utc::now();
        let _permit = guard.acquire().unwrap();
        let active = guard.active().unwrap();
        assert!(active.started_at >= before);
        assert!(active.project.is_none());
    }
}
