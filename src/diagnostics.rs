// ABOUTME: Diagnostics accumulator for non-fatal warnings during a command.
// ABOUTME: Collects warnings that shouldn't fail a deployment but should be shown to users.

use crate::deploy::DeployEvent;

/// Collects non-fatal warnings during deployment operations.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Record the warning carried by an orchestrator event, if any.
    pub fn observe(&mut self, event: &DeployEvent) {
        if let DeployEvent::Warning { message } = event {
            self.warnings.push(Warning::deploy(message.clone()));
        }
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// A warning reported by the orchestrator during a run.
    pub fn deploy(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Deploy,
            message: message.into(),
        }
    }

    /// The remote debugger is not installed yet.
    pub fn debugger_missing(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::DebuggerMissing,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Reported by the pipeline (ambiguous launch arguments, unreadable settings files).
    Deploy,
    /// Remote debugger absent; installed on the next deploy unless disabled.
    DebuggerMissing,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::Stage;

    #[test]
    fn diagnostics_starts_empty() {
        let diag = Diagnostics::default();
        assert!(!diag.has_warnings());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn observe_keeps_only_warnings() {
        let mut diag = Diagnostics::default();

        diag.observe(&DeployEvent::StageEntered {
            stage: Stage::Building,
        });
        diag.observe(&DeployEvent::Warning {
            message: "found 2 commandLineArgs entries".to_string(),
        });

        assert_eq!(diag.warnings().len(), 1);
        assert_eq!(diag.warnings()[0].kind, WarningKind::Deploy);
    }

    #[test]
    fn warning_constructors_set_correct_kind() {
        assert_eq!(Warning::deploy("x").kind, WarningKind::Deploy);
        assert_eq!(
            Warning::debugger_missing("x").kind,
            WarningKind::DebuggerMissing
        );
    }
}
