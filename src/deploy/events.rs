// ABOUTME: Progress events emitted by the orchestrator during a run.

use serde::Serialize;

use super::stage::Stage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DeployEvent {
    StageEntered { stage: Stage },
    /// Non-fatal problem; the run continues.
    Warning { message: String },
    Failed { stage: Stage, message: String },
    Completed { launched: bool },
}
