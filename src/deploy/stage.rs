// ABOUTME: Runtime view of the deployment pipeline position.
// ABOUTME: Used for progress events, error attribution, and JSON output.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    CheckingConnectivity,
    ResolvingProject,
    PreparingRemote,
    Building,
    Transferring,
    Launching,
    Done,
}

impl Stage {
    /// Stages a fully successful run passes through, in order.
    pub const PIPELINE: [Stage; 7] = [
        Stage::CheckingConnectivity,
        Stage::ResolvingProject,
        Stage::PreparingRemote,
        Stage::Building,
        Stage::Transferring,
        Stage::Launching,
        Stage::Done,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::CheckingConnectivity => "checking connectivity",
            Stage::ResolvingProject => "resolving project",
            Stage::PreparingRemote => "preparing remote",
            Stage::Building => "building",
            Stage::Transferring => "transferring",
            Stage::Launching => "launching",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}
