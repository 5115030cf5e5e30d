// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports the orchestrator, run states, events, and errors.

mod error;
mod events;
mod guard;
mod orchestrator;
mod stage;
mod state;
mod transitions;

pub use error::{DeployError, DeployErrorKind};
pub use events::DeployEvent;
pub use guard::{ActiveRun, RunGuard, RunPermit};
pub use orchestrator::{DeploySettings, Orchestrator};
pub use stage::Stage;
pub use state::{Built, Connected, Done, Idle, Prepared, Resolved, Transferred};
pub use transitions::{PROBE_COMMAND, Run, RunReport};
