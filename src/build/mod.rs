// ABOUTME: Build triggers: external publish, or an IDE build observed through events.
// ABOUTME: Both produce a BuildOutcome for the tracked startup project.

mod bridge;
pub mod events;
mod ide;
mod outcome;
mod publish;
mod trigger;

pub use bridge::EventBridge;
pub use events::{
    BuildAction, BuildEventHandler, BuildEvents, BuildScope, ProjectConfigDone, Registration,
    SubscriptionHandle,
};
pub use ide::{BuildSystem, DotnetBuildSystem, IdeTrigger};
pub use outcome::{BuildError, BuildOutcome};
pub use publish::PublishTrigger;
pub use trigger::{BuildStrategy, BuildTrigger, PendingBuild};
