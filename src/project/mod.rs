// ABOUTME: Project model: startup project discovery and the per-run context snapshot.
// ABOUTME: Also scrapes launch arguments from launchSettings.json files.

mod context;
mod csproj;
pub mod launch_args;
mod model;

pub use context::DeploymentContext;
pub use csproj::ProjectProperties;
pub use launch_args::{LaunchArgs, LaunchArgsScan};
pub use model::{ProjectDiscovery, ProjectMetadata, ProjectModel};
