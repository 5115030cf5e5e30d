// ABOUTME: Run state marker types for the type state pattern.
// ABOUTME: Each state carries the data that exists once the run has reached it.

use crate::project::{DeploymentContext, ProjectMetadata};

/// Initial state: guard held, nothing checked yet.
/// Available actions: `check_connectivity()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

/// Remote host answered the probe.
/// Available actions: `resolve_project()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Connected;

/// Startup project found.
/// Available actions: `prepare_remote()`
#[derive(Debug, Clone)]
pub struct Resolved {
    pub(crate) project: ProjectMetadata,
}

/// Context captured and remote directories ready.
/// Available actions: `build()`
#[derive(Debug, Clone)]
pub struct Prepared {
    pub(crate) ctx: DeploymentContext,
}

/// Build confirmed successful for the tracked project.
/// Available actions: `transfer()`
#[derive(Debug, Clone)]
pub struct Built {
    pub(crate) ctx: DeploymentContext,
}

/// Artifacts copied to the remote debug directory.
/// Available actions: `launch()`
#[derive(Debug, Clone)]
pub struct Transferred {
    pub(crate) ctx: DeploymentContext,
}

/// Run finished.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Done {
    pub(crate) ctx: DeploymentContext,
    pub(crate) launched: bool,
}
