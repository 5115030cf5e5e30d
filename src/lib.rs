// ABOUTME: Library root for rdeploy - exposes the pipeline and its collaborators.
// ABOUTME: The main binary is in main.rs.

pub mod build;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod launch;
pub mod output;
pub mod process;
pub mod project;
pub mod remote;
pub mod ssh;
pub mod transfer;
pub mod types;
