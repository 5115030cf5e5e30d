// ABOUTME: Remote machine description and filesystem preparation.
// ABOUTME: Exports RemoteTarget, the preparer, and shell quoting helpers.

mod prepare;
pub mod shell;
mod target;

pub use prepare::{PrepareOptions, RemotePreparer, VSDBG_BOOTSTRAP_URL};
pub use target::RemoteTarget;
