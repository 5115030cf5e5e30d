// ABOUTME: SSH client module for remote server connections.
// ABOUTME: Key-based authentication with known_hosts verification and a per-call executor.

mod client;
mod error;
mod executor;

pub use client::{CommandOutput, DEFAULT_CONNECT_TIMEOUT, Session, SessionConfig};
pub use error::{ConnectionError, Result};
pub use executor::{RemoteExecutor, SshExecutor};
