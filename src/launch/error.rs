// ABOUTME: Debug launch error types with SNAFU pattern.
// ABOUTME: Covers descriptor serialization, the temp file, and the adapter process.

use std::path::PathBuf;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum LaunchError {
    #[snafu(display("failed to serialize session descriptor: {source}"))]
    Serialize { source: serde_json::Error },

    #[snafu(display("failed to write session descriptor: {source}"))]
    WriteDescriptor { source: std::io::Error },

    #[snafu(display("debug adapter command is empty"))]
    EmptyCommand,

    #[snafu(display("failed to start debug adapter {}: {source}", program.display()))]
    AdapterSpawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("debug adapter exited with code {}: {output}", code.map_or_else(|| "none".to_string(), |c| c.to_string())))]
    AdapterExit { code: Option<i32>, output: String },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchErrorKind {
    /// The descriptor could not be produced.
    Descriptor,
    /// The adapter could not be started or reported failure.
    Adapter,
}

impl LaunchError {
    pub fn kind(&self) -> LaunchErrorKind {
        match self {
            LaunchError::Serialize { .. } | LaunchError::WriteDescriptor { .. } => {
                LaunchErrorKind::Descriptor
            }
            LaunchError::EmptyCommand
            | LaunchError::AdapterSpawn { .. }
            | LaunchError::AdapterExit { .. } => LaunchErrorKind::Adapter,
        }
    }
}
