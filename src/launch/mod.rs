// ABOUTME: Debug session launcher: writes the session descriptor and hands it to an adapter.
// ABOUTME: The descriptor lives in a temp file that is removed right after hand-off.

mod adapter;
mod descriptor;
mod error;

use std::io::Write;
use std::sync::Arc;

use snafu::ResultExt;

pub use adapter::{CommandAdapter, DESCRIPTOR_PLACEHOLDER, DebugAdapter};
pub use descriptor::{LaunchConfiguration, SessionDescriptor};
pub use error::{LaunchError, LaunchErrorKind};

use crate::project::DeploymentContext;
use crate::remote::RemoteTarget;
use error::{SerializeSnafu, WriteDescriptorSnafu};

pub struct DebugLauncher {
    adapter: Arc<dyn DebugAdapter>,
    ssh_program: String,
}

impl DebugLauncher {
    pub fn new(adapter: Arc<dyn DebugAdapter>) -> Self {
        Self {
            adapter,
            ssh_program: "ssh".to_string(),
        }
    }

    /// Program the descriptor names as the pipe to the remote debugger.
    pub fn ssh_program(mut self, program: impl Into<String>) -> Self {
        self.ssh_program = program.into();
        self
    }

    pub async fn launch(
        &self,
        ctx: &DeploymentContext,
        target: &RemoteTarget,
    ) -> Result<(), LaunchError> {
        let descriptor = SessionDescriptor::new(ctx, target, &self.ssh_program);
        let json = descriptor.to_json().context(SerializeSnafu)?;

        let mut file = tempfile::Builder::new()
            .prefix("rdeploy-launch-")
            .suffix(".json")
            .tempfile()
            .context(WriteDescriptorSnafu)?;
        file.write_all(json.as_bytes())
            .and_then(|()| file.flush())
            .context(WriteDescriptorSnafu)?;

        tracing::debug!("session descriptor written to {}", file.path().display());
        let result = self.adapter.launch(file.path()).await;

        if let Err(e) = file.close() {
            tracing::warn!("failed to remove session descriptor: {}", e);
        }
        result
    }
}
