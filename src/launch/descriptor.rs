// ABOUTME: Debug session descriptor: how to reach the remote debugger and what to run.
// ABOUTME: Serialized to the launch.json shape understood by debug adapter hosts.

use serde::Serialize;

use crate::project::DeploymentContext;
use crate::project::launch_args::split_args;
use crate::remote::RemoteTarget;

const DESCRIPTOR_VERSION: &str = "0.2.0";
const DEFAULT_SSH_PORT: u16 = 22;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDescriptor {
    pub version: String,
    pub adapter: String,
    pub adapter_args: String,
    pub configurations: Vec<LaunchConfiguration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchConfiguration {
    pub project: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub request: String,
    pub program: String,
    pub args: Vec<String>,
    pub cwd: String,
}

impl SessionDescriptor {
    /// Describe a debug session for the entry assembly in the remote debug dir.
    pub fn new(ctx: &DeploymentContext, target: &RemoteTarget, adapter: &str) -> Self {
        let mut args = vec![format!("./{}.dll", ctx.assembly_name())];
        // `args` is an argv array, so the captured string is split into words
        if let Some(extra) = ctx.command_line_args() {
            args.extend(split_args(extra));
        }

        Self {
            version: DESCRIPTOR_VERSION.to_string(),
            adapter: adapter.to_string(),
            adapter_args: adapter_args(target),
            configurations: vec![LaunchConfiguration {
                project: "default".to_string(),
                kind: "coreclr".to_string(),
                request: "launch".to_string(),
                program: "dotnet".to_string(),
                args,
                cwd: target.debug_dir().to_string(),
            }],
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn adapter_args(target: &RemoteTarget) -> String {
    let mut parts = vec!["-i".to_string(), target.private_key().display().to_string()];
    if target.ssh_port() != DEFAULT_SSH_PORT {
        parts.push("-p".to_string());
        parts.push(target.ssh_port().to_string());
    }
    parts.push(target.login());
    parts.push(target.remote_debugger().to_string());
    parts.push("--interpreter=vscode".to_string());
    parts.join(" ")
}
