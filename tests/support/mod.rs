// ABOUTME: Test support utilities.
// ABOUTME: Fake remote executor, project model, build trigger, adapter, and stand-in scripts.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use rdeploy::build::{BuildError, BuildOutcome, BuildStrategy, BuildTrigger, PendingBuild};
use rdeploy::launch::{DebugAdapter, LaunchError};
use rdeploy::project::{DeploymentContext, ProjectMetadata, ProjectModel};
use rdeploy::remote::RemoteTarget;
use rdeploy::ssh::{ConnectionError, RemoteExecutor};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Once;
use std::time::Duration;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("rdeploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Records every remote command; fails the ones matching `fail_on`.
#[derive(Default)]
pub struct RecordingExecutor {
    commands: Mutex<Vec<String>>,
    fail_on: Option<String>,
    machine: Option<String>,
}

impl RecordingExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_on(pattern: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_on: Some(pattern.to_string()),
            ..Self::default()
        })
    }

    pub fn with_machine(machine: &str) -> Arc<Self> {
        Arc::new(Self {
            machine: Some(machine.to_string()),
            ..Self::default()
        })
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().clone()
    }
}

#[async_trait]
impl RemoteExecutor for RecordingExecutor {
    async fn run(&self, command: &str, _timeout: Duration) -> Result<String, ConnectionError> {
        self.commands.lock().push(command.to_string());

        if let Some(pattern) = &self.fail_on
            && command.contains(pattern.as_str())
        {
            return Err(ConnectionError::Connection("connection refused".to_string()));
        }
        if command == "echo hello" {
            return Ok("hello".to_string());
        }
        if command == "uname -m" {
            return Ok(self.machine.clone().unwrap_or_else(|| "aarch64".to_string()));
        }
        if command.starts_with("if [ -x") {
            return Ok("present".to_string());
        }
        Ok(String::new())
    }
}

/// Project model returning a fixed answer.
pub struct FixedProject(pub Option<ProjectMetadata>);

impl ProjectModel for FixedProject {
    fn startup_project(&self) -> Option<ProjectMetadata> {
        self.0.clone()
    }
}

/// Build trigger that returns a fixed outcome and counts starts.
pub struct FixedBuild {
    outcome: BuildOutcome,
    started: Mutex<Vec<DeploymentContext>>,
}

impl FixedBuild {
    pub fn new(outcome: BuildOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            started: Mutex::new(Vec::new()),
        })
    }

    pub fn starts(&self) -> Vec<DeploymentContext> {
        self.started.lock().clone()
    }
}

#[async_trait]
impl BuildTrigger for FixedBuild {
    fn strategy(&self) -> BuildStrategy {
        BuildStrategy::Publish
    }

    async fn start(&self, ctx: &DeploymentContext) -> Result<PendingBuild, BuildError> {
        self.started.lock().push(ctx.clone());
        Ok(PendingBuild::ready(self.outcome.clone()))
    }
}

/// Debug adapter that keeps a copy of every descriptor it receives.
#[derive(Default)]
pub struct RecordingAdapter {
    descriptors: Mutex<Vec<serde_json::Value>>,
}

impl RecordingAdapter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn descriptors(&self) -> Vec<serde_json::Value> {
        self.descriptors.lock().clone()
    }
}

#[async_trait]
impl DebugAdapter for RecordingAdapter {
    async fn launch(&self, descriptor: &Path) -> Result<(), LaunchError> {
        let content = std::fs::read_to_string(descriptor).unwrap();
        self.descriptors
            .lock()
            .push(serde_json::from_str(&content).unwrap());
        Ok(())
    }
}

/// A project laid out on disk with a populated build output directory.
pub struct ProjectFixture {
    pub dir: tempfile::TempDir,
    pub metadata: ProjectMetadata,
}

impl ProjectFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let project_dir = dir.path().join("App");
        let output = project_dir.join("bin/Debug/net8.0");
        std::fs::create_dir_all(&output).unwrap();
        std::fs::write(project_dir.join("App.csproj"), "<Project></Project>").unwrap();
        std::fs::write(output.join("App.dll"), b"MZ").unwrap();
        std::fs::write(output.join("App.runtimeconfig.json"), "{}").unwrap();

        let metadata = ProjectMetadata {
            full_path: project_dir.join("App.csproj"),
            name: "App".to_string(),
            assembly_name: "App".to_string(),
            active_configuration_name: "Debug".to_string(),
            output_relative_path: PathBuf::from("bin/Debug/net8.0"),
            solution_path: None,
        };
        Self { dir, metadata }
    }

    pub fn project_dir(&self) -> PathBuf {
        self.dir.path().join("App")
    }

    /// Add a launchSettings.json with the given commandLineArgs under `subdir`.
    pub fn add_launch_settings(&self, subdir: &str, args: &str) {
        let props = self.project_dir().join(subdir);
        std::fs::create_dir_all(&props).unwrap();
        let json = serde_json::json!({
            "profiles": { "App": { "commandName": "Project", "commandLineArgs": args } }
        });
        std::fs::write(props.join("launchSettings.json"), json.to_string()).unwrap();
    }
}

pub fn target() -> RemoteTarget {
    RemoteTarget::new("pi.local", "pi", "/srv/app", "/keys/id_rsa")
}

/// Write an executable shell script standing in for scp, dotnet, or an adapter.
#[cfg(unix)]
pub fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}
