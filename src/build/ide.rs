// ABOUTME: IDE build variant: starts a build and observes it through build events.
// ABOUTME: DotnetBuildSystem drives `dotnet build` and reports per-project results as events.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{ChildStderr, ChildStdout, Command};
use tokio::sync::oneshot;

use super::bridge::EventBridge;
use super::events::{BuildAction, BuildEvents, BuildScope, ProjectConfigDone};
use super::outcome::BuildError;
use crate::process::combine_output;
use super::trigger::{BuildStrategy, BuildTrigger, PendingBuild};
use crate::project::DeploymentContext;
use crate::types::ProjectFileName;

/// The build subsystem that reports through [`BuildEvents`].
#[async_trait]
pub trait BuildSystem: Send + Sync {
    /// Kick off a build of `project_path`. Returns once the build is started;
    /// results arrive as events.
    async fn start_build(&self, configuration: &str, project_path: &Path) -> Result<(), BuildError>;
}

pub struct IdeTrigger {
    events: Arc<BuildEvents>,
    system: Arc<dyn BuildSystem>,
}

impl IdeTrigger {
    pub fn new(events: Arc<BuildEvents>, system: Arc<dyn BuildSystem>) -> Self {
        Self { events, system }
    }
}

#[async_trait]
impl BuildTrigger for IdeTrigger {
    fn strategy(&self) -> BuildStrategy {
        BuildStrategy::Ide
    }

    async fn start(&self, ctx: &DeploymentContext) -> Result<PendingBuild, BuildError> {
        let tracked = ProjectFileName::from_path(&ctx.project_full_path().to_string_lossy());
        let (tx, rx) = oneshot::channel();

        // Callbacks must be attached before the build can emit anything
        let registration = self
            .events
            .register(move |handle| Arc::new(EventBridge::new(tracked, handle, tx)))?;

        tracing::info!(
            project = ctx.project_name(),
            configuration = ctx.build_configuration_name(),
            "starting build"
        );

        if let Err(e) = self
            .system
            .start_build(ctx.build_configuration_name(), ctx.project_full_path())
            .await
        {
            registration.release();
            return Err(e);
        }

        Ok(PendingBuild::waiting(registration, rx))
    }
}

/// Runs `dotnet build` in the background and translates its output into build events.
pub struct DotnetBuildSystem {
    events: Arc<BuildEvents>,
    program: PathBuf,
}

impl DotnetBuildSystem {
    pub fn new(events: Arc<BuildEvents>) -> Self {
        Self {
            events,
            program: PathBuf::from("dotnet"),
        }
    }

    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }
}

#[async_trait]
impl BuildSystem for DotnetBuildSystem {
    async fn start_build(&self, configuration: &str, project_path: &Path) -> Result<(), BuildError> {
        let mut child = Command::new(&self.program)
            .arg("build")
            .arg(project_path)
            .args(["-c", configuration, "-nologo"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| BuildError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let events = Arc::clone(&self.events);
        let configuration = configuration.to_string();
        let project = project_path.to_string_lossy().into_owned();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        tokio::spawn(async move {
            // Drain both pipes together so neither can fill up and stall the build
            let ((reported, stdout), stderr) = tokio::join!(
                scan_stdout(stdout, &events, &configuration),
                read_all(stderr)
            );

            let success = match child.wait().await {
                Ok(status) => status.success(),
                Err(e) => {
                    tracing::warn!("failed waiting for build: {}", e);
                    false
                }
            };

            if !success {
                events.project_config_done(ProjectConfigDone {
                    output: combine_output(&stdout, &stderr),
                    ..project_event(project, &configuration, false)
                });
            } else if !reported {
                events.project_config_done(project_event(project, &configuration, true));
            }
            events.build_done(BuildScope::Project, BuildAction::Build);
        });

        Ok(())
    }
}

/// Read msbuild stdout line by line, reporting every project it says was built.
/// Returns whether anything was reported, plus the raw output.
async fn scan_stdout(
    stdout: Option<ChildStdout>,
    events: &BuildEvents,
    configuration: &str,
) -> (bool, Vec<u8>) {
    let mut reported = false;
    let mut captured = Vec::new();
    let Some(stdout) = stdout else {
        return (reported, captured);
    };

    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("failed reading build output: {}", e);
                break;
            }
        }
        captured.extend_from_slice(&buf);

        // Compiler messages can carry text in the console code page
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\r', '\n']);
        tracing::trace!("{}", line);
        if let Some(name) = built_project(line) {
            reported = true;
            events.project_config_done(project_event(
                format!("{name}.csproj"),
                configuration,
                true,
            ));
        }
    }
    (reported, captured)
}

async fn read_all(stderr: Option<ChildStderr>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut stderr) = stderr
        && let Err(e) = stderr.read_to_end(&mut buf).await
    {
        tracing::warn!("failed reading build errors: {}", e);
    }
    buf
}

fn project_event(project: String, configuration: &str, success: bool) -> ProjectConfigDone {
    ProjectConfigDone {
        project,
        project_config: configuration.to_string(),
        platform: "AnyCPU".to_string(),
        solution_config: configuration.to_string(),
        success,
        output: String::new(),
    }
}

/// Project name from an msbuild output line of the form `  Name -> /path/Name.dll`.
fn built_project(line: &str) -> Option<&str> {
    let (name, path) = line.split_once(" -> ")?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) || path.trim().is_empty() {
        return None;
    }
    Some(name)
}
