// ABOUTME: Per-run snapshot of the project being deployed.
// ABOUTME: Captured once from the project model and only read afterwards.

use std::path::{Path, PathBuf};

use super::model::ProjectMetadata;

/// Read-only project snapshot owned by a single deployment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentContext {
    project_name: String,
    project_full_path: PathBuf,
    assembly_name: String,
    solution_path: Option<PathBuf>,
    solution_dir: PathBuf,
    build_configuration_name: String,
    output_dir: PathBuf,
    command_line_args: Option<String>,
    wwwroot_dir: Option<PathBuf>,
}

impl DeploymentContext {
    /// Capture the snapshot. Empty `command_line_args` are stored as `None`.
    pub fn capture(
        project: &ProjectMetadata,
        command_line_args: Option<String>,
        include_wwwroot: bool,
    ) -> Self {
        let project_dir = project.project_dir().to_path_buf();
        let wwwroot = project_dir.join("wwwroot");

        Self {
            project_name: project.name.clone(),
            project_full_path: project.full_path.clone(),
            assembly_name: project.assembly_name.clone(),
            solution_path: project.solution_path.clone(),
            solution_dir: project.solution_dir().to_path_buf(),
            build_configuration_name: project.active_configuration_name.clone(),
            output_dir: project_dir.join(&project.output_relative_path),
            command_line_args: command_line_args.filter(|args| !args.trim().is_empty()),
            wwwroot_dir: (include_wwwroot && wwwroot.is_dir()).then_some(wwwroot),
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn project_full_path(&self) -> &Path {
        &self.project_full_path
    }

    pub fn assembly_name(&self) -> &str {
        &self.assembly_name
    }

    pub fn solution_path(&self) -> Option<&Path> {
        self.solution_path.as_deref()
    }

    pub fn solution_dir(&self) -> &Path {
        &self.solution_dir
    }

    pub fn build_configuration_name(&self) -> &str {
        &self.build_configuration_name
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn command_line_args(&self) -> Option<&str> {
        self.command_line_args.as_deref()
    }

    pub fn wwwroot_dir(&self) -> Option<&Path> {
        self.wwwroot_dir.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(root: &Path) -> ProjectMetadata {
        ProjectMetadata {
            full_path: root.join("src/App/App.csproj"),
            name: "App".to_string(),
            assembly_name: "App".to_string(),
            active_configuration_name: "Debug".to_string(),
            output_relative_path: PathBuf::from("bin/Debug/net8.0"),
            solution_path: Some(root.join("App.sln")),
        }
    }

    #[test]
    fn output_dir_is_relative_to_project() {
        let ctx = DeploymentContext::capture(&metadata(Path::new("/repo")), None, false);
        assert_eq!(ctx.output_dir(), Path::new("/repo/src/App/bin/Debug/net8.0"));
        assert_eq!(ctx.solution_dir(), Path::new("/repo"));
    }

    #[test]
    fn blank_args_become_none() {
        let ctx = DeploymentContext::capture(
            &metadata(Path::new("/repo")),
            Some("  ".to_string()),
            false,
        );
        assert_eq!(ctx.command_line_args(), None);
    }

    #[test]
    fn solution_dir_falls_back_to_project_dir() {
        let mut meta = metadata(Path::new("/repo"));
        meta.solution_path = None;
        let ctx = DeploymentContext::capture(&meta, None, false);
        assert_eq!(ctx.solution_dir(), Path::new("/repo/src/App"));
    }

    #[test]
    fn wwwroot_only_when_enabled_and_present() {
        let dir = tempfile::tempdir().unwrap();
        let meta = metadata(dir.path());
        std::fs::create_dir_all(dir.path().join("src/App/wwwroot")).unwrap();

        assert!(DeploymentContext::capture(&meta, None, false).wwwroot_dir().is_none());
        assert!(DeploymentContext::capture(&meta, None, true).wwwroot_dir().is_some());
    }
}
