// ABOUTME: Startup project resolution from the working tree.
// ABOUTME: Finds the .csproj, its assembly name, target framework, output dir, and solution.

use std::fs;
use std::path::{Path, PathBuf};

use super::csproj::ProjectProperties;

/// Metadata for the project that will be built and launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMetadata {
    pub full_path: PathBuf,
    pub name: String,
    pub assembly_name: String,
    pub active_configuration_name: String,
    /// Build output directory relative to the project directory.
    pub output_relative_path: PathBuf,
    pub solution_path: Option<PathBuf>,
}

impl ProjectMetadata {
    pub fn project_dir(&self) -> &Path {
        self.full_path.parent().unwrap_or(Path::new("."))
    }

    /// Directory of the solution, or the project directory when there is none.
    pub fn solution_dir(&self) -> &Path {
        self.solution_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or_else(|| self.project_dir())
    }
}

/// Source of the startup project.
pub trait ProjectModel: Send + Sync {
    /// The project to build and run, or `None` when no single project is designated.
    fn startup_project(&self) -> Option<ProjectMetadata>;
}

/// Resolves the startup project from the filesystem.
#[derive(Debug, Clone)]
pub struct ProjectDiscovery {
    search_dir: PathBuf,
    project: Option<PathBuf>,
    configuration: String,
}

impl ProjectDiscovery {
    /// Look for a single `.csproj` in `search_dir`, building `configuration`.
    pub fn new(search_dir: impl Into<PathBuf>, configuration: impl Into<String>) -> Self {
        Self {
            search_dir: search_dir.into(),
            project: None,
            configuration: configuration.into(),
        }
    }

    /// Use an explicit project file (relative paths resolve against the search dir).
    pub fn project(mut self, path: impl Into<PathBuf>) -> Self {
        self.project = Some(path.into());
        self
    }

    fn locate(&self) -> Option<PathBuf> {
        if let Some(project) = &self.project {
            let path = if project.is_absolute() {
                project.clone()
            } else {
                self.search_dir.join(project)
            };
            return path.is_file().then_some(path);
        }

        let mut candidates = files_with_extension(&self.search_dir, "csproj");
        if candidates.len() == 1 {
            candidates.pop()
        } else {
            if candidates.len() > 1 {
                tracing::warn!(
                    "{} project files in {}; set `project` in the config to choose one",
                    candidates.len(),
                    self.search_dir.display()
                );
            }
            None
        }
    }
}

impl ProjectModel for ProjectDiscovery {
    fn startup_project(&self) -> Option<ProjectMetadata> {
        let full_path = self.locate()?;
        let full_path = full_path.canonicalize().unwrap_or(full_path);
        let name = full_path.file_stem()?.to_string_lossy().into_owned();
        let properties = read_properties(&full_path)?;

        let assembly_name = properties.assembly_name.unwrap_or_else(|| name.clone());
        let mut output_relative_path = PathBuf::from("bin").join(&self.configuration);
        if let Some(tfm) = properties.target_framework {
            output_relative_path.push(tfm);
        }

        let project_dir = full_path.parent().unwrap_or(Path::new("."));
        let solution_path = find_solution(project_dir);

        Some(ProjectMetadata {
            assembly_name,
            active_configuration_name: self.configuration.clone(),
            output_relative_path,
            solution_path,
            name,
            full_path,
        })
    }
}

fn files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == extension))
        .collect();
    files.sort();
    files
}

/// The nearest ancestor directory holding exactly one `.sln` file.
fn find_solution(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        let mut solutions = files_with_extension(dir, "sln");
        (solutions.len() == 1).then(|| solutions.remove(0))
    })
}

fn read_properties(path: &Path) -> Option<ProjectProperties> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("cannot read {}: {}", path.display(), e);
            return None;
        }
    };
    let properties = match ProjectProperties::parse(&content) {
        Ok(properties) => properties,
        Err(e) => {
            tracing::warn!("cannot parse {}: {}", path.display(), e);
            return None;
        }
    };

    if properties.is_multi_targeted() {
        tracing::warn!(
            "{} targets {}; deploying the {} build",
            path.display(),
            properties.target_frameworks.join(", "),
            properties.target_framework.as_deref().unwrap_or_default()
        );
    }
    Some(properties)
}
