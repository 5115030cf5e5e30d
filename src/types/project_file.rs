// ABOUTME: Normalized project file names for matching build events to the tracked project.
// ABOUTME: Accepts both Windows and Unix separators and compares case-insensitively.

use std::fmt;

/// The file-name part of a project path, e.g. `Ticketer.csproj`.
///
/// Build subsystems report projects by path, sometimes relative, sometimes
/// with backslashes. Two `ProjectFileName`s are equal when their last path
/// segments match ignoring ASCII case.
#[derive(Debug, Clone)]
pub struct ProjectFileName(String);

impl ProjectFileName {
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim().trim_end_matches(['/', '\\']);
        let name = trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed);
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for ProjectFileName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for ProjectFileName {}

impl fmt::Display for ProjectFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_unix_directories() {
        assert_eq!(
            ProjectFileName::from_path("/src/app/App.csproj").as_str(),
            "App.csproj"
        );
    }

    #[test]
    fn strips_windows_directories() {
        assert_eq!(
            ProjectFileName::from_path(r"C:\src\app\App.csproj").as_str(),
            "App.csproj"
        );
    }

    #[test]
    fn relative_and_absolute_paths_match() {
        assert_eq!(
            ProjectFileName::from_path(r"app\App.csproj"),
            ProjectFileName::from_path("/home/me/src/app/app.CSPROJ")
        );
    }

    #[test]
    fn different_projects_do_not_match() {
        assert_ne!(
            ProjectFileName::from_path("App.csproj"),
            ProjectFileName::from_path("App.Tests.csproj")
        );
    }
}
