// ABOUTME: Scrapes `commandLineArgs` from launchSettings.json files under the solution.
// ABOUTME: Exactly one occurrence is forwarded; several is reported as ambiguous.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::{DirEntry, WalkDir};

pub const LAUNCH_SETTINGS_FILENAME: &str = "launchSettings.json";
const ARGS_KEY: &str = "commandLineArgs";
const SKIPPED_DIRS: &[&str] = &["bin", "obj", ".git", ".vs", "node_modules"];

/// One `commandLineArgs` value and the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgsOccurrence {
    pub file: PathBuf,
    pub value: String,
}

/// Result of scanning for launch arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchArgs {
    /// No occurrence; the program starts without arguments.
    None,
    /// Exactly one occurrence, forwarded verbatim.
    Single(String),
    /// More than one occurrence; nothing is forwarded.
    Ambiguous(Vec<ArgsOccurrence>),
}

impl LaunchArgs {
    /// The argument string to forward (empty unless exactly one was found).
    pub fn forwarded(&self) -> &str {
        match self {
            LaunchArgs::Single(value) => value,
            LaunchArgs::None | LaunchArgs::Ambiguous(_) => "",
        }
    }
}

/// Outcome of a scan, including files that could not be read or parsed.
#[derive(Debug, Clone, Default)]
pub struct LaunchArgsScan {
    pub occurrences: Vec<ArgsOccurrence>,
    pub unreadable: Vec<(PathBuf, String)>,
}

impl LaunchArgsScan {
    pub fn resolve(&self) -> LaunchArgs {
        match self.occurrences.as_slice() {
            [] => LaunchArgs::None,
            [single] => LaunchArgs::Single(single.value.clone()),
            many => LaunchArgs::Ambiguous(many.to_vec()),
        }
    }
}

/// Walk `root` and collect every `commandLineArgs` string in launch settings files.
pub fn scan(root: &Path) -> LaunchArgsScan {
    let mut result = LaunchArgsScan::default();

    let walker = WalkDir::new(root).sort_by_file_name();
    for entry in walker.into_iter().filter_entry(|e| !is_skipped(e)) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() || entry.file_name() != LAUNCH_SETTINGS_FILENAME {
            continue;
        }

        let path = entry.path();
        match read_json(path) {
            Ok(json) => {
                let mut values = Vec::new();
                collect_args(&json, &mut values);
                result
                    .occurrences
                    .extend(values.into_iter().map(|value| ArgsOccurrence {
                        file: path.to_path_buf(),
                        value,
                    }));
            }
            Err(reason) => result.unreadable.push((path.to_path_buf(), reason)),
        }
    }

    result
}

fn is_skipped(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn read_json(path: &Path) -> Result<Value, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}

fn collect_args(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                match nested {
                    Value::String(s) if key == ARGS_KEY => out.push(s.clone()),
                    _ => collect_args(nested, out),
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_args(item, out)),
        _ => {}
    }
}

/// Split an argument string the way a POSIX shell would split words,
/// honoring single quotes, double quotes, and backslash escapes.
pub fn split_args(args: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = args.chars();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"'), '\\') => match chars.next() {
                Some(next @ ('"' | '\\')) => current.push(next),
                Some(next) => {
                    current.push('\\');
                    current.push(next);
                }
                None => current.push('\\'),
            },
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_nested_values() {
        let json: Value = serde_json::json!({
            "profiles": {
                "App": { "commandName": "Project", "commandLineArgs": "--port 80" },
                "Other": { "nested": [{ "commandLineArgs": "-v" }] }
            }
        });
        let mut out = Vec::new();
        collect_args(&json, &mut out);
        assert_eq!(out, vec!["--port 80".to_string(), "-v".to_string()]);
    }

    #[test]
    fn non_string_values_are_ignored() {
        let json: Value = serde_json::json!({ "commandLineArgs": 5 });
        let mut out = Vec::new();
        collect_args(&json, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn resolve_by_count() {
        let occurrence = |v: &str| ArgsOccurrence {
            file: PathBuf::from("launchSettings.json"),
            value: v.to_string(),
        };
        let mut scan = LaunchArgsScan::default();
        assert_eq!(scan.resolve(), LaunchArgs::None);

        scan.occurrences.push(occurrence("--a"));
        assert_eq!(scan.resolve(), LaunchArgs::Single("--a".to_string()));

        scan.occurrences.push(occurrence("--b"));
        let resolved = scan.resolve();
        assert!(matches!(resolved, LaunchArgs::Ambiguous(ref all) if all.len() == 2));
        assert_eq!(resolved.forwarded(), "");
    }

    #[test]
    fn split_args_handles_quotes() {
        assert_eq!(
            split_args(r#"--name "hello world" -x 'a b' plain"#),
            vec!["--name", "hello world", "-x", "a b", "plain"]
        );
    }

    #[test]
    fn split_args_keeps_empty_quoted_word() {
        assert_eq!(split_args(r#"--empty "" end"#), vec!["--empty", "", "end"]);
    }

    #[test]
    fn split_args_of_blank_string_is_empty() {
        assert!(split_args("   ").is_empty());
    }
}
