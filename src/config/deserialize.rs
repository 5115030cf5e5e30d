// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Handles home-relative key paths and adapter commands given as a string or a list.

use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::project::launch_args::split_args;

/// Expand a leading `~/` against the local home directory.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .ok_or(Error::NoHomeDirectory),
        None => Ok(PathBuf::from(path)),
    }
}

pub fn deserialize_key_path<'de, D>(deserializer: D) -> std::result::Result<Option<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    opt.map(|s| expand_home(&s).map_err(serde::de::Error::custom))
        .transpose()
}

pub fn deserialize_command<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let command = match CommandEntry::deserialize(deserializer)? {
        CommandEntry::Line(line) => split_args(&line),
        CommandEntry::Args(args) => args,
    };
    if command.is_empty() {
        return Err(serde::de::Error::custom("adapter command cannot be empty"));
    }
    Ok(command)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CommandEntry {
    Line(String),
    Args(Vec<String>),
}
