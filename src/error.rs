// ABOUTME: Application-wide error types for rdeploy.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::deploy::DeployError;
use crate::ssh::ConnectionError;
use crate::types::RuntimeIdError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("unknown destination: {0}")]
    UnknownDestination(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("could not determine the home directory")]
    NoHomeDirectory,

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error("SSH error: {0}")]
    Ssh(#[from] ConnectionError),

    #[error(transparent)]
    Architecture(#[from] RuntimeIdError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
