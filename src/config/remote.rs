// ABOUTME: Remote machine section of rdeploy.yml.
// ABOUTME: Converts into a RemoteTarget, resolving the default private key under the home directory.

use serde::Deserialize;
use std::path::PathBuf;

use super::deserialize::{deserialize_key_path, expand_home};
use crate::error::{Error, Result};
use crate::remote::{PrepareOptions, RemoteTarget};

pub const DEFAULT_KEY_PATH: &str = ".ssh/id_rsa";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    /// Owning group for the app root; defaults to the user.
    #[serde(default)]
    pub group: Option<String>,
    pub app_root: String,
    /// Remote debugger executable; defaults to `~/.vsdbg/vsdbg`.
    #[serde(default)]
    pub debugger_path: Option<String>,
    #[serde(default, deserialize_with = "deserialize_key_path")]
    pub private_key: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub use_sudo: bool,
    #[serde(default = "default_true")]
    pub install_debugger: bool,
    #[serde(default = "default_true")]
    pub trust_first_connection: bool,
}

fn default_port() -> u16 {
    22
}

fn default_true() -> bool {
    true
}

impl RemoteConfig {
    /// Build the immutable target for a run.
    pub fn to_target(&self) -> Result<RemoteTarget> {
        if self.host.trim().is_empty() {
            return Err(Error::InvalidConfig("remote.host cannot be empty".to_string()));
        }
        if self.user.trim().is_empty() {
            return Err(Error::InvalidConfig("remote.user cannot be empty".to_string()));
        }
        if !self.app_root.starts_with('/') {
            return Err(Error::InvalidConfig(format!(
                "remote.app_root must be an absolute path, got '{}'",
                self.app_root
            )));
        }
        // Prepare takes ownership of app_root and cleans below it
        if self.app_root.trim().trim_end_matches('/').is_empty() {
            return Err(Error::InvalidConfig(
                "remote.app_root cannot be the filesystem root".to_string(),
            ));
        }

        let mut target = RemoteTarget::new(
            self.host.trim(),
            self.user.trim(),
            &self.app_root,
            self.key_path()?,
        )
        .port(self.port)
        .trust_first_connection(self.trust_first_connection);

        if let Some(group) = &self.group {
            target = target.group(group);
        }
        if let Some(path) = &self.debugger_path {
            target = target.debugger_path(path);
        }
        Ok(target)
    }

    pub fn prepare_options(&self) -> PrepareOptions {
        PrepareOptions {
            use_sudo: self.use_sudo,
            install_debugger: self.install_debugger,
        }
    }

    fn key_path(&self) -> Result<PathBuf> {
        match &self.private_key {
            Some(path) => Ok(path.clone()),
            None => expand_home(&format!("~/{}", DEFAULT_KEY_PATH)),
        }
    }
}
