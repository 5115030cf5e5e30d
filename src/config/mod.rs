// ABOUTME: Configuration types and parsing for rdeploy.yml.
// ABOUTME: Handles YAML parsing, defaults, and destination merging.

mod deserialize;
mod init;
mod remote;

pub use deserialize::expand_home;
pub use init::init_config;
pub use remote::{DEFAULT_KEY_PATH, RemoteConfig};

use crate::deploy::DeploySettings;
use crate::error::{Error, Result};
use deserialize::deserialize_command;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "rdeploy.yml";
pub const CONFIG_FILENAME_ALT: &str = "rdeploy.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".rdeploy/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub remote: RemoteConfig,

    /// Use `dotnet publish` for the remote runtime instead of a local build.
    #[serde(default)]
    pub publish: bool,

    #[serde(default)]
    pub no_debug: bool,

    #[serde(default = "default_true")]
    pub use_command_line_args: bool,

    #[serde(default)]
    pub include_wwwroot: bool,

    /// Startup project file; discovered from the working directory when absent.
    #[serde(default)]
    pub project: Option<PathBuf>,

    #[serde(default = "default_configuration")]
    pub configuration: String,

    #[serde(default)]
    pub timeouts: TimeoutConfig,

    #[serde(default = "default_dotnet_program")]
    pub dotnet_program: String,

    #[serde(default = "default_scp_program")]
    pub scp_program: String,

    #[serde(default = "default_ssh_program")]
    pub ssh_program: String,

    /// Command that receives the session descriptor path via `{descriptor}`.
    #[serde(default = "default_adapter", deserialize_with = "deserialize_command")]
    pub adapter: Vec<String>,

    #[serde(default)]
    pub destinations: HashMap<String, Destination>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_command_timeout", with = "humantime_serde")]
    pub command: Duration,
    #[serde(default = "default_build_timeout", with = "humantime_serde")]
    pub build: Duration,
    #[serde(default = "default_transfer_timeout", with = "humantime_serde")]
    pub transfer: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            command: default_command_timeout(),
            build: default_build_timeout(),
            transfer: default_transfer_timeout(),
        }
    }
}

/// Overrides applied by `--destination <name>`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Destination {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub app_root: Option<String>,
    #[serde(default)]
    pub private_key: Option<String>,
    #[serde(default)]
    pub publish: Option<bool>,
    #[serde(default)]
    pub configuration: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_configuration() -> String {
    "Debug".to_string()
}

fn default_command_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_build_timeout() -> Duration {
    Duration::from_secs(600)
}

fn default_transfer_timeout() -> Duration {
    Duration::from_secs(600)
}

fn default_dotnet_program() -> String {
    "dotnet".to_string()
}

fn default_scp_program() -> String {
    "scp".to_string()
}

fn default_ssh_program() -> String {
    "ssh".to_string()
}

fn default_adapter() -> Vec<String> {
    vec![
        "devenv".to_string(),
        "/Command".to_string(),
        "DebugAdapterHost.Launch /LaunchJson:{descriptor}".to_string(),
    ]
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn for_destination(&self, name: &str) -> Result<Config> {
        let dest = self
            .destinations
            .get(name)
            .ok_or_else(|| Error::UnknownDestination(name.to_string()))?;

        let mut merged = self.clone();
        let remote = &mut merged.remote;

        if let Some(host) = &dest.host {
            remote.host = host.clone();
        }
        if let Some(port) = dest.port {
            remote.port = port;
        }
        if let Some(user) = &dest.user {
            remote.user = user.clone();
        }
        if dest.group.is_some() {
            remote.group = dest.group.clone();
        }
        if let Some(app_root) = &dest.app_root {
            remote.app_root = app_root.clone();
        }
        if let Some(key) = &dest.private_key {
            remote.private_key = Some(expand_home(key)?);
        }
        if let Some(publish) = dest.publish {
            merged.publish = publish;
        }
        if let Some(configuration) = &dest.configuration {
            merged.configuration = configuration.clone();
        }

        Ok(merged)
    }

    /// Orchestrator settings derived from this config.
    pub fn deploy_settings(&self) -> DeploySettings {
        DeploySettings {
            no_debug: self.no_debug,
            use_command_line_args: self.use_command_line_args,
            include_wwwroot: self.include_wwwroot,
            prepare: self.remote.prepare_options(),
            scp_program: self.scp_program.clone(),
            command_timeout: self.timeouts.command,
            build_timeout: self.timeouts.build,
            transfer_timeout: self.timeouts.transfer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
remote:
  host: pi.local
  user: pi
  app_root: /var/apps/demo
  private_key: /keys/id_ed25519
"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_yaml(MINIMAL).unwrap();

        assert_eq!(config.remote.port, 22);
        assert!(config.remote.use_sudo);
        assert!(config.remote.install_debugger);
        assert!(!config.publish);
        assert!(config.use_command_line_args);
        assert_eq!(config.configuration, "Debug");
        assert_eq!(config.timeouts.build, Duration::from_secs(600));
        assert_eq!(config.adapter[0], "devenv");
    }

    #[test]
    fn durations_use_humantime() {
        let yaml = format!("{MINIMAL}timeouts:\n  command: 5s\n  transfer: 2m\n");
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.timeouts.command, Duration::from_secs(5));
        assert_eq!(config.timeouts.transfer, Duration::from_secs(120));
        assert_eq!(config.timeouts.build, Duration::from_secs(600));
    }

    #[test]
    fn adapter_accepts_a_command_line() {
        let yaml = format!("{MINIMAL}adapter: \"code --launch '{{descriptor}}'\"\n");
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.adapter, vec!["code", "--launch", "{descriptor}"]);
    }

    #[test]
    fn empty_adapter_is_rejected() {
        let yaml = format!("{MINIMAL}adapter: []\n");
        assert!(Config::from_yaml(&yaml).is_err());
    }

    #[test]
    fn destination_overrides_remote() {
        let yaml = format!(
            "{MINIMAL}destinations:\n  lab:\n    host: 10.0.0.5\n    port: 2222\n    publish: true\n"
        );
        let config = Config::from_yaml(&yaml).unwrap();
        let lab = config.for_destination("lab").unwrap();

        assert_eq!(lab.remote.host, "10.0.0.5");
        assert_eq!(lab.remote.port, 2222);
        assert_eq!(lab.remote.user, "pi");
        assert!(lab.publish);
    }

    #[test]
    fn unknown_destination_is_an_error() {
        let config = Config::from_yaml(MINIMAL).unwrap();
        assert!(matches!(
            config.for_destination("nope"),
            Err(Error::UnknownDestination(_))
        ));
    }

    #[test]
    fn target_derives_directories() {
        let config = Config::from_yaml(MINIMAL).unwrap();
        let target = config.remote.to_target().unwrap();
        assert_eq!(target.debug_dir(), "/var/apps/demo/debug");
        assert_eq!(target.release_dir(), "/var/apps/demo/release");
        assert_eq!(target.group_name(), "pi");
    }

    #[test]
    fn relative_app_root_is_rejected() {
        let yaml = MINIMAL.replace("/var/apps/demo", "apps/demo");
        let config = Config::from_yaml(&yaml).unwrap();
        assert!(matches!(
            config.remote.to_target(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn filesystem_root_app_root_is_rejected() {
        for root in ["/", "//", "/ "] {
            let yaml = MINIMAL.replace("/var/apps/demo", &format!("'{root}'"));
            let config = Config::from_yaml(&yaml).unwrap();
            let err = config.remote.to_target().unwrap_err();
            assert!(
                err.to_string().contains("filesystem root"),
                "{root:?} gave {err}"
            );
        }
    }

    #[test]
    fn default_key_lives_under_home() {
        let yaml = MINIMAL.replace("  private_key: /keys/id_ed25519\n", "");
        temp_env::with_var("HOME", Some("/home/tester"), || {
            let config = Config::from_yaml(&yaml).unwrap();
            let target = config.remote.to_target().unwrap();
            assert_eq!(
                target.private_key(),
                Path::new("/home/tester/.ssh/id_rsa")
            );
        });
    }

    #[test]
    fn tilde_key_path_is_expanded() {
        let yaml = MINIMAL.replace("/keys/id_ed25519", "~/.ssh/deploy_key");
        temp_env::with_var("HOME", Some("/home/tester"), || {
            let config = Config::from_yaml(&yaml).unwrap();
            assert_eq!(
                config.remote.private_key.as_deref(),
                Some(Path::new("/home/tester/.ssh/deploy_key"))
            );
        });
    }
}
