// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates rdeploy.yml template files.

use std::path::Path;

use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

pub fn init_config(
    dir: &Path,
    host: Option<&str>,
    user: Option<&str>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let host = host.unwrap_or("raspberrypi.local");
    let user = user.unwrap_or("pi");
    if host.trim().is_empty() || user.trim().is_empty() {
        return Err(Error::InvalidConfig(
            "host and user cannot be empty".to_string(),
        ));
    }

    let yaml = generate_template_yaml(host, user, &project_slug(dir));
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn project_slug(dir: &Path) -> String {
    dir.file_name()
        .and_then(|n| n.to_str())
        .map(|n| {
            n.chars()
                .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
                .collect::<String>()
        })
        .filter(|s| !s.trim_matches('-').is_empty())
        .unwrap_or_else(|| "app".to_string())
}

fn generate_template_yaml(host: &str, user: &str, slug: &str) -> String {
    format!(
        r#"remote:
  host: {host}
  port: 22
  user: {user}
  # group: {user}
  app_root: /var/rdeploy/{slug}
  # private_key: ~/.ssh/id_rsa
  # debugger_path: ~/.vsdbg/vsdbg
  use_sudo: true
  install_debugger: true
  # Accept and record an unknown host key on first connection
  trust_first_connection: true

# Publish for the remote runtime instead of a local debug build
publish: false
# Copy the build but do not start a debug session
no_debug: false
use_command_line_args: true
include_wwwroot: false
configuration: Debug

timeouts:
  command: 30s
  build: 10m
  transfer: 10m

# Receives the session descriptor path in place of {{descriptor}}
# adapter: ["devenv", "/Command", "DebugAdapterHost.Launch /LaunchJson:{{descriptor}}"]
"#
    )
}
