// ABOUTME: Remote filesystem preparation before a deployment.
// ABOUTME: Creates and owns the app directories, empties the debug dir, and installs vsdbg if missing.

use std::sync::Arc;
use std::time::Duration;

use super::shell::quote;
use super::target::RemoteTarget;
use crate::ssh::{ConnectionError, RemoteExecutor};

/// Bootstrap script published for installing the remote debugger.
pub const VSDBG_BOOTSTRAP_URL: &str = "https://aka.ms/getvsdbgsh";

const SETUP_TIMEOUT: Duration = Duration::from_secs(60);
const INSTALL_TIMEOUT: Duration = Duration::from_secs(600);

/// Knobs for how the remote filesystem is prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrepareOptions {
    /// Prefix directory commands with `sudo`.
    pub use_sudo: bool,
    /// Install the remote debugger when it is not present.
    pub install_debugger: bool,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            use_sudo: true,
            install_debugger: true,
        }
    }
}

/// Prepares the remote directories through a [`RemoteExecutor`].
pub struct RemotePreparer {
    executor: Arc<dyn RemoteExecutor>,
    options: PrepareOptions,
}

impl RemotePreparer {
    pub fn new(executor: Arc<dyn RemoteExecutor>, options: PrepareOptions) -> Self {
        Self { executor, options }
    }

    /// Run every preparation step in order, stopping at the first failure.
    pub async fn prepare(&self, target: &RemoteTarget) -> Result<(), ConnectionError> {
        for command in self.setup_commands(target) {
            self.executor.run(&command, SETUP_TIMEOUT).await?;
        }

        if self.options.install_debugger {
            self.ensure_debugger(target).await?;
        }

        Ok(())
    }

    /// Directory creation, ownership and cleaning, in execution order.
    pub fn setup_commands(&self, target: &RemoteTarget) -> Vec<String> {
        let sudo = if self.options.use_sudo { "sudo " } else { "" };
        let debug_dir = quote(target.debug_dir());
        vec![
            format!("{sudo}mkdir -p {}", debug_dir),
            format!("{sudo}mkdir -p {}", quote(target.release_dir())),
            format!(
                "{sudo}chown -R {}:{} {}",
                quote(target.user()),
                quote(target.group_name()),
                quote(target.app_root())
            ),
            // Removes dotfiles too but keeps the directory itself
            format!("{sudo}find {} -mindepth 1 -delete", debug_dir),
        ]
    }

    /// Whether the remote debugger exists and is executable.
    /// The probe exits 0 in both cases.
    pub async fn debugger_installed(&self, target: &RemoteTarget) -> Result<bool, ConnectionError> {
        let path = quote(target.remote_debugger());
        let probe = format!("if [ -x {path} ]; then echo present; else echo absent; fi");
        let state = self.executor.run(&probe, SETUP_TIMEOUT).await?;
        Ok(state.trim() == "present")
    }

    /// Install the remote debugger unless it is already executable.
    pub async fn ensure_debugger(&self, target: &RemoteTarget) -> Result<(), ConnectionError> {
        if self.debugger_installed(target).await? {
            tracing::debug!("remote debugger already installed at {}", target.remote_debugger());
            return Ok(());
        }

        let install_dir = match target.remote_debugger().rsplit_once('/') {
            Some((dir, _)) if !dir.is_empty() => dir,
            _ => "~/.vsdbg",
        };
        tracing::info!("installing remote debugger into {}", install_dir);
        let install = format!(
            "curl -sSL {} | bash /dev/stdin -v latest -l {}",
            VSDBG_BOOTSTRAP_URL,
            quote(install_dir)
        );
        self.executor.run(&install, INSTALL_TIMEOUT).await?;
        Ok(())
    }
}
