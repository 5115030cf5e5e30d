// ABOUTME: Remote host parameters for a deployment run.
// ABOUTME: Derives the debug and release directories from the application root in one place.

use crate::ssh::SessionConfig;
use std::path::{Path, PathBuf};

const DEBUG_SUBDIR: &str = "debug";
const RELEASE_SUBDIR: &str = "release";

/// Immutable description of the machine being deployed to.
///
/// The debug and release directories are only ever computed by
/// [`RemoteTarget::new`], so the preparer, the transfer, and the debug
/// descriptor always agree on where artifacts live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    host: String,
    port: u16,
    user: String,
    group: String,
    app_root: String,
    debug_dir: String,
    release_dir: String,
    debugger_path: String,
    private_key_path: PathBuf,
    trust_first_connection: bool,
    known_hosts_path: Option<PathBuf>,
}

impl RemoteTarget {
    /// Create a target. The group defaults to the user name and the debugger
    /// path to `~/.vsdbg/vsdbg`.
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        app_root: &str,
        private_key_path: impl Into<PathBuf>,
    ) -> Self {
        let user = user.into();
        let app_root = normalize_root(app_root);
        Self {
            host: host.into(),
            port: 22,
            group: user.clone(),
            user,
            debug_dir: format!("{}/{}", app_root, DEBUG_SUBDIR),
            release_dir: format!("{}/{}", app_root, RELEASE_SUBDIR),
            app_root,
            debugger_path: "~/.vsdbg/vsdbg".to_string(),
            private_key_path: private_key_path.into(),
            trust_first_connection: true,
            known_hosts_path: None,
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn debugger_path(mut self, path: impl Into<String>) -> Self {
        self.debugger_path = path.into();
        self
    }

    pub fn trust_first_connection(mut self, trust: bool) -> Self {
        self.trust_first_connection = trust;
        self
    }

    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn ssh_port(&self) -> u16 {
        self.port
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn group_name(&self) -> &str {
        &self.group
    }

    pub fn app_root(&self) -> &str {
        &self.app_root
    }

    /// Directory the debug build is copied into and launched from.
    pub fn debug_dir(&self) -> &str {
        &self.debug_dir
    }

    pub fn release_dir(&self) -> &str {
        &self.release_dir
    }

    pub fn remote_debugger(&self) -> &str {
        &self.debugger_path
    }

    pub fn private_key(&self) -> &Path {
        &self.private_key_path
    }

    /// `user@host`, as understood by ssh and scp.
    pub fn login(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    pub fn session_config(&self) -> SessionConfig {
        let config = SessionConfig::new(&self.host, &self.user, &self.private_key_path)
            .port(self.port)
            .trust_on_first_use(self.trust_first_connection);
        match &self.known_hosts_path {
            Some(path) => config.known_hosts_path(path),
            None => config,
        }
    }
}

fn normalize_root(root: &str) -> String {
    let trimmed = root.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
