// ABOUTME: Check command implementation.
// ABOUTME: Probes the remote host, reports its runtime identifier and debugger state.

use rdeploy::config::Config;
use rdeploy::deploy::PROBE_COMMAND;
use rdeploy::diagnostics::{Diagnostics, Warning};
use rdeploy::error::Result;
use rdeploy::output::Output;
use rdeploy::remote::RemotePreparer;
use rdeploy::ssh::{RemoteExecutor, SshExecutor};
use rdeploy::types::RuntimeIdentifier;
use std::sync::Arc;

pub async fn check(config: Config, mut output: Output) -> Result<()> {
    output.start_timer();
    let target = config.remote.to_target()?;
    let timeout = config.timeouts.command;
    let executor = Arc::new(SshExecutor::new(target.session_config()));
    let mut diag = Diagnostics::default();

    output.progress(&format!(
        "Checking {} (port {})...",
        target.login(),
        target.ssh_port()
    ));
    executor.run(PROBE_COMMAND, timeout).await?;

    let machine = executor.run("uname -m", timeout).await?;
    let rid = RuntimeIdentifier::from_machine(&machine)?;
    output.progress(&format!("  → Architecture: {} ({})", machine.trim(), rid));

    let preparer = RemotePreparer::new(executor, config.remote.prepare_options());
    if preparer.debugger_installed(&target).await? {
        output.progress(&format!("  → Debugger: {}", target.remote_debugger()));
    } else if config.remote.install_debugger {
        diag.warn(Warning::debugger_missing(format!(
            "no debugger at {}; it will be installed on the next deploy",
            target.remote_debugger()
        )));
    } else {
        diag.warn(Warning::debugger_missing(format!(
            "no debugger at {} and install_debugger is off",
            target.remote_debugger()
        )));
    }

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }
    output.success(&format!("{} is ready ({})", target.host(), rid));
    Ok(())
}
