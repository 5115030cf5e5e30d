// ABOUTME: Deploy command implementation.
// ABOUTME: Wires the config into an orchestrator and reports its events while it runs.

use rdeploy::build::{
    BuildEvents, BuildStrategy, BuildTrigger, DotnetBuildSystem, IdeTrigger, PublishTrigger,
};
use rdeploy::config::Config;
use rdeploy::deploy::Orchestrator;
use rdeploy::diagnostics::Diagnostics;
use rdeploy::error::Result;
use rdeploy::launch::{CommandAdapter, DebugLauncher};
use rdeploy::output::Output;
use rdeploy::project::ProjectDiscovery;
use rdeploy::ssh::{RemoteExecutor, SshExecutor};
use std::env;
use std::sync::Arc;

/// Run one deployment with the given (already destination-merged) config.
pub async fn deploy(config: Config, mut output: Output) -> Result<()> {
    output.start_timer();
    let cwd = env::current_dir()?;
    let target = config.remote.to_target()?;

    output.progress(&format!(
        "Deploying to {}:{} ({})",
        target.login(),
        target.debug_dir(),
        BuildStrategy::from_publish_flag(config.publish)
    ));

    let executor: Arc<dyn RemoteExecutor> = Arc::new(SshExecutor::new(target.session_config()));

    let mut discovery = ProjectDiscovery::new(&cwd, &config.configuration);
    if let Some(project) = &config.project {
        discovery = discovery.project(project);
    }

    let launcher = DebugLauncher::new(Arc::new(CommandAdapter::new(config.adapter.clone())))
        .ssh_program(&config.ssh_program);

    let mut orchestrator = Orchestrator::new(
        target,
        config.deploy_settings(),
        Arc::clone(&executor),
        Arc::new(discovery),
        build_trigger(&config, &executor),
        launcher,
    );

    let mut events = orchestrator.take_events();
    let reporter = output.clone();
    let mut diag = Diagnostics::default();

    let run = orchestrator.run();
    tokio::pin!(run);

    // Report events live while the run makes progress
    let result = loop {
        tokio::select! {
            result = &mut run => break result,
            Some(event) = recv(&mut events) => {
                reporter.deploy_event(&event);
                diag.observe(&event);
            }
        }
    };

    // Whatever was queued after the last poll
    if let Some(rx) = events.as_mut() {
        while let Ok(event) = rx.try_recv() {
            reporter.deploy_event(&event);
            diag.observe(&event);
        }
    }

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    let report = result?;
    if report.launched {
        output.success(&format!(
            "Debug session started for {} in {}",
            report.project, report.remote_dir
        ));
    } else {
        output.success(&format!(
            "Deployed {} to {} without debugging",
            report.project, report.remote_dir
        ));
    }
    Ok(())
}

async fn recv(
    events: &mut Option<tokio::sync::mpsc::Receiver<rdeploy::deploy::DeployEvent>>,
) -> Option<rdeploy::deploy::DeployEvent> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn build_trigger(config: &Config, executor: &Arc<dyn RemoteExecutor>) -> Arc<dyn BuildTrigger> {
    match BuildStrategy::from_publish_flag(config.publish) {
        BuildStrategy::Publish => {
            Arc::new(PublishTrigger::new(Arc::clone(executor)).program(&config.dotnet_program))
        }
        BuildStrategy::Ide => {
            let events = BuildEvents::new();
            let system =
                DotnetBuildSystem::new(Arc::clone(&events)).program(&config.dotnet_program);
            Arc::new(IdeTrigger::new(events, Arc::new(system)))
        }
    }
}
