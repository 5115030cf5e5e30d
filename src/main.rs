// ABOUTME: Entry point for the rdeploy CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use rdeploy::config::{self, Config};
use rdeploy::error::Result;
use rdeploy::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(OutputMode::from_flags(cli.quiet, cli.json));

    if let Err(e) = run(cli.command, output.clone()).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(command: Commands, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;

    match command {
        Commands::Init { host, user, force } => {
            config::init_config(&cwd, host.as_deref(), user.as_deref(), force)?;
            output.success(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Deploy {
            destination,
            publish,
            no_debug,
            project,
            configuration,
        } => {
            let mut config = load_config(&cwd, destination.as_deref())?;

            // Flags only ever switch behavior on; the file decides the rest
            config.publish |= publish;
            config.no_debug |= no_debug;
            if project.is_some() {
                config.project = project;
            }
            if let Some(configuration) = configuration {
                config.configuration = configuration;
            }

            commands::deploy(config, output).await
        }
        Commands::Check { destination } => {
            let config = load_config(&cwd, destination.as_deref())?;
            commands::check(config, output).await
        }
    }
}

fn load_config(cwd: &std::path::Path, destination: Option<&str>) -> Result<Config> {
    let config = Config::discover(cwd)?;

    // Apply destination overrides if specified
    match destination {
        Some(dest) => config.for_destination(dest),
        None => Ok(config),
    }
}
