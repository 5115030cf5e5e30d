// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rdeploy")]
#[command(about = "Build, copy, and debug .NET projects on a remote Linux machine")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new rdeploy.yml configuration file
    Init {
        /// Remote host name or address
        #[arg(long)]
        host: Option<String>,

        /// Remote user
        #[arg(long)]
        user: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Build the startup project, copy it to the remote, and start debugging
    Deploy {
        /// Target destination (defined in config)
        #[arg(short, long)]
        destination: Option<String>,

        /// Publish for the remote runtime instead of building locally
        #[arg(long)]
        publish: bool,

        /// Copy the build without starting a debug session
        #[arg(long)]
        no_debug: bool,

        /// Startup project file
        #[arg(long)]
        project: Option<PathBuf>,

        /// Build configuration (e.g. Debug, Release)
        #[arg(short, long)]
        configuration: Option<String>,
    },

    /// Check that the remote machine is reachable and supported
    Check {
        /// Target destination (defined in config)
        #[arg(short, long)]
        destination: Option<String>,
    },
}
