//! Overhead CLI - Command-line interface
//!
//! Watches the configured zone for aircraft and drives the AWTRIX display.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::common::Overrides;
use commands::device::CheckDeviceArgs;
use commands::history::{HistoryArgs, DEFAULT_HISTORY_LIMIT};
use commands::init::InitArgs;
use commands::run::RunArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "overhead")]
#[command(version, about = "Show the closest aircraft overhead on an AWTRIX clock", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the flight feed and drive the display until Ctrl-C
    Run {
        /// Config file (default: ~/.overhead/config.ini)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Zone center latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Zone center longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Detection radius in nautical miles
        #[arg(long)]
        radius: Option<f64>,

        /// Display address (host or URL)
        #[arg(long)]
        display: Option<String>,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,
    },

    /// Check that the display is reachable
    CheckDevice {
        /// Config file (default: ~/.overhead/config.ini)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Display address (host or URL)
        #[arg(long)]
        display: Option<String>,
    },

    /// List recorded overhead passes, most recent first
    History {
        /// Config file (default: ~/.overhead/config.ini)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Maximum number of flights to list
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: usize,
    },

    /// Write a default configuration file
    Init {
        /// Where to write it (default: ~/.overhead/config.ini)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let result: Result<(), CliError> = match cli.command {
        Commands::Run {
            config,
            lat,
            lon,
            radius,
            display,
            debug,
        } => {
            commands::run::run(RunArgs {
                config,
                overrides: Overrides {
                    lat,
                    lon,
                    radius,
                    display,
                },
                debug,
            })
            .await
        }
        Commands::CheckDevice { config, display } => {
            commands::device::run(CheckDeviceArgs { config, display }).await
        }
        Commands::History { config, limit } => {
            commands::history::run(HistoryArgs { config, limit })
        }
        Commands::Init { config, force } => {
            commands::init::run(InitArgs { config, force }).map(|_| ())
        }
    };

    if let Err(e) = result {
        e.exit();
    }
}
