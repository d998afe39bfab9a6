//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use overhead::config::ConfigFileError;
use overhead::display::DeviceError;
use overhead::fs::PersistenceError;
use overhead::monitor::MonitorError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be read or is invalid
    Config(ConfigFileError),
    /// Invalid command-line argument
    Argument(String),
    /// Failed to build a component before the monitor starts
    Setup(String),
    /// Display device problem outside the monitor
    Device(DeviceError),
    /// The monitor failed to start
    Monitor(MonitorError),
    /// Flight history could not be read
    History(PersistenceError),
    /// Refused to overwrite an existing file
    AlreadyExists(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Monitor(MonitorError::DeviceOffline(_))
            | CliError::Device(DeviceError::Offline { .. }) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. The clock is powered off or not on the same network");
                eprintln!("  2. display.address in config.ini points to the wrong host");
                eprintln!("  3. The AWTRIX firmware web server is disabled");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!(
                    "Fix the value in {} or run 'overhead init --force' to reset it.",
                    overhead::config::config_file_path().display()
                );
            }
            CliError::AlreadyExists(_) => {
                eprintln!("Use --force to overwrite it.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Argument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Setup(msg) => write!(f, "Failed to start: {}", msg),
            CliError::Device(e) => write!(f, "{}", e),
            CliError::Monitor(e) => write!(f, "{}", e),
            CliError::History(e) => write!(f, "Failed to read flight history: {}", e),
            CliError::AlreadyExists(path) => write!(f, "File already exists: {}", path),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Device(e) => Some(e),
            CliError::Monitor(e) => Some(e),
            CliError::History(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<MonitorError> for CliError {
    fn from(e: MonitorError) -> Self {
        CliError::Monitor(e)
    }
}
