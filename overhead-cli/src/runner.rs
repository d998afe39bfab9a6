//! CLI runner for common setup.
//!
//! Encapsulates config loading and logging initialization so command
//! handlers start from a ready configuration.

use std::path::Path;

use overhead::config::{config_file_path, ConfigFile};
use overhead::logging::{init_logging, LoggingGuard, LoggingOptions};
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration, with command-line overrides applied
    config: ConfigFile,
}

impl CliRunner {
    /// Initialize logging for an already-resolved configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration with overrides applied
    /// * `debug_mode` - When true, defaults to debug-level logging
    pub fn with_config(config: ConfigFile, debug_mode: bool) -> Result<Self, CliError> {
        let options = LoggingOptions {
            file: config.logging.file.clone(),
            debug: debug_mode,
            stdout: true,
        };

        let logging_guard =
            init_logging(&options).map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("Overhead v{}", overhead::VERSION);
        info!(command, "Overhead CLI starting");
    }
}

/// Load the config from an explicit path or the default location.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(config_file_path);
    Ok(ConfigFile::load_from(&path)?)
}
