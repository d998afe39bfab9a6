//! Init command - write a default configuration file.

use std::path::PathBuf;

use overhead::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Arguments for the init command.
#[derive(Debug, Default)]
pub struct InitArgs {
    pub config: Option<PathBuf>,
    pub force: bool,
}

/// Run the init command.
pub fn run(args: InitArgs) -> Result<PathBuf, CliError> {
    let path = args.config.unwrap_or_else(config_file_path);

    if path.exists() && !args.force {
        return Err(CliError::AlreadyExists(path.display().to_string()));
    }

    ConfigFile::default().save_to(&path)?;

    println!("Configuration file: {}", path.display());
    println!();
    println!("Set your location and display address in this file.");
    println!("CLI arguments override config file values when specified.");
    Ok(path)
}
