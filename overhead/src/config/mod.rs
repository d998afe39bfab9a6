//! User configuration stored in `~/.overhead/config.ini`.
//!
//! # Example
//!
//! ```ignore
//! use overhead::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! println!("Watching {} NM around {}, {}",
//!     config.location.radius_nm,
//!     config.location.latitude,
//!     config.location.longitude);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, DisplaySettings, FeedSettings, LocationSettings, LoggingSettings, PollingSettings,
    StorageSettings,
};
