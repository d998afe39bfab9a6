//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::display::IdlePolicy;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Zone center and radii
    pub location: LocationSettings,
    /// Feed polling
    pub polling: PollingSettings,
    /// Display device
    pub display: DisplaySettings,
    /// History, export and aircraft database files
    pub storage: StorageSettings,
    /// Flight feed endpoint
    pub feed: FeedSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Zone configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSettings {
    /// Center latitude in degrees
    pub latitude: f64,
    /// Center longitude in degrees
    pub longitude: f64,
    /// Detection radius in nautical miles
    pub radius_nm: f64,
    /// Display radius in nautical miles. `None` uses the detection radius.
    pub display_radius_nm: Option<f64>,
}

impl LocationSettings {
    /// Effective display radius, never wider than the detection radius.
    pub fn effective_display_radius(&self) -> f64 {
        self.display_radius_nm
            .map(|r| r.min(self.radius_nm))
            .unwrap_or(self.radius_nm)
    }
}

/// Polling configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PollingSettings {
    /// Seconds between feed requests
    pub interval_secs: u64,
}

/// Display device configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    /// Device host or base URL
    pub address: String,
    /// Custom app name on the device
    pub app_name: String,
    /// Milliseconds each screen stays up
    pub rotation_ms: u64,
    /// What the device shows while no flight is tracked
    pub idle_policy: IdlePolicy,
}

/// File locations.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageSettings {
    /// Flight session history (JSON)
    pub history_file: PathBuf,
    /// Closest-approach export for web consumers (JSON)
    pub export_file: PathBuf,
    /// Optional ICAO-address aircraft database (JSON)
    pub aircraft_db: Option<PathBuf>,
}

/// Feed configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSettings {
    /// Zone feed URL
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
