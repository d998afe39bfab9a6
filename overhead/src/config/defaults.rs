//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use std::path::PathBuf;

use super::file::config_directory;
use super::settings::*;
use crate::display::{IdlePolicy, DEFAULT_APP_NAME, DEFAULT_ROTATION_INTERVAL};
use crate::feed::{DEFAULT_FEED_TIMEOUT, DEFAULT_FEED_URL};
use crate::monitor::DEFAULT_POLL_INTERVAL;

// =============================================================================
// Location
// =============================================================================

/// Default zone center latitude (Portland International Airport).
pub const DEFAULT_LATITUDE: f64 = 45.5887;

/// Default zone center longitude.
pub const DEFAULT_LONGITUDE: f64 = -122.5975;

/// Default detection radius in nautical miles.
pub const DEFAULT_RADIUS_NM: f64 = 5.0;

/// Largest accepted detection radius.
pub const MAX_RADIUS_NM: f64 = 250.0;

// =============================================================================
// Polling and display
// =============================================================================

/// Shortest accepted poll interval.
pub const MIN_POLL_INTERVAL_SECS: u64 = 1;

/// Shortest accepted rotation interval.
pub const MIN_ROTATION_MS: u64 = 500;

/// Default device address.
pub const DEFAULT_DEVICE_ADDRESS: &str = "awtrix.local";

// =============================================================================
// Files
// =============================================================================

/// History file name inside the config directory.
pub const DEFAULT_HISTORY_FILE: &str = "flights.json";

/// Export file name inside the config directory.
pub const DEFAULT_EXPORT_FILE: &str = "flights-web.json";

/// Log file name inside the config directory.
pub const DEFAULT_LOG_FILE: &str = "overhead.log";

/// Default history path (~/.overhead/flights.json).
pub fn default_history_file() -> PathBuf {
    config_directory().join(DEFAULT_HISTORY_FILE)
}

/// Default export path (~/.overhead/flights-web.json).
pub fn default_export_file() -> PathBuf {
    config_directory().join(DEFAULT_EXPORT_FILE)
}

/// Default log path (~/.overhead/overhead.log).
pub fn default_log_file() -> PathBuf {
    config_directory().join(DEFAULT_LOG_FILE)
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            location: LocationSettings {
                latitude: DEFAULT_LATITUDE,
                longitude: DEFAULT_LONGITUDE,
                radius_nm: DEFAULT_RADIUS_NM,
                display_radius_nm: None,
            },
            polling: PollingSettings {
                interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            },
            display: DisplaySettings {
                address: DEFAULT_DEVICE_ADDRESS.to_string(),
                app_name: DEFAULT_APP_NAME.to_string(),
                rotation_ms: DEFAULT_ROTATION_INTERVAL.as_millis() as u64,
                idle_policy: IdlePolicy::default(),
            },
            storage: StorageSettings {
                history_file: default_history_file(),
                export_file: default_export_file(),
                aircraft_db: None,
            },
            feed: FeedSettings {
                url: DEFAULT_FEED_URL.to_string(),
                timeout_secs: DEFAULT_FEED_TIMEOUT.as_secs(),
            },
            logging: LoggingSettings {
                file: default_log_file(),
            },
        }
    }
}
