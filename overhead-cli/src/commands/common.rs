//! Common types and utilities shared across CLI commands.

use overhead::config::{ConfigFile, MAX_RADIUS_NM};
use overhead::display::{AwtrixClient, DisplayConfig};
use overhead::geo::GeoPoint;

use crate::error::CliError;

/// Command-line overrides for the configured zone and device.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius: Option<f64>,
    pub display: Option<String>,
}

impl Overrides {
    /// Apply overrides on top of the config. CLI values win.
    pub fn apply(&self, config: &mut ConfigFile) -> Result<(), CliError> {
        if let Some(lat) = self.lat {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(CliError::Argument(format!(
                    "--lat {} must be between -90 and 90",
                    lat
                )));
            }
            config.location.latitude = lat;
        }
        if let Some(lon) = self.lon {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(CliError::Argument(format!(
                    "--lon {} must be between -180 and 180",
                    lon
                )));
            }
            config.location.longitude = lon;
        }
        if let Some(radius) = self.radius {
            if radius <= 0.0 || radius > MAX_RADIUS_NM {
                return Err(CliError::Argument(format!(
                    "--radius {} must be greater than 0 and at most {}",
                    radius, MAX_RADIUS_NM
                )));
            }
            config.location.radius_nm = radius;
        }
        if let Some(display) = self.display.as_deref() {
            let display = display.trim();
            if display.is_empty() {
                return Err(CliError::Argument("--display must not be empty".to_string()));
            }
            config.display.address = display.to_string();
        }
        Ok(())
    }
}

/// Zone center from the config.
pub fn center(config: &ConfigFile) -> GeoPoint {
    GeoPoint::new(config.location.latitude, config.location.longitude)
}

/// AWTRIX client for the configured address.
pub fn device_client(config: &ConfigFile) -> Result<AwtrixClient, CliError> {
    AwtrixClient::new(&config.display.address).map_err(CliError::Device)
}

/// Display state machine settings from the config.
pub fn display_config(config: &ConfigFile) -> DisplayConfig {
    DisplayConfig {
        app_name: config.display.app_name.clone(),
        rotation_interval: std::time::Duration::from_millis(config.display.rotation_ms),
        idle_policy: config.display.idle_policy,
        ..DisplayConfig::default()
    }
}
