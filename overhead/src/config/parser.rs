//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::defaults::{MAX_RADIUS_NM, MIN_POLL_INTERVAL_SECS, MIN_ROTATION_MS};
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [location] section
    if let Some(section) = ini.section(Some("location")) {
        if let Some(v) = parse_value::<f64>(section, "location", "latitude", "must be a number")? {
            if !(-90.0..=90.0).contains(&v) {
                return Err(invalid("location", "latitude", v, "must be between -90 and 90"));
            }
            config.location.latitude = v;
        }
        if let Some(v) = parse_value::<f64>(section, "location", "longitude", "must be a number")? {
            if !(-180.0..=180.0).contains(&v) {
                return Err(invalid("location", "longitude", v, "must be between -180 and 180"));
            }
            config.location.longitude = v;
        }
        if let Some(v) = parse_value::<f64>(
            section,
            "location",
            "radius_nm",
            "must be a positive number (nautical miles)",
        )? {
            if v <= 0.0 || v > MAX_RADIUS_NM {
                return Err(invalid(
                    "location",
                    "radius_nm",
                    v,
                    &format!("must be greater than 0 and at most {}", MAX_RADIUS_NM),
                ));
            }
            config.location.radius_nm = v;
        }
        if let Some(v) = parse_value::<f64>(
            section,
            "location",
            "display_radius_nm",
            "must be a positive number (nautical miles) or empty",
        )? {
            if v <= 0.0 {
                return Err(invalid(
                    "location",
                    "display_radius_nm",
                    v,
                    "must be greater than 0",
                ));
            }
            config.location.display_radius_nm = Some(v);
        }
    }

    // [polling] section
    if let Some(section) = ini.section(Some("polling")) {
        if let Some(v) = parse_value::<u64>(
            section,
            "polling",
            "interval_secs",
            "must be a positive integer (seconds)",
        )? {
            if v < MIN_POLL_INTERVAL_SECS {
                return Err(invalid(
                    "polling",
                    "interval_secs",
                    v,
                    "must be at least 1 second",
                ));
            }
            config.polling.interval_secs = v;
        }
    }

    // [display] section
    if let Some(section) = ini.section(Some("display")) {
        if let Some(v) = non_empty(section, "address") {
            config.display.address = v.to_string();
        }
        if let Some(v) = non_empty(section, "app_name") {
            config.display.app_name = v.to_string();
        }
        if let Some(v) = parse_value::<u64>(
            section,
            "display",
            "rotation_ms",
            "must be a positive integer (milliseconds)",
        )? {
            if v < MIN_ROTATION_MS {
                return Err(invalid(
                    "display",
                    "rotation_ms",
                    v,
                    &format!("must be at least {} ms", MIN_ROTATION_MS),
                ));
            }
            config.display.rotation_ms = v;
        }
        if let Some(v) = non_empty(section, "idle_policy") {
            config.display.idle_policy =
                v.parse().map_err(|reason: String| ConfigFileError::InvalidValue {
                    section: "display".to_string(),
                    key: "idle_policy".to_string(),
                    value: v.to_string(),
                    reason,
                })?;
        }
    }

    // [storage] section
    if let Some(section) = ini.section(Some("storage")) {
        if let Some(v) = non_empty(section, "history_file") {
            config.storage.history_file = expand_tilde(v);
        }
        if let Some(v) = non_empty(section, "export_file") {
            config.storage.export_file = expand_tilde(v);
        }
        if let Some(v) = non_empty(section, "aircraft_db") {
            config.storage.aircraft_db = Some(expand_tilde(v));
        }
    }

    // [feed] section
    if let Some(section) = ini.section(Some("feed")) {
        if let Some(v) = non_empty(section, "url") {
            if !v.starts_with("http://") && !v.starts_with("https://") {
                return Err(invalid("feed", "url", v, "must start with http:// or https://"));
            }
            config.feed.url = v.to_string();
        }
        if let Some(v) = parse_value::<u64>(
            section,
            "feed",
            "timeout_secs",
            "must be a positive integer (seconds)",
        )? {
            if v == 0 {
                return Err(invalid("feed", "timeout_secs", v, "must be at least 1 second"));
            }
            config.feed.timeout_secs = v;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = expand_tilde(v);
        }
    }

    Ok(config)
}

/// Trimmed value for `key`, or `None` when missing or blank.
fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a non-blank value, reporting `reason` on failure.
fn parse_value<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
    reason: &str,
) -> Result<Option<T>, ConfigFileError> {
    match non_empty(section, key) {
        None => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| invalid(section_name, key, v, reason)),
    }
}

fn invalid(
    section: &str,
    key: &str,
    value: impl ToString,
    reason: &str,
) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use crate::config::settings::ConfigFile;
    use crate::display::IdlePolicy;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, crate::config::ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_location_overrides() {
        let config = load(
            r#"
[location]
latitude = 45.625
longitude = -122.528
radius_nm = 3
display_radius_nm = 0.7
"#,
        )
        .unwrap();

        assert_eq!(config.location.latitude, 45.625);
        assert_eq!(config.location.longitude, -122.528);
        assert_eq!(config.location.radius_nm, 3.0);
        assert_eq!(config.location.display_radius_nm, Some(0.7));
        assert_eq!(config.location.effective_display_radius(), 0.7);
    }

    #[test]
    fn test_blank_display_radius_uses_detection_radius() {
        let config = load(
            r#"
[location]
radius_nm = 4
display_radius_nm =
"#,
        )
        .unwrap();

        assert!(config.location.display_radius_nm.is_none());
        assert_eq!(config.location.effective_display_radius(), 4.0);
    }

    #[test]
    fn test_invalid_latitude() {
        let err = load("[location]\nlatitude = 91\n").unwrap_err();
        assert!(err.to_string().contains("location.latitude"));
        assert!(err.to_string().contains("between -90 and 90"));
    }

    #[test]
    fn test_non_numeric_radius() {
        let err = load("[location]\nradius_nm = far\n").unwrap_err();
        assert!(err.to_string().contains("radius_nm"));
        assert!(err.to_string().contains("'far'"));
    }

    #[test]
    fn test_idle_policy() {
        let config = load("[display]\nidle_policy = dark\n").unwrap();
        assert_eq!(config.display.idle_policy, IdlePolicy::KeepDark);

        let err = load("[display]\nidle_policy = off\n").unwrap_err();
        assert!(err.to_string().contains("expected 'restore' or 'dark'"));
    }

    #[test]
    fn test_rotation_too_fast() {
        let err = load("[display]\nrotation_ms = 100\n").unwrap_err();
        assert!(err.to_string().contains("rotation_ms"));
    }

    #[test]
    fn test_zero_poll_interval() {
        assert!(load("[polling]\ninterval_secs = 0\n").is_err());
    }

    #[test]
    fn test_feed_url_scheme() {
        let err = load("[feed]\nurl = ftp://example.com/feed\n").unwrap_err();
        assert!(err.to_string().contains("feed.url"));

        let config = load("[feed]\nurl = https://example.com/feed.js\ntimeout_secs = 20\n").unwrap();
        assert_eq!(config.feed.url, "https://example.com/feed.js");
        assert_eq!(config.feed.timeout_secs, 20);
    }

    #[test]
    fn test_storage_paths() {
        let config = load(
            r#"
[storage]
history_file = /var/lib/overhead/flights.json
aircraft_db = /var/lib/overhead/aircraft.json
"#,
        )
        .unwrap();

        assert_eq!(
            config.storage.history_file,
            std::path::PathBuf::from("/var/lib/overhead/flights.json")
        );
        assert_eq!(
            config.storage.aircraft_db,
            Some(std::path::PathBuf::from("/var/lib/overhead/aircraft.json"))
        );
    }

    #[test]
    fn test_unknown_sections_are_ignored() {
        let config = load("[mqtt]\nbroker = localhost\n").unwrap();
        assert_eq!(config, ConfigFile::default());
    }
}
