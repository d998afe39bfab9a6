//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! Produces the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let display_radius = config
        .location
        .display_radius_nm
        .map(|r| r.to_string())
        .unwrap_or_default();
    let aircraft_db = config
        .storage
        .aircraft_db
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();

    format!(
        r#"[location]
; Zone center in decimal degrees
latitude = {}
longitude = {}
; Detection radius in nautical miles. Aircraft inside it get a session.
radius_nm = {}
; Display radius in nautical miles (empty = same as radius_nm)
display_radius_nm = {}

[polling]
; Seconds between flight feed requests (default: 10)
interval_secs = {}

[display]
; AWTRIX device host or URL, e.g. 192.168.1.50
address = {}
; Custom app name shown on the device
app_name = {}
; Milliseconds each screen stays up (default: 4000, minimum: 500)
rotation_ms = {}
; While no flight is shown:
;   restore - bring back the clock, date and sensor apps
;   dark    - keep the display dark
idle_policy = {}

[storage]
; Flight session history
history_file = {}
; Closest-approach export for web pages
export_file = {}
; Optional aircraft database keyed by ICAO address (JSON)
aircraft_db = {}

[feed]
; Zone feed endpoint
url = {}
; Request timeout in seconds (default: 15)
timeout_secs = {}

[logging]
; Log file, cleared at startup
file = {}
"#,
        config.location.latitude,
        config.location.longitude,
        config.location.radius_nm,
        display_radius,
        config.polling.interval_secs,
        config.display.address,
        config.display.app_name,
        config.display.rotation_ms,
        config.display.idle_policy,
        path_to_string(&config.storage.history_file),
        path_to_string(&config.storage.export_file),
        aircraft_db,
        config.feed.url,
        config.feed.timeout_secs,
        path_to_string(&config.logging.file),
    )
}

/// Display a path, abbreviating the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
