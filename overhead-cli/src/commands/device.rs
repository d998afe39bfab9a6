//! Check-device command - verify the display is reachable.

use std::path::PathBuf;

use overhead::display::DisplayDevice;

use super::common::{device_client, Overrides};
use crate::error::CliError;
use crate::runner::load_config;

/// Arguments for the check-device command.
#[derive(Debug, Default)]
pub struct CheckDeviceArgs {
    pub config: Option<PathBuf>,
    pub display: Option<String>,
}

/// Run the check-device command.
pub async fn run(args: CheckDeviceArgs) -> Result<(), CliError> {
    let mut config = load_config(args.config.as_deref())?;
    Overrides {
        display: args.display,
        ..Overrides::default()
    }
    .apply(&mut config)?;

    let client = device_client(&config)?;
    println!("Checking display at {} ...", client.base_url());

    let info = client.health_check().await.map_err(CliError::Device)?;

    println!("Display online");
    println!(
        "  Firmware: {}",
        info.version.as_deref().unwrap_or("unknown")
    );
    if let Some(uptime) = info.uptime {
        println!("  Uptime:   {}h {}m", uptime / 3600, (uptime % 3600) / 60);
    }
    if let Some(app) = info.app.as_deref() {
        println!("  Showing:  {}", app);
    }
    if let Some(rssi) = info.wifi_signal {
        println!("  WiFi:     {} dBm", rssi);
    }
    Ok(())
}
