//! Run command - poll the feed and drive the display until Ctrl-C.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use overhead::config::ConfigFile;
use overhead::export::{Clock, ExportThrottle, JsonExportStore, SystemClock};
use overhead::feed::Fr24Client;
use overhead::identity::AircraftDatabase;
use overhead::monitor::{Monitor, OverheadTracker, TrackerConfig};
use overhead::session::{JsonHistoryStore, SessionTracker};

use super::common::{center, device_client, display_config, Overrides};
use crate::error::CliError;
use crate::runner::{load_config, CliRunner};

/// Arguments for the run command.
#[derive(Debug, Default)]
pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub overrides: Overrides,
    pub debug: bool,
}

/// Run the run command.
pub async fn run(args: RunArgs) -> Result<(), CliError> {
    let mut config = load_config(args.config.as_deref())?;
    args.overrides.apply(&mut config)?;

    let runner = CliRunner::with_config(config, args.debug)?;
    runner.log_startup("run");
    let config = runner.config();

    let tracker = build_tracker(config);
    let feed = Fr24Client::with_timeout(
        config.feed.url.clone(),
        Duration::from_secs(config.feed.timeout_secs),
    )
    .map_err(|e| CliError::Setup(e.to_string()))?;
    let device = Arc::new(device_client(config)?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let mut monitor = Monitor::new(feed, device, tracker, display_config(config), clock)
        .with_poll_interval(Duration::from_secs(config.polling.interval_secs));

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        handler_token.cancel();
    })
    .map_err(|e| CliError::Setup(format!("Failed to set signal handler: {}", e)))?;

    let device_info = monitor.startup().await?;

    println!(
        "Display {} online (firmware {})",
        config.display.address,
        device_info.version.as_deref().unwrap_or("unknown")
    );
    println!(
        "Watching {:.1} NM around {:.4}, {:.4} (display within {:.1} NM)",
        config.location.radius_nm,
        config.location.latitude,
        config.location.longitude,
        config.location.effective_display_radius()
    );
    println!("Press Ctrl-C to stop.");

    let summary = monitor.run(cancel).await;

    println!();
    println!(
        "Stopped after {} cycles: {} flights, {} feed errors",
        summary.cycles, summary.flights, summary.feed_errors
    );
    Ok(())
}

/// Assemble the tracker from configured stores and databases.
fn build_tracker(config: &ConfigFile) -> OverheadTracker {
    let radius_nm = config.location.radius_nm;

    let lookup = match config.storage.aircraft_db.as_deref() {
        Some(path) => AircraftDatabase::with_airframe_file(path).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load aircraft database, using built-in types only");
            AircraftDatabase::builtin()
        }),
        None => AircraftDatabase::builtin(),
    };
    info!(types = lookup.type_count(), "Aircraft database ready");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let sessions = SessionTracker::new(
        Box::new(JsonHistoryStore::new(&config.storage.history_file)),
        radius_nm,
    );
    let export = ExportThrottle::new(
        Box::new(JsonExportStore::new(&config.storage.export_file)),
        clock,
    );

    OverheadTracker::new(
        TrackerConfig::new(center(config), radius_nm)
            .with_display_radius(config.location.effective_display_radius()),
        sessions,
        export,
        Box::new(lookup),
    )
}
