//! Poll loop tying the feed, tracker and display together.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::display::{
    DeviceError, DeviceInfo, DisplayConfig, DisplayDevice, DisplayStateMachine, DisplayTransition,
};
use crate::export::Clock;
use crate::feed::{FeedError, FlightFeed};

use super::controller::{CycleReport, OverheadTracker};

/// Default time between feed polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Fatal monitor errors.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The display could not be reached at startup.
    #[error("Display device is offline: {0}")]
    DeviceOffline(#[source] DeviceError),

    /// The display answered the health check with an error.
    #[error("Display health check failed: {0}")]
    DeviceCheck(#[source] DeviceError),
}

/// Totals for one run of the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Cycles that completed.
    pub cycles: u64,
    /// Cycles abandoned on a feed error.
    pub feed_errors: u64,
    /// Distinct active flights seen.
    pub flights: u64,
}

/// Owns every long-lived component and drives them from one task.
///
/// # Usage
///
/// ```ignore
/// let mut monitor = Monitor::new(feed, device, tracker, display_config, clock);
/// monitor.startup().await?;
/// let summary = monitor.run(cancel).await;
/// ```
pub struct Monitor<F: FlightFeed, D: DisplayDevice + 'static> {
    feed: F,
    device: Arc<D>,
    tracker: OverheadTracker,
    display: DisplayStateMachine<D>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
}

impl<F: FlightFeed, D: DisplayDevice + 'static> Monitor<F, D> {
    pub fn new(
        feed: F,
        device: Arc<D>,
        tracker: OverheadTracker,
        display_config: DisplayConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let display = DisplayStateMachine::new(Arc::clone(&device), display_config);
        Self {
            feed,
            device,
            tracker,
            display,
            clock,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn tracker(&self) -> &OverheadTracker {
        &self.tracker
    }

    pub fn display(&self) -> &DisplayStateMachine<D> {
        &self.display
    }

    /// Check the device, load history and apply the idle policy.
    ///
    /// Only the device check is fatal. History that cannot be read leaves
    /// the tracker empty.
    pub async fn startup(&mut self) -> Result<DeviceInfo, MonitorError> {
        let info = self.device.health_check().await.map_err(|e| match e {
            DeviceError::Offline { .. } => MonitorError::DeviceOffline(e),
            other => MonitorError::DeviceCheck(other),
        })?;

        info!(
            version = info.version.as_deref().unwrap_or("unknown"),
            uptime_secs = info.uptime.unwrap_or(0),
            "Display device online"
        );

        if let Err(e) = self.tracker.load_history() {
            warn!(error = %e, "Failed to load flight history, starting empty");
        }

        self.display.apply_idle_policy().await;
        Ok(info)
    }

    /// Fetch once, run the tracker and update the display.
    pub async fn poll_once(&mut self) -> Result<CycleReport, FeedError> {
        let config = *self.tracker.config();
        let observations = self.feed.fetch(config.center, config.radius_nm).await?;

        let report = self.tracker.process_cycle(&observations, self.clock.now());
        let transition = self.display.on_poll(report.view.clone()).await;

        if transition != DisplayTransition::NoChange {
            debug!(transition = ?transition, "Display transition");
        }

        Ok(report)
    }

    /// Poll until cancelled, then clean up the display.
    ///
    /// Feed errors abandon the cycle; the loop continues at the next tick.
    pub async fn run(mut self, cancel: CancellationToken) -> RunSummary {
        info!(
            center = %self.tracker.config().center,
            radius_nm = self.tracker.config().radius_nm,
            poll_interval_secs = self.poll_interval.as_secs(),
            "Monitor started"
        );

        let mut summary = RunSummary::default();
        let mut last_active: Option<String> = None;
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break,

                _ = ticker.tick() => {
                    let result = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        result = self.poll_once() => result,
                    };

                    match result {
                        Ok(report) => {
                            summary.cycles += 1;
                            let active = report.active.map(|a| a.key);
                            if active.is_some() && active != last_active {
                                summary.flights += 1;
                            }
                            last_active = active;
                        }
                        Err(e) => {
                            summary.feed_errors += 1;
                            warn!(error = %e, "Feed request failed, skipping cycle");
                        }
                    }
                }
            }
        }

        info!("Shutdown requested, clearing display");
        self.display.shutdown().await;

        info!(
            cycles = summary.cycles,
            feed_errors = summary.feed_errors,
            flights = summary.flights,
            "Monitor stopped"
        );
        summary
    }
}
