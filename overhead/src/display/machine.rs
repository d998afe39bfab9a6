//! Display state machine.
//!
//! Decides when the clock shows a flight and owns the rotation timer.
//!
//! # State Machine
//!
//! ```text
//!            flight in radius                 no flight
//!    Idle ---------------------> Active ---------------------> Idle
//!     ^   render screen 0,         |  ^    cancel timer,         |
//!     |   start timer              |  |    clear app once,       |
//!     |                            +--+    apply idle policy     |
//!     |                     flight in radius:                    |
//!     |                     replace view in place                |
//!     +----------------------------------------------------------+
//! ```
//!
//! The poll loop is the only writer of the shared [`VersionedCell`]; the
//! rotation task only reads it and advances the screen index.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::cell::VersionedCell;
use super::device::DisplayDevice;
use super::screens::{render, RenderOptions, Screen, SCREEN_COUNT};
use super::view::FlightView;

/// Default time each screen stays up.
pub const DEFAULT_ROTATION_INTERVAL: Duration = Duration::from_millis(4000);

/// Default custom app name on the device.
pub const DEFAULT_APP_NAME: &str = "overhead";

/// Default upper bound on the shutdown clear.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Default seconds before the device drops a screen that stopped updating.
pub const DEFAULT_SCREEN_LIFETIME_SECS: u32 = 30;

/// What the device shows while no flight is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdlePolicy {
    /// Bring back the built-in clock/date/sensor apps.
    #[default]
    RestorePassive,
    /// Leave the display dark.
    KeepDark,
}

impl fmt::Display for IdlePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdlePolicy::RestorePassive => write!(f, "restore"),
            IdlePolicy::KeepDark => write!(f, "dark"),
        }
    }
}

impl FromStr for IdlePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "restore" => Ok(IdlePolicy::RestorePassive),
            "dark" => Ok(IdlePolicy::KeepDark),
            other => Err(format!("expected 'restore' or 'dark', got '{}'", other)),
        }
    }
}

/// Configuration for the display state machine.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Custom app name on the device.
    pub app_name: String,
    /// Time each screen stays up.
    pub rotation_interval: Duration,
    /// What to show while idle.
    pub idle_policy: IdlePolicy,
    /// Upper bound on the shutdown clear.
    pub shutdown_grace: Duration,
    /// Seconds before the device drops a stale screen.
    pub screen_lifetime_secs: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            rotation_interval: DEFAULT_ROTATION_INTERVAL,
            idle_policy: IdlePolicy::default(),
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            screen_lifetime_secs: DEFAULT_SCREEN_LIFETIME_SECS,
        }
    }
}

/// Observable phase of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPhase {
    Idle,
    Active,
}

/// What a poll did to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayTransition {
    /// Idle -> Active: first screen rendered, timer started.
    Started,
    /// Active -> Active: view replaced, timer untouched.
    Refreshed,
    /// Active -> Idle: timer cancelled, app cleared.
    Stopped,
    /// Idle -> Idle.
    NoChange,
}

/// Running rotation timer.
struct RotationTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

enum DisplayState {
    Idle,
    Active { rotation: RotationTask },
}

/// Owns the display lifecycle for one device.
pub struct DisplayStateMachine<D: DisplayDevice + 'static> {
    device: Arc<D>,
    config: DisplayConfig,
    view: Arc<VersionedCell<Option<FlightView>>>,
    screen_index: Arc<AtomicUsize>,
    state: DisplayState,
}

impl<D: DisplayDevice + 'static> DisplayStateMachine<D> {
    /// Create an idle state machine.
    pub fn new(device: Arc<D>, config: DisplayConfig) -> Self {
        Self {
            device,
            config,
            view: Arc::new(VersionedCell::new(None)),
            screen_index: Arc::new(AtomicUsize::new(0)),
            state: DisplayState::Idle,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> DisplayPhase {
        match self.state {
            DisplayState::Idle => DisplayPhase::Idle,
            DisplayState::Active { .. } => DisplayPhase::Active,
        }
    }

    /// Index of the screen currently shown.
    pub fn screen_index(&self) -> usize {
        self.screen_index.load(Ordering::Relaxed)
    }

    /// Latest view and its version.
    pub fn current_view(&self) -> (u64, Option<FlightView>) {
        let v = self.view.get();
        (v.version, v.value)
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Put the device into its idle presentation.
    ///
    /// Called once at startup so the idle policy holds before any flight.
    pub async fn apply_idle_policy(&self) {
        let enabled = self.config.idle_policy == IdlePolicy::RestorePassive;
        if let Err(e) = self.device.set_native_apps(enabled).await {
            warn!(error = %e, policy = %self.config.idle_policy, "Failed to apply idle policy");
        }
    }

    /// Feed the latest poll result into the state machine.
    ///
    /// A view outside its display radius counts as no flight.
    pub async fn on_poll(&mut self, view: Option<FlightView>) -> DisplayTransition {
        let qualifying = view.filter(FlightView::is_within_radius);
        let active = matches!(self.state, DisplayState::Active { .. });

        match (active, qualifying) {
            (false, None) => DisplayTransition::NoChange,
            (false, Some(view)) => {
                self.start(view).await;
                DisplayTransition::Started
            }
            (true, Some(view)) => {
                let version = self.view.set(Some(view));
                debug!(version, "Display view refreshed");
                DisplayTransition::Refreshed
            }
            (true, None) => {
                self.stop().await;
                DisplayTransition::Stopped
            }
        }
    }

    /// Stop rotation and leave the device clean, bounded by the grace period.
    ///
    /// Device calls still running when the grace period ends are abandoned.
    pub async fn shutdown(&mut self) {
        let deadline = Instant::now() + self.config.shutdown_grace;

        self.cancel_rotation().await;
        self.view.set(None);

        let device = Arc::clone(&self.device);
        let app = self.config.app_name.clone();
        let restore = self.config.idle_policy == IdlePolicy::RestorePassive;

        let cleanup = async move {
            if let Err(e) = device.clear_custom(&app).await {
                warn!(error = %e, "Failed to clear display on shutdown");
            }
            if restore {
                if let Err(e) = device.set_native_apps(true).await {
                    warn!(error = %e, "Failed to restore built-in apps on shutdown");
                }
            }
        };

        if tokio::time::timeout_at(deadline, cleanup).await.is_err() {
            warn!(
                grace_ms = self.config.shutdown_grace.as_millis() as u64,
                "Display cleanup timed out"
            );
        }
    }

    async fn start(&mut self, view: FlightView) {
        info!(
            identity = %view.identity,
            distance_nm = view.distance_nm,
            "Display: Idle->Active"
        );

        self.screen_index.store(Screen::Distance.index(), Ordering::Relaxed);
        self.view.set(Some(view.clone()));

        if self.config.idle_policy == IdlePolicy::RestorePassive {
            if let Err(e) = self.device.set_native_apps(false).await {
                warn!(error = %e, "Failed to hide built-in apps");
            }
        }

        let payload = render(Screen::Distance, &view, self.render_options());
        if let Err(e) = self.device.update_custom(&self.config.app_name, &payload).await {
            warn!(error = %e, "Failed to render first screen");
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_rotation(
            Arc::clone(&self.device),
            Arc::clone(&self.view),
            Arc::clone(&self.screen_index),
            self.config.app_name.clone(),
            self.config.rotation_interval,
            self.render_options(),
            cancel.clone(),
        ));

        self.state = DisplayState::Active {
            rotation: RotationTask { cancel, handle },
        };
    }

    async fn stop(&mut self) {
        info!("Display: Active->Idle");

        self.cancel_rotation().await;
        self.view.set(None);

        if let Err(e) = self.device.clear_custom(&self.config.app_name).await {
            warn!(error = %e, "Failed to clear display");
        }
        if self.config.idle_policy == IdlePolicy::RestorePassive {
            if let Err(e) = self.device.set_native_apps(true).await {
                warn!(error = %e, "Failed to restore built-in apps");
            }
        }
    }

    /// Cancel the rotation task and wait for it, aborting it if it has not
    /// stopped within the grace period.
    async fn cancel_rotation(&mut self) {
        if let DisplayState::Active { rotation } =
            std::mem::replace(&mut self.state, DisplayState::Idle)
        {
            let RotationTask { cancel, mut handle } = rotation;
            cancel.cancel();

            match tokio::time::timeout(self.config.shutdown_grace, &mut handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "Rotation task ended abnormally"),
                Err(_) => {
                    warn!("Rotation task did not stop in time, aborting");
                    handle.abort();
                }
            }
        }
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            lifetime_secs: self.config.screen_lifetime_secs,
        }
    }
}

/// Advance and render one screen per interval until cancelled.
///
/// The first tick fires one full interval after start; screen 0 has
/// already been rendered by the state machine.
async fn run_rotation<D: DisplayDevice>(
    device: Arc<D>,
    view: Arc<VersionedCell<Option<FlightView>>>,
    screen_index: Arc<AtomicUsize>,
    app_name: String,
    period: Duration,
    options: RenderOptions,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let index = (screen_index.load(Ordering::Relaxed) + 1) % SCREEN_COUNT;
                screen_index.store(index, Ordering::Relaxed);

                let Some(current) = view.get().value else {
                    continue;
                };

                let payload = render(Screen::from_index(index), &current, options);
                tokio::select! {
                    biased;

                    _ = cancel.cancelled() => break,
                    result = device.update_custom(&app_name, &payload) => {
                        if let Err(e) = result {
                            warn!(error = %e, screen = index, "Failed to render screen");
                        }
                    }
                }
            }
        }
    }

    debug!("Rotation task stopped");
}
