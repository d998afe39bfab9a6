//! The overhead tracker: all per-cycle tracking state in one place.
//!
//! # Cycle
//!
//! ```text
//!  raw observations
//!        |
//!        v
//!  filter (zone, grounded, sort by distance)
//!        |
//!        v
//!  session tracker  <-- every snapshot in the zone
//!        |
//!        v
//!  closest snapshot = active flight
//!        |
//!        +-- identity changed? --> flush export (completed), reset path
//!        |                         (seeded when continuity is ambiguous)
//!        |                         failed flush keeps the outgoing path
//!        |                         and is retried at the next cycle
//!        v
//!  active path append --> throttled export --> flight view
//! ```
//!
//! The tracker is synchronous and owns no timers. The [`Monitor`] calls
//! [`OverheadTracker::process_cycle`] once per poll with the current time.
//!
//! [`Monitor`]: super::Monitor

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::display::FlightView;
use crate::export::{ExportOutcome, ExportSource, ExportThrottle};
use crate::fs::PersistenceError;
use crate::geo::GeoPoint;
use crate::identity::{AircraftLookup, ResolvedIdentity};
use crate::path::{ActivePath, PathEntry};
use crate::session::SessionTracker;
use crate::snapshot::{filter_observations, AircraftSnapshot, RawObservation};

// =============================================================================
// Configuration
// =============================================================================

/// Zone geometry for the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Zone center.
    pub center: GeoPoint,
    /// Detection radius in nautical miles.
    pub radius_nm: f64,
    /// Radius within which a flight is shown on the display.
    pub display_radius_nm: f64,
}

impl TrackerConfig {
    /// Zone where the display radius equals the detection radius.
    pub fn new(center: GeoPoint, radius_nm: f64) -> Self {
        Self {
            center,
            radius_nm,
            display_radius_nm: radius_nm,
        }
    }

    /// Use a tighter display radius. Values above the detection radius are
    /// capped to it.
    pub fn with_display_radius(mut self, display_radius_nm: f64) -> Self {
        self.display_radius_nm = display_radius_nm.min(self.radius_nm);
        self
    }
}

// =============================================================================
// Cycle report
// =============================================================================

/// Handoff from one active flight to the next (or to none).
#[derive(Debug, Clone, PartialEq)]
pub struct Handoff {
    /// Identity that stopped being the active flight.
    pub previous: ResolvedIdentity,
    /// Identity that took over, if any.
    pub next: Option<ResolvedIdentity>,
    /// The new path was seeded with the previous flight's last entry.
    pub seeded: bool,
}

/// What one poll cycle did.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    /// Observations returned by the feed.
    pub observed: usize,
    /// Snapshots inside the zone.
    pub in_zone: usize,
    /// Identity of the closest flight.
    pub active: Option<ResolvedIdentity>,
    /// Set when the active flight changed.
    pub handoff: Option<Handoff>,
    /// Result of the final-approach flush, if one happened.
    pub flush: Option<ExportOutcome>,
    /// Result of the regular export, if one was attempted and succeeded.
    pub export: Option<ExportOutcome>,
    /// View of the closest flight for the display.
    pub view: Option<FlightView>,
}

// =============================================================================
// Tracker
// =============================================================================

/// Final-approach flush that failed and is still owed.
struct PendingFlush {
    identity: ResolvedIdentity,
    path: ActivePath,
}

/// Owns sessions, the active path and the export throttle.
pub struct OverheadTracker {
    config: TrackerConfig,
    sessions: SessionTracker,
    path: ActivePath,
    active: Option<ResolvedIdentity>,
    export: ExportThrottle,
    lookup: Box<dyn AircraftLookup>,
    pending_flush: Option<PendingFlush>,
}

impl OverheadTracker {
    pub fn new(
        config: TrackerConfig,
        sessions: SessionTracker,
        export: ExportThrottle,
        lookup: Box<dyn AircraftLookup>,
    ) -> Self {
        Self {
            config,
            sessions,
            path: ActivePath::new(),
            active: None,
            export,
            lookup,
            pending_flush: None,
        }
    }

    /// Replace the path buffer (capacity or sampling changes).
    pub fn with_path(mut self, path: ActivePath) -> Self {
        self.path = path;
        self
    }

    /// Load stored history into the session tracker.
    pub fn load_history(&mut self) -> Result<usize, PersistenceError> {
        self.sessions.load()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }

    pub fn path(&self) -> &ActivePath {
        &self.path
    }

    /// Identity of the flight currently tracked on the path.
    pub fn active(&self) -> Option<&ResolvedIdentity> {
        self.active.as_ref()
    }

    /// Whether a departed flight's final document still has to be written.
    pub fn has_pending_flush(&self) -> bool {
        self.pending_flush.is_some()
    }

    /// Run one poll cycle over the feed's observations.
    pub fn process_cycle(
        &mut self,
        observations: &[RawObservation],
        now: DateTime<Utc>,
    ) -> CycleReport {
        let snapshots = filter_observations(
            observations,
            self.config.center,
            self.config.radius_nm,
            now,
        );

        let mut report = CycleReport {
            observed: observations.len(),
            in_zone: snapshots.len(),
            ..CycleReport::default()
        };

        // Every in-zone snapshot feeds its session; the first one is closest.
        let mut closest: Option<(ResolvedIdentity, &AircraftSnapshot)> = None;
        for snapshot in &snapshots {
            let outcome = self.sessions.track(snapshot, now);
            if closest.is_none() {
                if let Some(identity) = outcome.identity() {
                    closest = Some((identity.clone(), snapshot));
                }
            }
        }

        if let Some(pending) = self.pending_flush.take() {
            match publish_path(
                &mut self.export,
                &self.sessions,
                &pending.path,
                Some(&pending.identity),
                true,
            ) {
                Some(outcome) => {
                    info!(identity = %pending.identity, "Published pending final approach");
                    report.flush = Some(outcome);
                }
                None => self.pending_flush = Some(pending),
            }
        }

        let next = closest.as_ref().map(|(identity, _)| identity.clone());

        if let Some(previous) = self.active.clone() {
            if next.as_ref() != Some(&previous) {
                let seed = closest
                    .as_ref()
                    .and_then(|(identity, snapshot)| {
                        self.continuity_seed(&previous, identity, snapshot)
                    });
                let seeded = seed.is_some();
                let path_len = self.path.len();
                let path_secs = self.path.time_span().map(|d| d.num_seconds()).unwrap_or(0);

                match self.publish(true) {
                    Some(outcome) => {
                        // A newer final document supersedes an older one.
                        self.pending_flush = None;
                        report.flush = Some(outcome);
                    }
                    None => {
                        self.pending_flush = Some(PendingFlush {
                            identity: previous.clone(),
                            path: self.path.split_off(),
                        });
                    }
                }
                self.path.reset(seed);

                info!(
                    previous = %previous,
                    next = next.as_ref().map(|n| n.key.as_str()).unwrap_or("-"),
                    seeded,
                    path_len,
                    path_secs,
                    "Active flight changed"
                );

                report.handoff = Some(Handoff {
                    previous,
                    next: next.clone(),
                    seeded,
                });
            }
        }

        match closest {
            Some((identity, snapshot)) => {
                self.path.append(snapshot.clone(), self.lookup.as_ref());
                self.active = Some(identity.clone());

                if report.flush.is_none() && self.pending_flush.is_none() {
                    report.export = self.publish(false);
                }

                let aircraft = self.path.latest().and_then(|e| e.aircraft.as_ref());
                let view = FlightView::build(
                    &identity.key,
                    snapshot,
                    aircraft,
                    self.sessions.get(&identity.key),
                    self.config.display_radius_nm,
                );
                report.view = Some(view.with_heading(self.path.heading()));
                report.active = Some(identity);
            }
            None => {
                self.active = None;
                // Idle cycles only publish the initial document.
                if report.flush.is_none()
                    && self.pending_flush.is_none()
                    && !self.export.has_written()
                {
                    report.export = self.publish(false);
                }
            }
        }

        debug!(
            observed = report.observed,
            in_zone = report.in_zone,
            active = report.active.as_ref().map(|a| a.key.as_str()).unwrap_or("-"),
            path_len = self.path.len(),
            "Cycle processed"
        );

        report
    }

    /// The outgoing flight's last entry, when the incoming one may be the
    /// same airframe under a different identity.
    ///
    /// Continuity is ambiguous when the ICAO addresses match or either
    /// identity was not resolved from a callsign or registration.
    fn continuity_seed(
        &self,
        previous: &ResolvedIdentity,
        next: &ResolvedIdentity,
        snapshot: &AircraftSnapshot,
    ) -> Option<PathEntry> {
        let last = self.path.latest()?;

        let same_airframe = matches!(
            (last.snapshot.icao.as_deref(), snapshot.icao.as_deref()),
            (Some(a), Some(b)) if a.eq_ignore_ascii_case(b)
        );
        let weak_identity = !previous.basis.is_confident() || !next.basis.is_confident();

        (same_airframe || weak_identity).then(|| last.clone())
    }

    /// Export the active path.
    fn publish(&mut self, force_flush: bool) -> Option<ExportOutcome> {
        publish_path(
            &mut self.export,
            &self.sessions,
            &self.path,
            self.active.as_ref(),
            force_flush,
        )
    }
}

/// Write the export document for `path`. Failures are logged and reported
/// as `None`.
fn publish_path(
    export: &mut ExportThrottle,
    sessions: &SessionTracker,
    path: &ActivePath,
    active: Option<&ResolvedIdentity>,
    force_flush: bool,
) -> Option<ExportOutcome> {
    let source = ExportSource {
        path,
        active_session: active.and_then(|identity| sessions.get(&identity.key)),
        best_session: sessions.best_session(),
    };

    match export.export(&source, force_flush) {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            warn!(error = %e, force_flush, "Export failed, will retry next cycle");
            None
        }
    }
}
