//! Session tracker: folds snapshots into per-identity sessions.
//!
//! Sessions are keyed purely by resolved identity. An aircraft that leaves
//! the zone and comes back later continues its earlier session; there is no
//! time window that splits passes.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::fs::PersistenceError;
use crate::identity::{resolve_identity, ResolvedIdentity};
use crate::snapshot::AircraftSnapshot;

use super::history::{HistoryStore, SessionTable};
use super::model::FlightSession;

/// Result of tracking one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackOutcome {
    /// No session exists and the snapshot is outside the radius.
    Ignored,
    /// A new session was opened.
    Created { identity: ResolvedIdentity },
    /// An existing session was updated.
    Updated {
        identity: ResolvedIdentity,
        /// The snapshot set a new closest approach.
        closer: bool,
    },
}

impl TrackOutcome {
    /// Identity of the created or updated session.
    pub fn identity(&self) -> Option<&ResolvedIdentity> {
        match self {
            TrackOutcome::Ignored => None,
            TrackOutcome::Created { identity } | TrackOutcome::Updated { identity, .. } => {
                Some(identity)
            }
        }
    }
}

/// In-memory session table with write-through persistence.
///
/// The in-memory table is authoritative. A failed save is logged and the
/// next successful save carries every pending change.
pub struct SessionTracker {
    sessions: SessionTable,
    store: Box<dyn HistoryStore>,
    radius_nm: f64,
}

impl SessionTracker {
    /// Create an empty tracker. Call [`load`](Self::load) to pick up history.
    pub fn new(store: Box<dyn HistoryStore>, radius_nm: f64) -> Self {
        Self {
            sessions: SessionTable::new(),
            store,
            radius_nm,
        }
    }

    /// Replace the in-memory table with the stored history.
    ///
    /// Returns the number of sessions loaded.
    pub fn load(&mut self) -> Result<usize, PersistenceError> {
        self.sessions = self.store.load()?;
        info!(sessions = self.sessions.len(), "Loaded flight history");
        Ok(self.sessions.len())
    }

    /// Fold one snapshot into its session.
    pub fn track(&mut self, snapshot: &AircraftSnapshot, now: DateTime<Utc>) -> TrackOutcome {
        let identity = resolve_identity(
            snapshot.callsign.as_deref(),
            snapshot.registration.as_deref(),
            snapshot.type_code.as_deref(),
        );

        let outcome = match self.sessions.get_mut(&identity.key) {
            Some(session) => {
                let closer = session.observe(snapshot, now);
                if closer {
                    debug!(
                        identity = %identity,
                        distance_nm = session.closest_distance_nm,
                        "New closest approach"
                    );
                }
                TrackOutcome::Updated { identity, closer }
            }
            None if snapshot.distance_nm > self.radius_nm => return TrackOutcome::Ignored,
            None => {
                let session = FlightSession::start(&identity, snapshot, now);
                info!(
                    identity = %identity,
                    basis = ?identity.basis,
                    distance_nm = snapshot.distance_nm,
                    altitude_ft = snapshot.altitude_ft,
                    "New flight session"
                );
                self.sessions.insert(identity.key.clone(), session);
                TrackOutcome::Created { identity }
            }
        };

        self.persist();
        outcome
    }

    /// Session with the smallest closest distance.
    ///
    /// Ties go to the most recently seen session.
    pub fn best_session(&self) -> Option<&FlightSession> {
        self.sessions.values().min_by(|a, b| {
            a.closest_distance_nm
                .total_cmp(&b.closest_distance_nm)
                .then_with(|| b.last_seen.cmp(&a.last_seen))
        })
    }

    /// Session for an identity key.
    pub fn get(&self, identity: &str) -> Option<&FlightSession> {
        self.sessions.get(identity)
    }

    /// All sessions, ordered by identity.
    pub fn sessions(&self) -> impl Iterator<Item = &FlightSession> {
        self.sessions.values()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Detection radius in nautical miles.
    pub fn radius_nm(&self) -> f64 {
        self.radius_nm
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.sessions) {
            warn!(error = %e, "Failed to save flight history, keeping in-memory state");
        }
    }
}

impl std::fmt::Debug for SessionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTracker")
            .field("sessions", &self.sessions.len())
            .field("radius_nm", &self.radius_nm)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdentityBasis;
    use chrono::Duration;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// In-memory store that can be told to fail.
    #[derive(Default, Clone)]
    struct MockStore {
        saved: Arc<Mutex<Option<SessionTable>>>,
        saves: Arc<AtomicUsize>,
        fail: Arc<AtomicBool>,
    }

    impl HistoryStore for MockStore {
        fn load(&self) -> Result<SessionTable, PersistenceError> {
            Ok(self.saved.lock().unwrap().clone().unwrap_or_default())
        }

        fn save(&self, sessions: &SessionTable) -> Result<(), PersistenceError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(PersistenceError::Io {
                    path: "flights.json".into(),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
                });
            }
            *self.saved.lock().unwrap() = Some(sessions.clone());
            Ok(())
        }
    }

    fn snapshot(callsign: Option<&str>, registration: Option<&str>, distance: f64) -> AircraftSnapshot {
        AircraftSnapshot {
            callsign: callsign.map(str::to_string),
            registration: registration.map(str::to_string),
            icao: None,
            latitude: 45.6,
            longitude: -122.5,
            altitude_ft: 2800,
            ground_speed_kt: 150.0,
            heading: None,
            vertical_rate_fpm: 0,
            squawk: None,
            type_code: None,
            origin: None,
            destination: None,
            flight_number: None,
            observed_at: Utc::now(),
            distance_nm: distance,
        }
    }

    fn tracker(store: &MockStore) -> SessionTracker {
        SessionTracker::new(Box::new(store.clone()), 2.0)
    }

    #[test]
    fn test_outside_radius_without_session_is_ignored() {
        let store = MockStore::default();
        let mut tracker = tracker(&store);

        let outcome = tracker.track(&snapshot(Some("ASA416"), None, 2.5), Utc::now());
        assert_eq!(outcome, TrackOutcome::Ignored);
        assert!(tracker.is_empty());
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_create_then_update() {
        let store = MockStore::default();
        let mut tracker = tracker(&store);
        let t0 = Utc::now();

        let outcome = tracker.track(&snapshot(Some("ASA416"), None, 1.2), t0);
        assert!(matches!(outcome, TrackOutcome::Created { .. }));

        let outcome = tracker.track(&snapshot(Some("ASA416"), None, 0.7), t0 + Duration::seconds(5));
        assert!(matches!(outcome, TrackOutcome::Updated { closer: true, .. }));

        // Existing sessions keep updating even outside the radius
        let outcome = tracker.track(&snapshot(Some("ASA416"), None, 2.4), t0 + Duration::seconds(9));
        assert!(matches!(outcome, TrackOutcome::Updated { closer: false, .. }));

        let session = tracker.get("ASA416").unwrap();
        assert_eq!(session.closest_distance_nm, 0.7);
        assert_eq!(session.duration_secs, 9);
        assert_eq!(store.saves.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_type_code_callsign_keys_on_registration() {
        let store = MockStore::default();
        let mut tracker = tracker(&store);

        let mut snap = snapshot(Some("C56X"), Some("N123AB"), 0.9);
        snap.type_code = Some("C56X".to_string());
        let outcome = tracker.track(&snap, Utc::now());

        let identity = outcome.identity().unwrap();
        assert_eq!(identity.key, "N123AB");
        assert_eq!(identity.basis, IdentityBasis::Registration);
    }

    #[test]
    fn test_reappearance_merges_into_one_session() {
        let store = MockStore::default();
        let mut tracker = tracker(&store);
        let t0 = Utc::now();

        tracker.track(&snapshot(Some("N55ZZ"), None, 1.0), t0);
        // Zone empty for twenty minutes, then the same aircraft returns
        tracker.track(&snapshot(Some("N55ZZ"), None, 0.6), t0 + Duration::minutes(20));

        assert_eq!(tracker.len(), 1);
        let session = tracker.get("N55ZZ").unwrap();
        assert_eq!(session.first_seen, t0);
        assert_eq!(session.duration_secs, 20 * 60);
        assert_eq!(session.closest_distance_nm, 0.6);
    }

    #[test]
    fn test_save_failure_keeps_memory_and_recovers() {
        let store = MockStore::default();
        let mut tracker = tracker(&store);
        let t0 = Utc::now();

        store.fail.store(true, Ordering::SeqCst);
        tracker.track(&snapshot(Some("ASA416"), None, 1.2), t0);
        tracker.track(&snapshot(Some("UAL9"), None, 1.4), t0);
        assert_eq!(tracker.len(), 2);
        assert!(store.saved.lock().unwrap().is_none());

        store.fail.store(false, Ordering::SeqCst);
        tracker.track(&snapshot(Some("ASA416"), None, 1.1), t0);
        assert_eq!(store.saved.lock().unwrap().as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_best_session_prefers_closest_then_most_recent() {
        let store = MockStore::default();
        let mut tracker = tracker(&store);
        let t0 = Utc::now();

        tracker.track(&snapshot(Some("ASA416"), None, 0.5), t0);
        tracker.track(&snapshot(Some("UAL9"), None, 1.5), t0 + Duration::seconds(10));
        tracker.track(&snapshot(Some("DAL22"), None, 0.5), t0 + Duration::seconds(20));

        assert_eq!(tracker.best_session().unwrap().identity, "DAL22");
    }

    #[test]
    fn test_load_restores_history() {
        let store = MockStore::default();
        let t0 = Utc::now();
        {
            let mut first = tracker(&store);
            first.track(&snapshot(Some("ASA416"), None, 0.5), t0);
        }

        let mut second = tracker(&store);
        assert_eq!(second.load().unwrap(), 1);
        assert!(second.get("ASA416").is_some());
    }
}
