//! Published closest-approach document.
//!
//! [`WebExportSnapshot`] is a pure projection of the active path and the
//! session history. Field names are camelCase for web consumers:
//!
//! ```json
//! {
//!   "closestApproach": { "distance": 0.42, "altitude": 2400, "speed": 160,
//!                        "timestamp": "...", "lat": 45.6, "lon": -122.5,
//!                        "precision": "high" },
//!   "flight": { "callsign": "ASA416", "aircraftType": "737-900",
//!               "origin": "SFO", "destination": "PDX" },
//!   "overheadScore": 0.42,
//!   "isOverhead": true,
//!   "pathSnapshots": 12,
//!   "status": "tracking",
//!   "timestamp": "..."
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::display::FALLBACK_TYPE_LABEL;
use crate::identity::{FieldChain, FieldSource, UNKNOWN_IDENTITY};
use crate::path::ActivePath;
use crate::session::FlightSession;

/// Distance below which a pass counts as overhead.
pub const OVERHEAD_THRESHOLD_NM: f64 = 1.0;

/// Path length at which the closest approach is considered high precision.
const HIGH_PRECISION_MIN_ENTRIES: usize = 3;

/// How the closest approach was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// Three or more path entries.
    High,
    /// One or two path entries.
    Tracked,
    /// From session history only.
    Estimated,
}

/// Lifecycle of the exported flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStatus {
    /// The flight is in the zone now.
    Tracking,
    /// The flight has left; values are final.
    Completed,
    /// Nothing has been seen yet.
    Waiting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosestApproach {
    /// Nautical miles, two decimals.
    pub distance: f64,
    /// Feet.
    pub altitude: i32,
    /// Knots.
    pub speed: i32,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub lon: Option<f64>,
    pub precision: Precision,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFlight {
    pub callsign: String,
    pub aircraft_type: String,
    pub origin: Option<String>,
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub flight_number: Option<String>,
}

/// The published document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebExportSnapshot {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub closest_approach: Option<ClosestApproach>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub flight: Option<ExportFlight>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub overhead_score: Option<f64>,
    #[serde(default)]
    pub is_overhead: bool,
    #[serde(default)]
    pub path_snapshots: usize,
    pub status: ExportStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Inputs to the projection.
#[derive(Debug, Clone, Copy)]
pub struct ExportSource<'a> {
    /// Path of the session currently in the zone.
    pub path: &'a ActivePath,
    /// Session the path belongs to, if any.
    pub active_session: Option<&'a FlightSession>,
    /// Best session in history, used when the path is empty.
    pub best_session: Option<&'a FlightSession>,
}

impl WebExportSnapshot {
    /// Project the closest known approach.
    ///
    /// Prefers the active path; falls back to the best historical session.
    /// `completed` marks the flight as having left the zone.
    pub fn project(source: &ExportSource<'_>, completed: bool, now: DateTime<Utc>) -> Self {
        if let Some(entry) = source.path.closest() {
            let snap = &entry.snapshot;
            let precision = if source.path.len() >= HIGH_PRECISION_MIN_ENTRIES {
                Precision::High
            } else {
                Precision::Tracked
            };

            let callsign = FieldChain::new()
                .then(FieldSource::Observation, snap.callsign.as_deref())
                .then(
                    FieldSource::Session,
                    source.active_session.map(|s| s.identity.as_str()),
                )
                .value_or(UNKNOWN_IDENTITY)
                .to_string();

            let aircraft_type = FieldChain::new()
                .then(
                    FieldSource::Enrichment,
                    entry.aircraft.as_ref().and_then(|a| a.friendly_name.as_deref()),
                )
                .then(FieldSource::Observation, snap.type_code.as_deref())
                .value_or(FALLBACK_TYPE_LABEL)
                .to_string();

            let status = if completed {
                ExportStatus::Completed
            } else {
                ExportStatus::Tracking
            };

            return Self::found(
                ClosestApproach {
                    distance: round2(snap.distance_nm),
                    altitude: snap.altitude_ft,
                    speed: snap.ground_speed_kt.round() as i32,
                    timestamp: snap.observed_at,
                    lat: Some(snap.latitude),
                    lon: Some(snap.longitude),
                    precision,
                },
                ExportFlight {
                    callsign,
                    aircraft_type,
                    origin: snap.origin.clone(),
                    destination: snap.destination.clone(),
                    flight_number: snap.flight_number.clone(),
                },
                snap.distance_nm,
                source.path.len(),
                status,
                now,
            );
        }

        if let Some(session) = source.best_session {
            return Self::found(
                ClosestApproach {
                    distance: round2(session.closest_distance_nm),
                    altitude: session.closest_altitude_ft,
                    speed: session.closest_speed_kt.round() as i32,
                    timestamp: session.closest_at,
                    lat: None,
                    lon: None,
                    precision: Precision::Estimated,
                },
                ExportFlight {
                    callsign: session.callsign.clone().unwrap_or_else(|| session.identity.clone()),
                    aircraft_type: session
                        .type_code
                        .clone()
                        .unwrap_or_else(|| FALLBACK_TYPE_LABEL.to_string()),
                    origin: session.origin.clone(),
                    destination: session.destination.clone(),
                    flight_number: session.flight_number.clone(),
                },
                session.closest_distance_nm,
                0,
                ExportStatus::Completed,
                now,
            );
        }

        Self::waiting(now)
    }

    /// Document published before any flight has been seen.
    pub fn waiting(now: DateTime<Utc>) -> Self {
        Self {
            closest_approach: None,
            flight: None,
            overhead_score: None,
            is_overhead: false,
            path_snapshots: 0,
            status: ExportStatus::Waiting,
            message: Some("No flights detected yet".to_string()),
            timestamp: now,
        }
    }

    fn found(
        closest: ClosestApproach,
        flight: ExportFlight,
        distance_nm: f64,
        path_snapshots: usize,
        status: ExportStatus,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            overhead_score: Some(closest.distance),
            is_overhead: distance_nm < OVERHEAD_THRESHOLD_NM,
            closest_approach: Some(closest),
            flight: Some(flight),
            path_snapshots,
            status,
            message: None,
            timestamp: now,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{resolve_identity, AircraftInfo};
    use crate::path::PathEntry;
    use crate::snapshot::AircraftSnapshot;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 2, 17, 45, 0).unwrap()
    }

    fn snapshot(distance: f64) -> AircraftSnapshot {
        AircraftSnapshot {
            callsign: Some("ASA416".to_string()),
            registration: None,
            icao: None,
            latitude: 45.61,
            longitude: -122.52,
            altitude_ft: 2400,
            ground_speed_kt: 159.6,
            heading: None,
            vertical_rate_fpm: -700,
            squawk: None,
            type_code: Some("B739".to_string()),
            origin: Some("SFO".to_string()),
            destination: Some("PDX".to_string()),
            flight_number: Some("AS416".to_string()),
            observed_at: now(),
            distance_nm: distance,
        }
    }

    fn path(distances: &[f64]) -> ActivePath {
        let mut path = ActivePath::new();
        for d in distances {
            let info = AircraftInfo {
                friendly_name: Some("737-900".to_string()),
                ..Default::default()
            };
            path.push(PathEntry::new(snapshot(*d), Some(info)));
        }
        path
    }

    #[test]
    fn test_projection_from_path() {
        let path = path(&[1.2, 0.4234, 0.9]);
        let source = ExportSource {
            path: &path,
            active_session: None,
            best_session: None,
        };

        let doc = WebExportSnapshot::project(&source, false, now());
        let closest = doc.closest_approach.as_ref().unwrap();
        assert_eq!(closest.distance, 0.42);
        assert_eq!(closest.speed, 160);
        assert_eq!(closest.precision, Precision::High);
        assert_eq!(doc.overhead_score, Some(0.42));
        assert!(doc.is_overhead);
        assert_eq!(doc.path_snapshots, 3);
        assert_eq!(doc.status, ExportStatus::Tracking);

        let flight = doc.flight.as_ref().unwrap();
        assert_eq!(flight.callsign, "ASA416");
        assert_eq!(flight.aircraft_type, "737-900");
    }

    #[test]
    fn test_short_path_is_tracked_and_completed_when_flushed() {
        let path = path(&[1.4, 1.3]);
        let source = ExportSource {
            path: &path,
            active_session: None,
            best_session: None,
        };

        let doc = WebExportSnapshot::project(&source, true, now());
        assert_eq!(doc.closest_approach.unwrap().precision, Precision::Tracked);
        assert!(!doc.is_overhead);
        assert_eq!(doc.status, ExportStatus::Completed);
    }

    #[test]
    fn test_history_fallback_is_estimated() {
        let empty = ActivePath::new();
        let session = FlightSession::start(
            &resolve_identity(Some("ASA416"), None, None),
            &snapshot(0.77),
            now(),
        );
        let source = ExportSource {
            path: &empty,
            active_session: None,
            best_session: Some(&session),
        };

        let doc = WebExportSnapshot::project(&source, false, now());
        let closest = doc.closest_approach.as_ref().unwrap();
        assert_eq!(closest.precision, Precision::Estimated);
        assert_eq!(closest.lat, None);
        assert_eq!(doc.flight.as_ref().unwrap().aircraft_type, "B739");
        assert_eq!(doc.status, ExportStatus::Completed);
    }

    #[test]
    fn test_waiting_when_nothing_known() {
        let empty = ActivePath::new();
        let source = ExportSource {
            path: &empty,
            active_session: None,
            best_session: None,
        };

        let doc = WebExportSnapshot::project(&source, false, now());
        assert_eq!(doc.status, ExportStatus::Waiting);

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["status"], "waiting");
        assert!(json.get("closestApproach").is_none());
    }

    #[test]
    fn test_camel_case_field_names() {
        let path = path(&[0.5]);
        let source = ExportSource {
            path: &path,
            active_session: None,
            best_session: None,
        };

        let json = serde_json::to_value(WebExportSnapshot::project(&source, false, now())).unwrap();
        assert!(json.get("closestApproach").is_some());
        assert!(json.get("overheadScore").is_some());
        assert!(json.get("isOverhead").is_some());
        assert!(json.get("pathSnapshots").is_some());
        assert_eq!(json["flight"]["aircraftType"], "737-900");
    }
}
