//! Flight session record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{IdentityBasis, ResolvedIdentity};
use crate::snapshot::AircraftSnapshot;

/// Aggregate record for one aircraft's passage through the zone.
///
/// Keyed by resolved identity. Descriptive fields (route, type, ICAO,
/// registration, flight number) are filled the first time a snapshot
/// carries them and never overwritten afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSession {
    /// Resolved identity key.
    pub identity: String,
    /// Which identifier the key was resolved from.
    pub basis: IdentityBasis,

    #[serde(default)]
    pub callsign: Option<String>,
    #[serde(default)]
    pub registration: Option<String>,
    #[serde(default)]
    pub icao: Option<String>,
    #[serde(default)]
    pub type_code: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub flight_number: Option<String>,

    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    /// Seconds between first and last sighting.
    pub duration_secs: i64,

    pub closest_distance_nm: f64,
    pub closest_altitude_ft: i32,
    pub closest_speed_kt: f64,
    /// When the closest distance was observed.
    pub closest_at: DateTime<Utc>,

    pub initial_distance_nm: f64,
    pub initial_altitude_ft: i32,
    pub initial_speed_kt: f64,
}

impl FlightSession {
    /// Open a session from its first snapshot.
    pub fn start(identity: &ResolvedIdentity, snapshot: &AircraftSnapshot, now: DateTime<Utc>) -> Self {
        Self {
            identity: identity.key.clone(),
            basis: identity.basis,
            callsign: snapshot.callsign.clone(),
            registration: snapshot.registration.clone(),
            icao: snapshot.icao.clone(),
            type_code: snapshot.type_code.clone(),
            origin: snapshot.origin.clone(),
            destination: snapshot.destination.clone(),
            flight_number: snapshot.flight_number.clone(),
            first_seen: now,
            last_seen: now,
            duration_secs: 0,
            closest_distance_nm: snapshot.distance_nm,
            closest_altitude_ft: snapshot.altitude_ft,
            closest_speed_kt: snapshot.ground_speed_kt,
            closest_at: now,
            initial_distance_nm: snapshot.distance_nm,
            initial_altitude_ft: snapshot.altitude_ft,
            initial_speed_kt: snapshot.ground_speed_kt,
        }
    }

    /// Fold a later snapshot into the session.
    ///
    /// Returns `true` if the snapshot set a new closest approach.
    pub fn observe(&mut self, snapshot: &AircraftSnapshot, now: DateTime<Utc>) -> bool {
        self.last_seen = now;
        self.duration_secs = (self.last_seen - self.first_seen).num_seconds().max(0);

        let closer = snapshot.distance_nm < self.closest_distance_nm;
        if closer {
            self.closest_distance_nm = snapshot.distance_nm;
            self.closest_altitude_ft = snapshot.altitude_ft;
            self.closest_speed_kt = snapshot.ground_speed_kt;
            self.closest_at = now;
        }

        first_write(&mut self.callsign, &snapshot.callsign);
        first_write(&mut self.registration, &snapshot.registration);
        first_write(&mut self.icao, &snapshot.icao);
        first_write(&mut self.type_code, &snapshot.type_code);
        first_write(&mut self.origin, &snapshot.origin);
        first_write(&mut self.destination, &snapshot.destination);
        first_write(&mut self.flight_number, &snapshot.flight_number);

        closer
    }

    /// "ORIGIN-DEST" if at least one end is known.
    pub fn route(&self) -> Option<String> {
        match (self.origin.as_deref(), self.destination.as_deref()) {
            (None, None) => None,
            (from, to) => Some(format!(
                "{}-{}",
                from.unwrap_or("???"),
                to.unwrap_or("???")
            )),
        }
    }
}

fn first_write(slot: &mut Option<String>, value: &Option<String>) {
    if slot.is_none() {
        slot.clone_from(value);
    }
}
