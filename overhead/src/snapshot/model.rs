//! Observation and snapshot types.
//!
//! [`RawObservation`] is what a feed hands us: every field optional except
//! the ground flag. [`AircraftSnapshot`] is an observation that survived
//! filtering and carries its computed distance from the zone center.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One aircraft record as returned by a flight feed, before filtering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawObservation {
    /// 24-bit ICAO address as hex (e.g. "A1B2C3").
    pub icao: Option<String>,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
    /// Ground track / heading in degrees.
    pub heading: Option<f64>,
    /// Barometric altitude in feet.
    pub altitude_ft: Option<i32>,
    /// Ground speed in knots.
    pub ground_speed_kt: Option<f64>,
    /// Transponder code.
    pub squawk: Option<String>,
    /// ICAO aircraft type designator (e.g. "B739").
    pub type_code: Option<String>,
    /// Registration / tail number.
    pub registration: Option<String>,
    /// Time of the position report.
    pub timestamp: Option<DateTime<Utc>>,
    /// Origin airport code.
    pub origin: Option<String>,
    /// Destination airport code.
    pub destination: Option<String>,
    /// Marketing flight number (e.g. "AS416").
    pub flight_number: Option<String>,
    /// Whether the feed reports the aircraft on the ground.
    pub on_ground: bool,
    /// Vertical rate in feet per minute.
    pub vertical_rate_fpm: Option<i32>,
    /// ATC callsign (e.g. "ASA416").
    pub callsign: Option<String>,
}

/// An airborne aircraft inside the zone at one instant.
///
/// Immutable once produced by the snapshot filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AircraftSnapshot {
    pub callsign: Option<String>,
    pub registration: Option<String>,
    pub icao: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_ft: i32,
    pub ground_speed_kt: f64,
    pub heading: Option<f64>,
    pub vertical_rate_fpm: i32,
    pub squawk: Option<String>,
    pub type_code: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub flight_number: Option<String>,
    /// When the position was observed.
    pub observed_at: DateTime<Utc>,
    /// Great-circle distance from the zone center in nautical miles.
    pub distance_nm: f64,
}

impl AircraftSnapshot {
    /// Build a snapshot from an observation with known coordinates.
    ///
    /// Returns `None` if the observation has no position. Missing numeric
    /// values default to zero; `fallback_time` is used when the feed did
    /// not timestamp the record.
    pub fn from_observation(
        observation: &RawObservation,
        distance_nm: f64,
        fallback_time: DateTime<Utc>,
    ) -> Option<Self> {
        Some(Self {
            callsign: clean(observation.callsign.as_deref()),
            registration: clean(observation.registration.as_deref()),
            icao: clean(observation.icao.as_deref()),
            latitude: observation.latitude?,
            longitude: observation.longitude?,
            altitude_ft: observation.altitude_ft.unwrap_or(0),
            ground_speed_kt: observation.ground_speed_kt.unwrap_or(0.0),
            heading: observation.heading,
            vertical_rate_fpm: observation.vertical_rate_fpm.unwrap_or(0),
            squawk: clean(observation.squawk.as_deref()),
            type_code: clean(observation.type_code.as_deref()),
            origin: clean(observation.origin.as_deref()),
            destination: clean(observation.destination.as_deref()),
            flight_number: clean(observation.flight_number.as_deref()),
            observed_at: observation.timestamp.unwrap_or(fallback_time),
            distance_nm,
        })
    }

    /// "ORIGIN-DEST" if at least one end of the route is known.
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

/// Trim, uppercase and drop empty identifier strings.
fn clean(value: Option<&str>) -> Option<String> {
    let v = value?.trim();
    if v.is_empty() {
        None
    } else {
        Some(v.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation() -> RawObservation {
        RawObservation {
            icao: Some("a1b2c3".to_string()),
            latitude: Some(45.63),
            longitude: Some(-122.53),
            altitude_ft: Some(3200),
            ground_speed_kt: Some(180.0),
            callsign: Some(" asa416 ".to_string()),
            origin: Some("PDX".to_string()),
            destination: Some("".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_observation_cleans_identifiers() {
        let snap = AircraftSnapshot::from_observation(&observation(), 0.4, Utc::now()).unwrap();
        assert_eq!(snap.callsign.as_deref(), Some("ASA416"));
        assert_eq!(snap.icao.as_deref(), Some("A1B2C3"));
        assert_eq!(snap.destination, None);
        assert_eq!(snap.altitude_ft, 3200);
        assert_eq!(snap.distance_nm, 0.4);
    }

    #[test]
    fn test_from_observation_requires_position() {
        let mut obs = observation();
        obs.longitude = None;
        assert!(AircraftSnapshot::from_observation(&obs, 0.4, Utc::now()).is_none());
    }

    #[test]
    fn test_route_formatting() {
        let mut snap = AircraftSnapshot::from_observation(&observation(), 0.4, Utc::now()).unwrap();
        assert_eq!(snap.route().as_deref(), Some("PDX-???"));

        snap.origin = None;
        assert_eq!(snap.route(), None);

        snap.origin = Some("PDX".to_string());
        snap.destination = Some("SEA".to_string());
        assert_eq!(snap.route().as_deref(), Some("PDX-SEA"));
    }
}
