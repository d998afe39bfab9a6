//! Presentation-ready view of the closest flight.

use crate::identity::{
    airline_code, classify_aircraft, AircraftClass, AircraftInfo, FieldChain, FieldSource,
};
use crate::session::FlightSession;
use crate::snapshot::AircraftSnapshot;

/// Label used when no type information is available.
pub const FALLBACK_TYPE_LABEL: &str = "Plane";

/// Everything the screens need to render one flight.
///
/// Built by the poll loop and shared with the rotation task through a
/// versioned cell; screens never see raw feed data.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightView {
    /// Resolved identity key.
    pub identity: String,
    pub callsign: Option<String>,
    pub registration: Option<String>,
    /// Airline designator ("ASA") for commercial traffic.
    pub airline: Option<String>,
    /// Short type code ("B739").
    pub type_code: Option<String>,
    /// Human-friendly type ("737-900"), or [`FALLBACK_TYPE_LABEL`].
    pub type_label: String,
    pub origin: Option<String>,
    pub destination: Option<String>,
    /// Direction of travel in degrees, 0 = North.
    pub heading: Option<f64>,
    pub class: AircraftClass,
    pub distance_nm: f64,
    pub altitude_ft: i32,
    pub ground_speed_kt: f64,
    /// Radius the distance is measured against for tiers and progress.
    pub radius_nm: f64,
}

impl FlightView {
    /// Build a view from the newest snapshot, its enrichment and session.
    ///
    /// Field precedence: enrichment, then the live observation, then the
    /// stored session.
    pub fn build(
        identity: &str,
        snapshot: &AircraftSnapshot,
        aircraft: Option<&AircraftInfo>,
        session: Option<&FlightSession>,
        radius_nm: f64,
    ) -> Self {
        let type_code = FieldChain::new()
            .then(FieldSource::Enrichment, aircraft.and_then(|a| a.type_code.as_deref()))
            .then(FieldSource::Observation, snapshot.type_code.as_deref())
            .then(FieldSource::Session, session.and_then(|s| s.type_code.as_deref()))
            .value()
            .map(str::to_string);

        let type_label = FieldChain::new()
            .then(FieldSource::Enrichment, aircraft.and_then(|a| a.friendly_name.as_deref()))
            .then(FieldSource::Observation, snapshot.type_code.as_deref())
            .then(FieldSource::Session, session.and_then(|s| s.type_code.as_deref()))
            .value_or(FALLBACK_TYPE_LABEL)
            .to_string();

        let callsign = FieldChain::new()
            .then(FieldSource::Observation, snapshot.callsign.as_deref())
            .then(FieldSource::Session, session.and_then(|s| s.callsign.as_deref()))
            .value()
            .map(str::to_string);

        let registration = FieldChain::new()
            .then(FieldSource::Enrichment, aircraft.and_then(|a| a.registration.as_deref()))
            .then(FieldSource::Observation, snapshot.registration.as_deref())
            .then(FieldSource::Session, session.and_then(|s| s.registration.as_deref()))
            .value()
            .map(str::to_string);

        let airline = aircraft
            .and_then(|a| a.airline_code.clone())
            .or_else(|| callsign.as_deref().and_then(airline_code));

        // Origin and destination come from one source, never mixed.
        let (origin, destination) = if snapshot.origin.is_some() || snapshot.destination.is_some() {
            (snapshot.origin.clone(), snapshot.destination.clone())
        } else {
            session
                .map(|s| (s.origin.clone(), s.destination.clone()))
                .unwrap_or_default()
        };

        let class = classify_aircraft(callsign.as_deref(), type_code.as_deref());

        Self {
            identity: identity.to_string(),
            callsign,
            registration,
            airline,
            type_code,
            type_label,
            origin,
            destination,
            heading: snapshot.heading,
            class,
            distance_nm: snapshot.distance_nm,
            altitude_ft: snapshot.altitude_ft,
            ground_speed_kt: snapshot.ground_speed_kt,
            radius_nm,
        }
    }

    /// Replace the feed heading, e.g. with a track derived from the path.
    pub fn with_heading(mut self, heading: Option<f64>) -> Self {
        self.heading = heading;
        self
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

    /// Whether the flight is close enough to be shown.
    pub fn is_within_radius(&self) -> bool {
        self.distance_nm <= self.radius_nm
    }

    /// Identity line: airline plus type for commercial traffic, otherwise
    /// the best identifier plus type.
    pub fn identity_text(&self) -> String {
        let who = match self.class {
            AircraftClass::Commercial => self.airline.as_deref().or(self.callsign.as_deref()),
            _ => self.registration.as_deref().or(self.callsign.as_deref()),
        }
        .unwrap_or(self.identity.as_str());

        match self.type_code.as_deref() {
            Some(t) => format!("{} {}", who, t),
            None => who.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(callsign: Option<&str>, type_code: Option<&str>) -> AircraftSnapshot {
        AircraftSnapshot {
            callsign: callsign.map(str::to_string),
            registration: None,
            icao: Some("A1B2C3".to_string()),
            latitude: 45.6,
            longitude: -122.5,
            altitude_ft: 2400,
            ground_speed_kt: 165.0,
            heading: Some(100.0),
            vertical_rate_fpm: -600,
            squawk: None,
            type_code: type_code.map(str::to_string),
            origin: Some("SFO".to_string()),
            destination: Some("PDX".to_string()),
            flight_number: None,
            observed_at: Utc::now(),
            distance_nm: 0.5,
        }
    }

    #[test]
    fn test_enrichment_takes_priority() {
        let info = AircraftInfo {
            type_code: Some("B739".to_string()),
            friendly_name: Some("737-900".to_string()),
            ..Default::default()
        };
        let view = FlightView::build("ASA416", &snapshot(Some("ASA416"), Some("B738")), Some(&info), None, 0.7);

        assert_eq!(view.type_code.as_deref(), Some("B739"));
        assert_eq!(view.type_label, "737-900");
        assert_eq!(view.airline.as_deref(), Some("ASA"));
        assert_eq!(view.class, AircraftClass::Commercial);
        assert_eq!(view.route().as_deref(), Some("SFO-PDX"));
        assert_eq!(view.heading, Some(100.0));
        assert_eq!(view.identity_text(), "ASA B739");
        assert!(view.is_within_radius());
    }

    #[test]
    fn test_fallback_label() {
        let view = FlightView::build("N55ZZ", &snapshot(Some("N55ZZ"), None), None, None, 0.7);
        assert_eq!(view.type_label, FALLBACK_TYPE_LABEL);
        assert_eq!(view.class, AircraftClass::Private);
        assert_eq!(view.identity_text(), "N55ZZ");
    }

    #[test]
    fn test_route_falls_back_to_session_as_a_pair() {
        let mut stored = snapshot(Some("ASA416"), None);
        stored.destination = None;
        let session = FlightSession::start(
            &crate::identity::resolve_identity(Some("ASA416"), None, None),
            &stored,
            Utc::now(),
        );

        let mut live = snapshot(Some("ASA416"), None);
        live.origin = None;
        live.destination = None;
        let view = FlightView::build("ASA416", &live, None, Some(&session), 0.7);
        assert_eq!(view.route().as_deref(), Some("SFO-???"));

        live.destination = Some("SEA".to_string());
        let view = FlightView::build("ASA416", &live, None, Some(&session), 0.7);
        assert_eq!(view.route().as_deref(), Some("???-SEA"));
    }

    #[test]
    fn test_with_heading_replaces_feed_value() {
        let view = FlightView::build("ASA416", &snapshot(Some("ASA416"), None), None, None, 0.7)
            .with_heading(Some(270.0));
        assert_eq!(view.heading, Some(270.0));
    }

    #[test]
    fn test_outside_radius() {
        let mut snap = snapshot(Some("ASA416"), None);
        snap.distance_nm = 0.9;
        let view = FlightView::build("ASA416", &snap, None, None, 0.7);
        assert!(!view.is_within_radius());
    }
}
