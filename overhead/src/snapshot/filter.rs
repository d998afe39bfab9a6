//! Snapshot filter: raw feed records to distance-sorted zone candidates.

use chrono::{DateTime, Utc};

use super::model::{AircraftSnapshot, RawObservation};
use crate::geo::GeoPoint;

/// Reduce a feed response to the airborne aircraft inside the zone.
///
/// Observations that are on the ground or lack coordinates are discarded.
/// The remainder is kept if its great-circle distance from `center` is at
/// most `radius_nm`, and returned nearest first. The sort is stable, so
/// equal distances keep their feed order.
///
/// # Arguments
///
/// * `observations` - Records as returned by the feed
/// * `center` - Zone center
/// * `radius_nm` - Zone radius in nautical miles
/// * `now` - Timestamp for records the feed did not timestamp
pub fn filter_observations(
    observations: &[RawObservation],
    center: GeoPoint,
    radius_nm: f64,
    now: DateTime<Utc>,
) -> Vec<AircraftSnapshot> {
    let mut snapshots: Vec<AircraftSnapshot> = observations
        .iter()
        .filter(|obs| !obs.on_ground)
        .filter_map(|obs| {
            let position = GeoPoint::new(obs.latitude?, obs.longitude?);
            let distance = center.distance_to(&position);
            if distance <= radius_nm {
                AircraftSnapshot::from_observation(obs, distance, now)
            } else {
                None
            }
        })
        .collect();

    snapshots.sort_by(|a, b| a.distance_nm.total_cmp(&b.distance_nm));
    snapshots
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: GeoPoint = GeoPoint {
        latitude: 45.625,
        longitude: -122.528,
    };

    /// An observation `north_nm` nautical miles due north of the center.
    fn obs(callsign: &str, north_nm: f64) -> RawObservation {
        RawObservation {
            callsign: Some(callsign.to_string()),
            latitude: Some(CENTER.latitude + north_nm / 60.0),
            longitude: Some(CENTER.longitude),
            altitude_ft: Some(4000),
            ..Default::default()
        }
    }

    fn callsigns(snapshots: &[AircraftSnapshot]) -> Vec<&str> {
        snapshots
            .iter()
            .map(|s| s.callsign.as_deref().unwrap_or(""))
            .collect()
    }

    #[test]
    fn test_sorted_by_distance() {
        let input = vec![obs("FAR", 1.5), obs("NEAR", 0.2), obs("MID", 0.8)];
        let result = filter_observations(&input, CENTER, 2.0, Utc::now());
        assert_eq!(callsigns(&result), vec!["NEAR", "MID", "FAR"]);
        assert!(result[0].distance_nm < result[1].distance_nm);
    }

    #[test]
    fn test_outside_radius_dropped() {
        let input = vec![obs("IN", 1.0), obs("OUT", 3.0)];
        let result = filter_observations(&input, CENTER, 2.0, Utc::now());
        assert_eq!(callsigns(&result), vec!["IN"]);
    }

    #[test]
    fn test_grounded_and_positionless_dropped() {
        let mut grounded = obs("GND", 0.1);
        grounded.on_ground = true;
        let mut no_lat = obs("NOLAT", 0.1);
        no_lat.latitude = None;

        let input = vec![grounded, no_lat, obs("AIR", 0.3)];
        let result = filter_observations(&input, CENTER, 2.0, Utc::now());
        assert_eq!(callsigns(&result), vec!["AIR"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let input = vec![obs("FIRST", 0.5), obs("SECOND", 0.5), obs("THIRD", 0.5)];
        let result = filter_observations(&input, CENTER, 2.0, Utc::now());
        assert_eq!(callsigns(&result), vec!["FIRST", "SECOND", "THIRD"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_observations(&[], CENTER, 2.0, Utc::now()).is_empty());
    }

    #[test]
    fn test_distance_is_populated() {
        let result = filter_observations(&[obs("ONE", 1.0)], CENTER, 2.0, Utc::now());
        assert!((result[0].distance_nm - 1.0).abs() < 0.01);
    }
}
