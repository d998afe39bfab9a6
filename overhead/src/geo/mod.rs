//! Great-circle geometry for the watched zone.
//!
//! Every distance in the crate is produced by [`distance_nm`]. Closest
//! approach, zone membership and proximity tiers all compare values from this
//! one function so they can never disagree about which aircraft is nearer.

/// Mean Earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// Nautical miles per degree of latitude.
const NM_PER_DEGREE: f64 = 60.0;

/// Smallest cosine used when widening longitude spans near the poles.
const MIN_COS_LAT: f64 = 0.01;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees (positive north).
    pub latitude: f64,
    /// Longitude in degrees (positive east).
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another point in nautical miles.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        distance_nm(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// Haversine distance between two positions in nautical miles.
///
/// # Arguments
///
/// * `lat1`, `lon1` - First position in degrees
/// * `lat2`, `lon2` - Second position in degrees
#[inline]
pub fn distance_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Clamp guards against a > 1.0 from rounding on antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_NM * c
}

/// Latitude/longitude bounding box used to query zone feeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Northern edge in degrees.
    pub north: f64,
    /// Southern edge in degrees.
    pub south: f64,
    /// Western edge in degrees.
    pub west: f64,
    /// Eastern edge in degrees.
    pub east: f64,
}

impl BoundingBox {
    /// Smallest box fully containing a circle of `radius_nm` around `center`.
    pub fn around(center: GeoPoint, radius_nm: f64) -> Self {
        let lat_span = radius_nm / NM_PER_DEGREE;
        let cos_lat = center.latitude.to_radians().cos().abs().max(MIN_COS_LAT);
        let lon_span = radius_nm / (NM_PER_DEGREE * cos_lat);

        Self {
            north: (center.latitude + lat_span).min(90.0),
            south: (center.latitude - lat_span).max(-90.0),
            west: center.longitude - lon_span,
            east: center.longitude + lon_span,
        }
    }

    /// Check whether a point falls inside the box.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_same_point_is_zero() {
        assert_eq!(distance_nm(45.6253, -122.5281, 45.6253, -122.5281), 0.0);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        // One degree of latitude is ~60 NM
        let d = distance_nm(45.0, -122.0, 46.0, -122.0);
        assert!((d - 60.04).abs() < 0.1, "got {d}");
    }

    #[test]
    fn test_distance_known_airports() {
        // PDX to SEA is roughly 113 NM
        let d = distance_nm(45.5887, -122.5975, 47.4502, -122.3088);
        assert!((d - 112.5).abs() < 2.0, "got {d}");
    }

    #[test]
    fn test_geo_point_distance_matches_function() {
        let a = GeoPoint::new(45.62, -122.52);
        let b = GeoPoint::new(45.64, -122.50);
        assert_eq!(a.distance_to(&b), distance_nm(45.62, -122.52, 45.64, -122.50));
    }

    #[test]
    fn test_bounding_box_contains_circle_edge() {
        let center = GeoPoint::new(45.625, -122.528);
        let bbox = BoundingBox::around(center, 5.0);

        // A point 5 NM due north is on the edge of the box
        let north = GeoPoint::new(center.latitude + 5.0 / 60.0 - 1e-9, center.longitude);
        assert!(bbox.contains(&north));
        assert!(bbox.contains(&center));
        assert!(!bbox.contains(&GeoPoint::new(47.0, -122.528)));
    }

    #[test]
    fn test_bounding_box_widens_longitude_at_high_latitude() {
        let equator = BoundingBox::around(GeoPoint::new(0.0, 0.0), 10.0);
        let north = BoundingBox::around(GeoPoint::new(60.0, 0.0), 10.0);
        assert!((north.east - north.west) > (equator.east - equator.west));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_distance_is_symmetric(
                lat1 in -89.0..89.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -89.0..89.0_f64,
                lon2 in -180.0..180.0_f64,
            ) {
                let ab = distance_nm(lat1, lon1, lat2, lon2);
                let ba = distance_nm(lat2, lon2, lat1, lon1);
                prop_assert!((ab - ba).abs() < 1e-9, "d(A,B)={} d(B,A)={}", ab, ba);
            }

            #[test]
            fn test_distance_to_self_is_zero(
                lat in -90.0..90.0_f64,
                lon in -180.0..180.0_f64,
            ) {
                prop_assert_eq!(distance_nm(lat, lon, lat, lon), 0.0);
            }

            #[test]
            fn test_distance_is_bounded(
                lat1 in -90.0..90.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -90.0..90.0_f64,
                lon2 in -180.0..180.0_f64,
            ) {
                let d = distance_nm(lat1, lon1, lat2, lon2);
                prop_assert!(d >= 0.0);
                prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_NM + 1e-6);
            }
        }
    }
}
