//! Spatial math for distance calculations between geodetic positions.

use crate::models::GeodeticPosition;
use crate::units::kilometers_to_feet;

/// Mean Earth radius used by the spherical approximation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate great-circle distance between two points using the Haversine formula.
///
/// Note the longitude-first argument order.
///
/// # Arguments
/// * `lon1`, `lat1` - First point coordinates in decimal degrees
/// * `lon2`, `lat2` - Second point coordinates in decimal degrees
///
/// # Returns
/// Distance in kilometers
pub fn haversine_km(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// Great-circle distance in feet between two positions, altitude ignored.
pub fn horizontal_distance_ft(pos1: &GeodeticPosition, pos2: &GeodeticPosition) -> f64 {
    kilometers_to_feet(haversine_km(
        pos1.longitude(),
        pos1.latitude(),
        pos2.longitude(),
        pos2.latitude(),
    ))
}

/// Distance in feet between two positions.
///
/// Treats the horizontal great-circle distance and the altitude delta as
/// orthogonal legs. Good at field scale (a few km), not globally.
pub fn distance_ft(pos1: &GeodeticPosition, pos2: &GeodeticPosition) -> f64 {
    let horizontal_ft = horizontal_distance_ft(pos1, pos2);
    let vertical_ft = (pos1.altitude_msl() - pos2.altitude_msl()).abs();
    horizontal_ft.hypot(vertical_ft)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 10 feet in km
    const TOLERANCE_KM: f64 = 0.003048;

    fn assert_close_km(expected: f64, actual: f64) {
        assert!(
            (expected - actual).abs() <= TOLERANCE_KM,
            "expected {expected} km, got {actual} km"
        );
    }

    #[test]
    fn test_haversine_zero_distance() {
        for (lon, lat) in [(0.0, 0.0), (1.0, 1.0), (-1.0, -1.0), (76.0, 42.0), (-76.0, 42.0)] {
            assert_eq!(haversine_km(lon, lat, lon, lat), 0.0);
        }
    }

    #[test]
    fn test_haversine_hemispheres() {
        let cases = [
            (-73.0, 40.0, -74.0, 41.0, 139.6886345468666),
            (73.0, 40.0, 74.0, 41.0, 139.6886345468667),
            (73.0, -40.0, 74.0, -41.0, 139.6886345468667),
            (-73.0, -40.0, -74.0, -41.0, 139.68863454686704),
        ];
        for (lon1, lat1, lon2, lat2, expected) in cases {
            assert_close_km(expected, haversine_km(lon1, lat1, lon2, lat2));
        }
    }

    #[test]
    fn test_haversine_competition_scale() {
        let cases = [
            (-76.428709, 38.145306, -76.426375, 38.146146, 0.22446),
            (-76.428537, 38.145399, -76.427818, 38.144686, 0.10045),
            (-76.434261, 38.142471, -76.418876, 38.147838, 1.46914),
        ];
        for (lon1, lat1, lon2, lat2, expected) in cases {
            assert_close_km(expected, haversine_km(lon1, lat1, lon2, lat2));
        }
    }

    #[test]
    fn test_haversine_symmetric() {
        let forward = haversine_km(-76.434261, 38.142471, -76.418876, 38.147838);
        let backward = haversine_km(-76.418876, 38.147838, -76.434261, 38.142471);
        assert!((forward - backward).abs() < 1e-12);
    }

    #[test]
    fn test_antipodal_points_do_not_nan() {
        let d = haversine_km(0.0, 0.0, 180.0, 0.0);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_distance_ft_combines_vertical() {
        let a = GeodeticPosition::new(38.0, -76.0, 0.0).unwrap();
        let b = GeodeticPosition::new(38.0, -76.0, 300.0).unwrap();
        assert!((distance_ft(&a, &b) - 300.0).abs() < 1e-9);

        let c = GeodeticPosition::new(38.001, -76.0, 300.0).unwrap();
        let horizontal = horizontal_distance_ft(&a, &c);
        let combined = distance_ft(&a, &c);
        assert!((combined - horizontal.hypot(300.0)).abs() < 1e-9);
        assert!(combined > horizontal);
    }
}
