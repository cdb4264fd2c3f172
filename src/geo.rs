//! Great-circle distance

use crate::types::GeoPoint;

/// Mean Earth radius used by the haversine formula (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two fixes, in kilometres.
///
/// Coordinates are not range-checked; out-of-range input yields a defined but
/// meaningless number rather than an error.
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let d_lat = (b.latitude_deg - a.latitude_deg).to_radians();
    let d_lon = (b.longitude_deg - a.longitude_deg).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude_deg.to_radians().cos()
            * b.latitude_deg.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h just past 1 for near-antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, rel: f64) -> bool {
        (a - b).abs() <= rel * b.abs().max(1e-12)
    }

    #[test]
    fn test_identity_is_zero() {
        let p = GeoPoint::new(-1.2921, 36.8219);
        assert_eq!(distance_km(&p, &p), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = GeoPoint::new(-1.2921, 36.8219);
        let b = GeoPoint::new(-1.3000, 36.9000);
        assert_eq!(distance_km(&a, &b), distance_km(&b, &a));
    }

    #[test]
    fn test_small_east_offset_at_equator() {
        let base = GeoPoint::new(0.0, 0.0);
        let east = GeoPoint::new(0.0, 0.009);
        let d = distance_km(&base, &east);

        // R * Δλ for a pure longitude offset on the equator
        let expected = EARTH_RADIUS_KM * 0.009_f64.to_radians();
        assert!(close(d, expected, 1e-6));
        assert!((d - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_quarter_meridian() {
        let equator = GeoPoint::new(0.0, 0.0);
        let pole = GeoPoint::new(90.0, 0.0);
        let expected = EARTH_RADIUS_KM * std::f64::consts::FRAC_PI_2;
        assert!(close(distance_km(&equator, &pole), expected, 1e-6));
    }

    #[test]
    fn test_out_of_range_latitude_is_not_rejected() {
        let a = GeoPoint::new(100.0, 0.0);
        let b = GeoPoint::new(80.0, 0.0);
        let expected = EARTH_RADIUS_KM * 20.0_f64.to_radians();
        assert!(close(distance_km(&a, &b), expected, 1e-6));
    }

    #[test]
    fn test_near_antipodal_is_finite() {
        let a = GeoPoint::new(62.545655693062145, 64.97240236869834);
        let b = GeoPoint::new(-62.545655692132065, -115.02759763130166);
        let d = distance_km(&a, &b);

        assert!(d.is_finite());
        assert!(close(d, EARTH_RADIUS_KM * std::f64::consts::PI, 1e-6));
    }
}
