use crate::models::{BoundingBox, GeoPoint};

/// Approximate kilometers per degree, applied to both axes
pub const KM_PER_DEGREE: f64 = 111.0;

/// Lower bound for the caller-supplied search radius in kilometers
pub const MIN_RADIUS_KM: f64 = 0.5;

/// Upper bound for the caller-supplied search radius in kilometers
pub const MAX_RADIUS_KM: f64 = 10.0;

/// Calculate a square envelope around a center point
///
/// Uses the same linear 1° ≈ 111 km conversion for latitude and longitude.
/// This is a coarse query envelope, not a geodesic circle.
pub fn linear_bounding_box(center: GeoPoint, radius_km: f64) -> BoundingBox {
    let delta = radius_km / KM_PER_DEGREE;

    BoundingBox {
        min_lat: center.lat - delta,
        max_lat: center.lat + delta,
        min_lon: center.lon - delta,
        max_lon: center.lon + delta,
    }
}

/// Clamp a search radius into [`MIN_RADIUS_KM`, `MAX_RADIUS_KM`]
///
/// NaN is treated as the floor.
#[inline]
pub fn clamp_radius_km(radius_km: f64) -> f64 {
    if radius_km.is_nan() {
        return MIN_RADIUS_KM;
    }
    radius_km.clamp(MIN_RADIUS_KM, MAX_RADIUS_KM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box() {
        let bbox = linear_bounding_box(GeoPoint::new(40.7128, -74.0060), 5.0);

        assert!(bbox.min_lat < 40.7128);
        assert!(bbox.max_lat > 40.7128);
        assert!(bbox.min_lon < -74.0060);
        assert!(bbox.max_lon > -74.0060);

        // 10km / 111km per degree = ~0.09 degrees on both axes
        let lat_span = bbox.max_lat - bbox.min_lat;
        let lon_span = bbox.max_lon - bbox.min_lon;
        assert!((lat_span - 0.09).abs() < 0.001, "Lat span should be ~0.09 degrees");
        assert!((lat_span - lon_span).abs() < 1e-9);
    }

    #[test]
    fn test_clamp_radius() {
        assert_eq!(clamp_radius_km(0.2), 0.5);
        assert_eq!(clamp_radius_km(50.0), 10.0);
        assert_eq!(clamp_radius_km(2.0), 2.0);
        assert_eq!(clamp_radius_km(-3.0), 0.5);
        assert_eq!(clamp_radius_km(f64::NAN), 0.5);
    }
}
