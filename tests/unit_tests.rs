// Unit tests for the pure pipeline helpers

use property_profile::core::{
    address::parse_area_hint,
    distance::{clamp_radius_km, linear_bounding_box, MAX_RADIUS_KM, MIN_RADIUS_KM},
};
use property_profile::models::{AreaHint, GeoPoint};
use property_profile::services::poi::{build_query, collect_places, radius_meters, OverpassElement, MAX_PLACES};
use property_profile::services::images;

fn hint(city: Option<&str>, state: Option<&str>) -> AreaHint {
    AreaHint {
        city: city.map(str::to_string),
        state: state.map(str::to_string),
    }
}

fn element(lat: f64, lon: f64, name: &str) -> OverpassElement {
    serde_json::from_value(serde_json::json!({
        "type": "node",
        "lat": lat,
        "lon": lon,
        "tags": { "name": name, "amenity": "restaurant" }
    }))
    .unwrap()
}

#[test]
fn test_area_hint_segment_counts() {
    assert_eq!(
        parse_area_hint("4600 Silver Hill Rd, Washington, DC, 20233"),
        hint(Some("Washington"), Some("DC"))
    );
    assert_eq!(parse_area_hint("Washington, DC"), hint(Some("Washington"), Some("DC")));
    assert_eq!(parse_area_hint("Washington"), hint(Some("Washington"), None));
    assert_eq!(parse_area_hint(""), hint(None, None));
}

#[test]
fn test_area_hint_is_deterministic() {
    let address = "1600 AMPHITHEATRE PKWY, MOUNTAIN VIEW, CA, 94043";
    assert_eq!(parse_area_hint(address), parse_area_hint(address));
    assert_eq!(parse_area_hint(address), hint(Some("MOUNTAIN VIEW"), Some("CA")));
}

#[test]
fn test_area_hint_trims_segments() {
    assert_eq!(
        parse_area_hint("  100 Main St ,  Springfield ,IL,62701 "),
        hint(Some("Springfield"), Some("IL"))
    );
}

#[test]
fn test_radius_clamping_bounds() {
    assert_eq!(clamp_radius_km(0.2), MIN_RADIUS_KM);
    assert_eq!(clamp_radius_km(50.0), MAX_RADIUS_KM);
    assert_eq!(clamp_radius_km(0.5), 0.5);
    assert_eq!(clamp_radius_km(10.0), 10.0);
    assert_eq!(clamp_radius_km(3.7), 3.7);
}

#[test]
fn test_school_envelope_uses_linear_conversion() {
    let bbox = linear_bounding_box(GeoPoint::new(38.845985, -76.92744), 5.0);

    let delta = 5.0 / 111.0;
    assert!((bbox.max_lat - 38.845985 - delta).abs() < 1e-9);
    assert!((-76.92744 - bbox.min_lon - delta).abs() < 1e-9);
}

#[test]
fn test_poi_radius_in_meters() {
    assert_eq!(radius_meters(0.5), 500);
    assert_eq!(radius_meters(0.1), 500);
    assert_eq!(radius_meters(2.5), 2500);
    assert_eq!(radius_meters(12.0), 10_000);
    assert!(build_query(GeoPoint::new(1.0, 2.0), radius_meters(2.5)).contains("around:2500,1,2"));
}

#[test]
fn test_poi_dedup_by_lat_lon_name() {
    let places = collect_places(&[
        element(30.0, -97.0, "Taqueria"),
        element(30.0, -97.0, "Taqueria"),
        element(30.0, -97.0, "Bakery"),
        element(30.1, -97.0, "Taqueria"),
    ]);

    assert_eq!(places.len(), 3);
    assert_eq!(places[0].category, "restaurant");
}

#[test]
fn test_poi_output_capped() {
    let elements: Vec<OverpassElement> = (0..250).map(|i| element(i as f64 * 0.001, 0.0, "Spot")).collect();
    assert_eq!(collect_places(&elements).len(), MAX_PLACES);
}

#[test]
fn test_image_query_defaults_to_residential() {
    assert_eq!(images::build_query(None, None), "residential");
    assert_eq!(images::build_query(Some("Austin"), Some("CONDO")), "condo Austin");
}
