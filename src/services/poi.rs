use crate::config::PoiSettings;
use crate::models::{GeoPoint, PlaceRecord};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use super::{http_client, PoiFinder};

/// Radius floor in meters
pub const MIN_RADIUS_M: u32 = 500;
/// Radius ceiling in meters
pub const MAX_RADIUS_M: u32 = 10_000;
/// Cap on returned places
pub const MAX_PLACES: usize = 100;
/// Initial attempt plus one retry on a transient failure
const MAX_ATTEMPTS: u32 = 2;

/// Errors that can occur when querying Overpass
#[derive(Debug, Error)]
pub enum PoiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Overpass returned {0}")]
    ApiError(StatusCode),

    #[error("Invalid response format: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

impl PoiError {
    /// Timeouts and gateway errors are worth one immediate retry
    pub fn is_transient(&self) -> bool {
        match self {
            PoiError::RequestError(e) => e.is_timeout(),
            PoiError::ApiError(status) => matches!(
                *status,
                StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
            ),
            PoiError::InvalidResponse(_) => false,
        }
    }
}

/// Overpass API (OpenStreetMap) client for nearby food, fitness and shopping
pub struct OverpassClient {
    url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Option<Vec<OverpassElement>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverpassElement {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<OverpassCenter>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OverpassCenter {
    pub lat: f64,
    pub lon: f64,
}

/// Convert a radius in km to meters within [`MIN_RADIUS_M`, `MAX_RADIUS_M`]
pub fn radius_meters(radius_km: f64) -> u32 {
    // `as` saturates on overflow and maps NaN to 0
    let meters = (radius_km * 1000.0) as u32;
    meters.clamp(MIN_RADIUS_M, MAX_RADIUS_M)
}

/// Overpass QL for restaurants, cafes, fast food, gyms, supermarkets, malls
/// and convenience stores around a point. Ways are reported by their center.
pub fn build_query(center: GeoPoint, radius_m: u32) -> String {
    let around = format!("(around:{},{},{})", radius_m, center.lat, center.lon);
    let amenity = r#"["amenity"~"^(restaurant|cafe|fast_food|gym)$"]"#;
    let shop = r#"["shop"~"^(supermarket|mall|convenience)$"]"#;

    format!(
        "[out:json][timeout:40];\n(\n  node{amenity}{around};\n  way{amenity}{around};\n  \
         node{shop}{around};\n  way{shop}{around};\n);\nout center;"
    )
}

/// Map an element to a place; elements with no resolvable coordinates are skipped.
pub fn element_to_place(el: &OverpassElement) -> Option<PlaceRecord> {
    let (lat, lon) = match (el.lat, el.lon, el.center) {
        (Some(lat), Some(lon), _) => (lat, lon),
        (_, _, Some(c)) => (c.lat, c.lon),
        _ => return None,
    };

    let tag = |key: &str| el.tags.get(key).map(String::as_str).filter(|v| !v.is_empty());

    let name = tag("name").or_else(|| tag("brand")).unwrap_or("Unnamed");
    let category = tag("amenity").or_else(|| tag("shop")).unwrap_or("place");

    let address: Vec<&str> = ["addr:street", "addr:housenumber", "addr:city", "addr:state", "addr:postcode"]
        .into_iter()
        .filter_map(tag)
        .collect();

    Some(PlaceRecord {
        name: name.to_string(),
        lat,
        lon,
        category: category.to_string(),
        address: if address.is_empty() { None } else { Some(address.join(" ")) },
    })
}

/// Convert elements to places, dropping repeats of the same (lat, lon, name)
/// and keeping at most [`MAX_PLACES`].
pub fn collect_places(elements: &[OverpassElement]) -> Vec<PlaceRecord> {
    let mut seen: HashSet<(u64, u64, String)> = HashSet::new();

    elements
        .iter()
        .filter_map(element_to_place)
        .filter(|p| seen.insert((p.lat.to_bits(), p.lon.to_bits(), p.name.clone())))
        .take(MAX_PLACES)
        .collect()
}

impl OverpassClient {
    pub fn new(settings: &PoiSettings) -> Result<Self, reqwest::Error> {
        Ok(Self {
            url: settings.url.clone(),
            client: http_client(settings.timeout_secs)?,
        })
    }

    /// Query places around `center`, retrying once on a transient failure
    pub async fn fetch(&self, center: GeoPoint, radius_km: f64) -> Result<Vec<PlaceRecord>, PoiError> {
        let query = build_query(center, radius_meters(radius_km));

        let mut attempt = 1;
        let response = loop {
            match self.send_query(&query).await {
                Ok(response) => break response,
                Err(e) if e.is_transient() && attempt < MAX_ATTEMPTS => {
                    tracing::info!("Nearby POI attempt {} failed (will retry): {}", attempt, e);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        Ok(collect_places(&response.elements.unwrap_or_default()))
    }

    async fn send_query(&self, query: &str) -> Result<OverpassResponse, PoiError> {
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "text/plain")
            .body(query.to_string())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PoiError::ApiError(response.status()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PoiFinder for OverpassClient {
    async fn find_poi(&self, center: GeoPoint, radius_km: f64) -> Vec<PlaceRecord> {
        match self.fetch(center, radius_km).await {
            Ok(places) => places,
            Err(e) => {
                tracing::warn!(
                    "Nearby POI fetch failed for {:.4},{:.4}: {}",
                    center.lat,
                    center.lon,
                    e
                );
                vec![]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(lat: Option<f64>, lon: Option<f64>, tags: &[(&str, &str)]) -> OverpassElement {
        OverpassElement {
            lat,
            lon,
            center: None,
            tags: tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }

    #[test]
    fn test_radius_meters_clamped() {
        assert_eq!(radius_meters(0.2), 500);
        assert_eq!(radius_meters(2.0), 2000);
        assert_eq!(radius_meters(50.0), 10_000);
        assert_eq!(radius_meters(f64::NAN), 500);
    }

    #[test]
    fn test_query_covers_categories() {
        let q = build_query(GeoPoint::new(37.39, -122.08), 2000);
        assert!(q.starts_with("[out:json]"));
        assert!(q.contains("restaurant|cafe|fast_food|gym"));
        assert!(q.contains("supermarket|mall|convenience"));
        assert!(q.contains("(around:2000,37.39,-122.08)"));
        assert!(q.ends_with("out center;"));
    }

    #[test]
    fn test_element_fallbacks() {
        let mut way = element(None, None, &[("brand", "Safeway"), ("shop", "supermarket")]);
        way.center = Some(OverpassCenter { lat: 1.0, lon: 2.0 });

        let place = element_to_place(&way).unwrap();
        assert_eq!(place.name, "Safeway");
        assert_eq!(place.category, "supermarket");
        assert_eq!((place.lat, place.lon), (1.0, 2.0));
        assert_eq!(place.address, None);

        let unnamed = element_to_place(&element(Some(1.0), Some(2.0), &[])).unwrap();
        assert_eq!(unnamed.name, "Unnamed");
        assert_eq!(unnamed.category, "place");

        assert!(element_to_place(&element(None, Some(2.0), &[])).is_none());
    }

    #[test]
    fn test_address_from_tags() {
        let el = element(
            Some(1.0),
            Some(2.0),
            &[
                ("name", "Cafe"),
                ("amenity", "cafe"),
                ("addr:street", "Castro St"),
                ("addr:housenumber", "100"),
                ("addr:city", "Mountain View"),
            ],
        );
        let place = element_to_place(&el).unwrap();
        assert_eq!(place.address.as_deref(), Some("Castro St 100 Mountain View"));
    }

    #[test]
    fn test_collect_places_dedups_and_caps() {
        let dup = element(Some(1.0), Some(2.0), &[("name", "Cafe")]);
        let deduped = collect_places(&[dup.clone(), dup, element(Some(1.0), Some(2.0), &[("name", "Gym")])]);
        assert_eq!(deduped.len(), 2);

        let many: Vec<OverpassElement> = (0..150)
            .map(|i| element(Some(i as f64), Some(0.0), &[("name", "x")]))
            .collect();
        assert_eq!(collect_places(&many).len(), MAX_PLACES);
    }

    #[test]
    fn test_null_elements_parse_as_empty() {
        let response: OverpassResponse = serde_json::from_str(r#"{"elements": null}"#).unwrap();
        assert!(collect_places(&response.elements.unwrap_or_default()).is_empty());

        let response: OverpassResponse = serde_json::from_str(r#"{"version": 0.6}"#).unwrap();
        assert!(response.elements.is_none());
    }

    #[test]
    fn test_transient_statuses() {
        assert!(PoiError::ApiError(StatusCode::SERVICE_UNAVAILABLE).is_transient());
        assert!(PoiError::ApiError(StatusCode::GATEWAY_TIMEOUT).is_transient());
        assert!(PoiError::ApiError(StatusCode::BAD_GATEWAY).is_transient());
        assert!(!PoiError::ApiError(StatusCode::BAD_REQUEST).is_transient());
        assert!(!PoiError::ApiError(StatusCode::TOO_MANY_REQUESTS).is_transient());
    }
}
