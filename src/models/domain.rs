use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A WGS84 coordinate pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// First address match returned by the geocoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub matched_address: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "geographies")]
    pub geography: Option<Map<String, Value>>,
}

impl GeocodeResult {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Best-effort (city, state) pair derived from a matched address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaHint {
    pub city: Option<String>,
    pub state: Option<String>,
}

impl AreaHint {
    /// Join the non-blank parts as "City, STATE", or None if there are none.
    pub fn location_string(&self) -> Option<String> {
        let parts: Vec<&str> = self.location_parts().collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    fn location_parts(&self) -> impl Iterator<Item = &str> {
        [self.city.as_deref(), self.state.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// A school located inside the search envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolRecord {
    pub name: String,
    pub nces_id: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub lea_id: Option<String>,
}

/// Opaque property record as returned by the property provider
pub type PropertyRecord = Map<String, Value>;

/// A point of interest near the geocoded location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub category: String,
    pub address: Option<String>,
}

/// A local news article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub source: Option<String>,
    pub published_date: Option<String>,
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}
