use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::domain::{GeoPoint, NewsItem, PlaceRecord, PropertyRecord, SchoolRecord};

/// Shown in place of the property section when no record was found
pub const NO_PROPERTY_MESSAGE: &str = "No property data for this address.";

/// Unified property profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedProfile {
    pub location: Location,
    pub map: MapData,
    pub schools: Vec<School>,
    pub property: Option<PropertyRecord>,
    pub property_message: Option<String>,
    /// Reserved for listing data; always null.
    pub listings: Option<Value>,
    pub images: Option<Vec<ImageRef>>,
    pub nearby_places: Vec<NearbyPlace>,
    pub radius_km: f64,
    pub local_news: Option<Vec<NewsItem>>,
}

/// Geocoded location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub normalized_address: String,
    pub lat: f64,
    pub lon: f64,
    pub census_geography: Option<Map<String, Value>>,
}

/// Data needed to render the map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapData {
    pub center: GeoPoint,
    pub schools: Vec<MapSchool>,
}

/// School map pin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapSchool {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl From<&SchoolRecord> for MapSchool {
    fn from(s: &SchoolRecord) -> Self {
        Self {
            name: s.name.clone(),
            lat: s.lat.unwrap_or(0.0),
            lon: s.lon.unwrap_or(0.0),
            street: s.street.clone(),
            city: s.city.clone(),
            state: s.state.clone(),
            zip: s.zip.clone(),
        }
    }
}

/// School list entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct School {
    pub name: String,
    pub nces_id: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl From<SchoolRecord> for School {
    fn from(s: SchoolRecord) -> Self {
        Self {
            name: s.name,
            nces_id: s.nces_id,
            street: s.street,
            city: s.city,
            state: s.state,
            zip: s.zip,
            lat: s.lat,
            lon: s.lon,
        }
    }
}

/// Point of interest (food, gym, grocery, mall)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyPlace {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub category: String,
    pub address: Option<String>,
}

impl From<PlaceRecord> for NearbyPlace {
    fn from(p: PlaceRecord) -> Self {
        Self {
            name: p.name,
            lat: p.lat,
            lon: p.lon,
            category: p.category,
            address: p.address,
        }
    }
}

/// Generic stock image; never a photo of the actual property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub placeholder: bool,
}

impl ImageRef {
    pub fn placeholder(url: String) -> Self {
        Self { url, placeholder: true }
    }
}

/// Schools endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolsResponse {
    pub schools: Vec<SchoolRecord>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
