// Upstream provider clients
pub mod geocoder;
pub mod images;
pub mod news;
pub mod poi;
pub mod property;
pub mod schools;

pub use geocoder::{CensusGeocoder, GeocodeError};
pub use images::{ImageError, UnsplashClient};
pub use news::{NewsCatcherClient, NewsError};
pub use poi::{OverpassClient, PoiError};
pub use property::{PropertyError, RentCastClient};
pub use schools::{NcesSchoolClient, SchoolsError};

use crate::config::Settings;
use crate::models::{AreaHint, GeoPoint, GeocodeResult, NewsItem, PlaceRecord, PropertyRecord, SchoolRecord};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Resolves free-text addresses to coordinates
///
/// `Ok(None)` means the provider answered but found no match. Any transport
/// or protocol failure is an error.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Option<GeocodeResult>, GeocodeError>;
}

/// Finds schools around a point. Failures yield an empty list.
#[async_trait]
pub trait SchoolFinder: Send + Sync {
    async fn find_schools(&self, center: GeoPoint, radius_km: f64) -> Vec<SchoolRecord>;
}

/// Looks up the property record for an address. Failures yield `None`.
#[async_trait]
pub trait PropertyLookup: Send + Sync {
    async fn lookup_property(&self, address: &str) -> Option<PropertyRecord>;
}

/// Finds points of interest around a point. Failures yield an empty list.
#[async_trait]
pub trait PoiFinder: Send + Sync {
    async fn find_poi(&self, center: GeoPoint, radius_km: f64) -> Vec<PlaceRecord>;
}

/// Finds recent local news for an area. Failures yield an empty list.
#[async_trait]
pub trait NewsFinder: Send + Sync {
    async fn find_news(&self, area: &AreaHint) -> Vec<NewsItem>;
}

/// Finds one generic placeholder image URL. Failures yield `None`.
#[async_trait]
pub trait ImageEnricher: Send + Sync {
    /// Whether a credential is available; the aggregator skips the call otherwise.
    fn is_configured(&self) -> bool;

    async fn find_image(&self, city: Option<&str>, property_type: Option<&str>) -> Option<String>;
}

/// The full set of upstream providers, shared across requests
#[derive(Clone)]
pub struct Providers {
    pub geocoder: Arc<dyn Geocoder>,
    pub schools: Arc<dyn SchoolFinder>,
    pub property: Arc<dyn PropertyLookup>,
    pub poi: Arc<dyn PoiFinder>,
    pub news: Arc<dyn NewsFinder>,
    pub images: Arc<dyn ImageEnricher>,
}

impl Providers {
    /// Build the HTTP-backed providers, each with its own client and timeout
    pub fn from_settings(settings: &Settings) -> Result<Self, reqwest::Error> {
        Ok(Self {
            geocoder: Arc::new(CensusGeocoder::new(&settings.geocoder)?),
            schools: Arc::new(NcesSchoolClient::new(&settings.schools)?),
            property: Arc::new(RentCastClient::new(&settings.property)?),
            poi: Arc::new(OverpassClient::new(&settings.poi)?),
            news: Arc::new(NewsCatcherClient::new(&settings.news)?),
            images: Arc::new(UnsplashClient::new(&settings.images)?),
        })
    }
}

/// Build a client with a per-provider request timeout
pub(crate) fn http_client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
