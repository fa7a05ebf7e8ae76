// In-process fake providers shared by the test binaries
#![allow(dead_code)]

use async_trait::async_trait;
use property_profile::models::{
    AreaHint, GeoPoint, GeocodeResult, NewsItem, PlaceRecord, PropertyRecord, SchoolRecord,
};
use property_profile::services::{
    GeocodeError, Geocoder, ImageEnricher, NewsFinder, PoiFinder, PropertyLookup, Providers,
    SchoolFinder,
};
use property_profile::ProfileAggregator;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;

pub enum GeocodeBehavior {
    Match(GeocodeResult),
    NoMatch,
    Fail,
}

#[derive(Default)]
pub struct Calls {
    pub geocode: AtomicUsize,
    pub schools: AtomicUsize,
    pub property: AtomicUsize,
    pub poi: AtomicUsize,
    pub news: AtomicUsize,
    pub images: AtomicUsize,
}

impl Calls {
    pub fn fan_out(&self) -> [usize; 4] {
        [
            self.schools.load(Ordering::SeqCst),
            self.property.load(Ordering::SeqCst),
            self.poi.load(Ordering::SeqCst),
            self.news.load(Ordering::SeqCst),
        ]
    }
}

#[derive(Default)]
pub struct Seen {
    pub school_radius_km: Option<f64>,
    pub poi_radius_km: Option<f64>,
    pub property_address: Option<String>,
    pub area: Option<AreaHint>,
    pub image_args: Option<(Option<String>, Option<String>)>,
}

pub struct FakeProvider {
    pub geocode: GeocodeBehavior,
    pub schools: Vec<SchoolRecord>,
    pub property: Option<PropertyRecord>,
    pub places: Vec<PlaceRecord>,
    pub news: Vec<NewsItem>,
    pub image_configured: bool,
    pub image_url: Option<String>,
    pub barrier: Option<Barrier>,
    pub panic_in_schools: bool,
    pub calls: Calls,
    pub seen: Mutex<Seen>,
}

impl FakeProvider {
    pub fn matching(matched_address: &str) -> Self {
        Self::with_geocode(GeocodeBehavior::Match(GeocodeResult {
            matched_address: matched_address.to_string(),
            lat: 38.845985,
            lon: -76.92744,
            geography: None,
        }))
    }

    pub fn with_geocode(geocode: GeocodeBehavior) -> Self {
        Self {
            geocode,
            schools: vec![],
            property: None,
            places: vec![],
            news: vec![],
            image_configured: false,
            image_url: None,
            barrier: None,
            panic_in_schools: false,
            calls: Calls::default(),
            seen: Mutex::new(Seen::default()),
        }
    }

    async fn rendezvous(&self) {
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
    }

    pub fn into_aggregator(self) -> (ProfileAggregator, Arc<FakeProvider>) {
        let fake = Arc::new(self);
        let providers = Providers {
            geocoder: fake.clone(),
            schools: fake.clone(),
            property: fake.clone(),
            poi: fake.clone(),
            news: fake.clone(),
            images: fake.clone(),
        };
        (ProfileAggregator::new(providers), fake)
    }
}

#[async_trait]
impl Geocoder for FakeProvider {
    async fn geocode(&self, _address: &str) -> Result<Option<GeocodeResult>, GeocodeError> {
        self.calls.geocode.fetch_add(1, Ordering::SeqCst);
        match &self.geocode {
            GeocodeBehavior::Match(result) => Ok(Some(result.clone())),
            GeocodeBehavior::NoMatch => Ok(None),
            GeocodeBehavior::Fail => Err(GeocodeError::ApiError {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "unavailable".to_string(),
            }),
        }
    }
}

#[async_trait]
impl SchoolFinder for FakeProvider {
    async fn find_schools(&self, _center: GeoPoint, radius_km: f64) -> Vec<SchoolRecord> {
        self.calls.schools.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().school_radius_km = Some(radius_km);
        self.rendezvous().await;
        if self.panic_in_schools {
            panic!("school provider blew up");
        }
        self.schools.clone()
    }
}

#[async_trait]
impl PropertyLookup for FakeProvider {
    async fn lookup_property(&self, address: &str) -> Option<PropertyRecord> {
        self.calls.property.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().property_address = Some(address.to_string());
        self.rendezvous().await;
        self.property.clone()
    }
}

#[async_trait]
impl PoiFinder for FakeProvider {
    async fn find_poi(&self, _center: GeoPoint, radius_km: f64) -> Vec<PlaceRecord> {
        self.calls.poi.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().poi_radius_km = Some(radius_km);
        self.rendezvous().await;
        self.places.clone()
    }
}

#[async_trait]
impl NewsFinder for FakeProvider {
    async fn find_news(&self, area: &AreaHint) -> Vec<NewsItem> {
        self.calls.news.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().area = Some(area.clone());
        self.rendezvous().await;
        self.news.clone()
    }
}

#[async_trait]
impl ImageEnricher for FakeProvider {
    fn is_configured(&self) -> bool {
        self.image_configured
    }

    async fn find_image(&self, city: Option<&str>, property_type: Option<&str>) -> Option<String> {
        self.calls.images.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().image_args =
            Some((city.map(str::to_string), property_type.map(str::to_string)));
        self.image_url.clone()
    }
}

pub fn property_record(value: serde_json::Value) -> PropertyRecord {
    value.as_object().cloned().unwrap()
}
