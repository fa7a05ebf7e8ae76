use crate::config::default_school_radius_km;
use crate::core::{address::parse_area_hint, distance::clamp_radius_km};
use crate::models::{
    GeocodeResult, ImageRef, Location, MapData, MapSchool, NearbyPlace, NewsItem, PlaceRecord,
    PropertyRecord, School, SchoolRecord, UnifiedProfile, NO_PROPERTY_MESSAGE,
};
use crate::services::{GeocodeError, Providers};
use serde_json::Value;
use std::future::Future;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// The only failure that reaches the caller; every other provider degrades locally.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Geocoding failed: {0}")]
    Geocode(#[from] GeocodeError),
}

/// Builds unified property profiles
///
/// # Pipeline Stages
/// 1. Geocode the address (a miss ends the pipeline with no profile)
/// 2. Fan out to schools, property, nearby places and news concurrently
/// 3. Look up a placeholder image once a property record is known
/// 4. Merge everything into one [`UnifiedProfile`]
#[derive(Clone)]
pub struct ProfileAggregator {
    providers: Providers,
    school_radius_km: f64,
}

impl ProfileAggregator {
    pub fn new(providers: Providers) -> Self {
        Self {
            providers,
            school_radius_km: default_school_radius_km(),
        }
    }

    /// Override the fixed school search radius
    pub fn with_school_radius_km(mut self, radius_km: f64) -> Self {
        self.school_radius_km = radius_km;
        self
    }

    pub fn providers(&self) -> &Providers {
        &self.providers
    }

    /// Build the profile for an address
    ///
    /// Returns `Ok(None)` for blank input or when the geocoder has no match;
    /// in both cases no other provider is called. `radius_km` applies to
    /// nearby places only and is clamped into [0.5, 10] km.
    pub async fn build_profile(
        &self,
        address: &str,
        radius_km: f64,
    ) -> Result<Option<UnifiedProfile>, ProfileError> {
        let span = tracing::info_span!("build_profile", request_id = %uuid::Uuid::new_v4());
        self.build(address, radius_km).instrument(span).await
    }

    async fn build(&self, address: &str, radius_km: f64) -> Result<Option<UnifiedProfile>, ProfileError> {
        let address = address.trim();
        if address.is_empty() {
            tracing::debug!("Rejecting blank address");
            return Ok(None);
        }

        let Some(geo) = self.providers.geocoder.geocode(address).await? else {
            tracing::info!("Address could not be geocoded: {}", address);
            return Ok(None);
        };

        let radius_km = clamp_radius_km(radius_km);
        let center = geo.point();
        let area = parse_area_hint(&geo.matched_address);

        tracing::info!(
            "Geocoded {} -> {:.5},{:.5} ({:?}, {:?}), radius {} km",
            address,
            center.lat,
            center.lon,
            area.city,
            area.state,
            radius_km
        );

        let schools = {
            let finder = self.providers.schools.clone();
            let school_radius_km = self.school_radius_km;
            spawn_branch(async move { finder.find_schools(center, school_radius_km).await })
        };
        let property = {
            let lookup = self.providers.property.clone();
            let address = address.to_string();
            spawn_branch(async move { lookup.lookup_property(&address).await })
        };
        let places = {
            let finder = self.providers.poi.clone();
            spawn_branch(async move { finder.find_poi(center, radius_km).await })
        };
        let news = {
            let finder = self.providers.news.clone();
            let area = area.clone();
            spawn_branch(async move { finder.find_news(&area).await })
        };

        let (schools, property, places, news) = tokio::join!(
            join_branch("schools", schools),
            join_branch("property", property),
            join_branch("nearby places", places),
            join_branch("news", news),
        );

        let mut images = None;
        if let Some(record) = &property {
            if self.providers.images.is_configured() {
                images = self
                    .providers
                    .images
                    .find_image(area.city.as_deref(), property_type_hint(record))
                    .await
                    .map(|url| vec![ImageRef::placeholder(url)]);
            }
        }

        tracing::info!(
            "Profile for {}: {} schools, property {}, {} places, {} news items",
            address,
            schools.len(),
            if property.is_some() { "found" } else { "missing" },
            places.len(),
            news.len()
        );

        Ok(Some(assemble(geo, schools, property, places, news, images, radius_km)))
    }
}

/// Run one fan-out branch on its own task so a panic stays inside it
fn spawn_branch<F>(branch: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::spawn(branch.in_current_span())
}

async fn join_branch<T: Default>(name: &str, handle: JoinHandle<T>) -> T {
    match handle.await {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("{} task failed, continuing without it: {}", name, e);
            T::default()
        }
    }
}

/// `propertyType`, else `type`, when it is a non-empty string
fn property_type_hint(record: &PropertyRecord) -> Option<&str> {
    ["propertyType", "type"]
        .into_iter()
        .filter_map(|key| record.get(key).and_then(Value::as_str))
        .find(|v| !v.trim().is_empty())
}

fn assemble(
    geo: GeocodeResult,
    schools: Vec<SchoolRecord>,
    property: Option<PropertyRecord>,
    places: Vec<PlaceRecord>,
    news: Vec<NewsItem>,
    images: Option<Vec<ImageRef>>,
    radius_km: f64,
) -> UnifiedProfile {
    let center = geo.point();
    let map_schools = schools.iter().map(MapSchool::from).collect();
    let property_message = property.is_none().then(|| NO_PROPERTY_MESSAGE.to_string());

    UnifiedProfile {
        location: Location {
            normalized_address: geo.matched_address,
            lat: geo.lat,
            lon: geo.lon,
            census_geography: geo.geography,
        },
        map: MapData {
            center,
            schools: map_schools,
        },
        schools: schools.into_iter().map(School::from).collect(),
        property,
        property_message,
        listings: None,
        images,
        nearby_places: places.into_iter().map(NearbyPlace::from).collect(),
        radius_km,
        local_news: if news.is_empty() { None } else { Some(news) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> PropertyRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_property_type_hint() {
        assert_eq!(
            property_type_hint(&record(json!({ "propertyType": "Condo", "type": "x" }))),
            Some("Condo")
        );
        assert_eq!(property_type_hint(&record(json!({ "propertyType": "", "type": "Townhouse" }))), Some("Townhouse"));
        assert_eq!(property_type_hint(&record(json!({ "propertyType": 3 }))), None);
        assert_eq!(property_type_hint(&record(json!({}))), None);
    }

    #[test]
    fn test_assemble_without_property_or_news() {
        let geo = GeocodeResult {
            matched_address: "1 MAIN ST, SPRINGFIELD, IL, 62701".to_string(),
            lat: 39.8,
            lon: -89.6,
            geography: None,
        };
        let schools = vec![SchoolRecord {
            name: "Lincoln Elementary".to_string(),
            nces_id: None,
            street: None,
            city: None,
            state: None,
            zip: None,
            lat: None,
            lon: None,
            lea_id: None,
        }];

        let profile = assemble(geo, schools, None, vec![], vec![], None, 2.0);

        assert_eq!(profile.property_message.as_deref(), Some(NO_PROPERTY_MESSAGE));
        assert!(profile.local_news.is_none());
        assert_eq!(profile.map.schools[0].lat, 0.0);
        assert_eq!(profile.schools[0].lat, None);
        assert_eq!(profile.map.center.lat, 39.8);
    }
}
