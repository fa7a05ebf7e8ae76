use crate::config::SchoolsSettings;
use crate::core::distance::linear_bounding_box;
use crate::models::{GeoPoint, SchoolRecord};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::{http_client, SchoolFinder};

const OUT_FIELDS: &str = "NAME,NCESSCH,STREET,CITY,STATE,ZIP,LAT,LON,LEAID";

/// Errors that can occur when querying school locations
#[derive(Debug, Error)]
pub enum SchoolsError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("School service returned {0}")]
    ApiError(StatusCode),

    #[error("School service reported an error: {0}")]
    ServiceError(Value),

    #[error("Invalid response format: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// NCES EDGE public school locations (ArcGIS MapServer layer)
pub struct NcesSchoolClient {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    features: Vec<Feature>,
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    attributes: SchoolAttributes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
struct SchoolAttributes {
    name: Option<String>,
    ncessch: Option<String>,
    street: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    leaid: Option<String>,
}

impl From<SchoolAttributes> for SchoolRecord {
    fn from(att: SchoolAttributes) -> Self {
        Self {
            name: att.name.unwrap_or_default(),
            nces_id: att.ncessch,
            street: att.street,
            city: att.city,
            state: att.state,
            zip: att.zip,
            lat: att.lat,
            lon: att.lon,
            lea_id: att.leaid,
        }
    }
}

impl NcesSchoolClient {
    pub fn new(settings: &SchoolsSettings) -> Result<Self, reqwest::Error> {
        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client: http_client(settings.timeout_secs)?,
        })
    }

    /// Query schools intersecting the envelope around `center`
    pub async fn fetch(&self, center: GeoPoint, radius_km: f64) -> Result<Vec<SchoolRecord>, SchoolsError> {
        let bbox = linear_bounding_box(center, radius_km);
        let geometry = serde_json::json!({
            "xmin": bbox.min_lon,
            "ymin": bbox.min_lat,
            "xmax": bbox.max_lon,
            "ymax": bbox.max_lat,
        })
        .to_string();

        let url = format!(
            "{}/query?where=1%3D1&geometry={}&geometryType=esriGeometryEnvelope&inSR=4326\
             &spatialRel=esriSpatialRelIntersects&outFields={}&returnGeometry=false&f=json",
            self.base_url,
            urlencoding::encode(&geometry),
            urlencoding::encode(OUT_FIELDS),
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(SchoolsError::ApiError(response.status()));
        }

        let body = response.text().await?;
        let parsed: QueryResponse = serde_json::from_str(&body)?;

        if let Some(error) = parsed.error {
            return Err(SchoolsError::ServiceError(error));
        }

        Ok(parsed
            .features
            .into_iter()
            .map(|f| SchoolRecord::from(f.attributes))
            .collect())
    }
}

#[async_trait]
impl SchoolFinder for NcesSchoolClient {
    async fn find_schools(&self, center: GeoPoint, radius_km: f64) -> Vec<SchoolRecord> {
        match self.fetch(center, radius_km).await {
            Ok(schools) => {
                tracing::debug!("Found {} schools within {} km", schools.len(), radius_km);
                schools
            }
            Err(e) => {
                tracing::warn!(
                    "School lookup failed near {:.4},{:.4}, returning no schools: {}",
                    center.lat,
                    center.lon,
                    e
                );
                vec![]
            }
        }
    }
}
