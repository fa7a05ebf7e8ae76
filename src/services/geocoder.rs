use crate::config::GeocoderSettings;
use crate::models::GeocodeResult;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::{http_client, truncate_body, Geocoder};

const BENCHMARK: &str = "Public_AR_Current";
const VINTAGE: &str = "Current_Current";

/// Errors that can occur when geocoding an address
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Geocoder returned {status}: {body}")]
    ApiError { status: StatusCode, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// US Census Bureau geocoder client
///
/// Uses the `geographies/onelineaddress` endpoint so that one call returns
/// both coordinates and census geography.
pub struct CensusGeocoder {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct CensusResponse {
    result: Option<CensusResult>,
}

#[derive(Debug, Deserialize)]
struct CensusResult {
    #[serde(rename = "addressMatches", default)]
    address_matches: Vec<CensusMatch>,
}

#[derive(Debug, Deserialize)]
struct CensusMatch {
    #[serde(rename = "matchedAddress")]
    matched_address: Option<String>,
    coordinates: Option<CensusCoordinates>,
    geographies: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct CensusCoordinates {
    x: Option<f64>,
    y: Option<f64>,
}

impl CensusGeocoder {
    pub fn new(settings: &GeocoderSettings) -> Result<Self, reqwest::Error> {
        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client: http_client(settings.timeout_secs)?,
        })
    }
}

#[async_trait]
impl Geocoder for CensusGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeocodeResult>, GeocodeError> {
        let url = format!("{}/geographies/onelineaddress", self.base_url);

        tracing::debug!("Geocoding address: {}", address);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("address", address),
                ("benchmark", BENCHMARK),
                ("vintage", VINTAGE),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GeocodeError::ApiError {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: CensusResponse = serde_json::from_str(&body)?;

        let first = parsed
            .result
            .and_then(|r| r.address_matches.into_iter().next());

        let Some(first) = first else {
            tracing::info!("No geocoder match for address: {}", address);
            return Ok(None);
        };

        let (lon, lat) = match first.coordinates {
            Some(CensusCoordinates { x: Some(x), y: Some(y) }) => (x, y),
            _ => {
                tracing::info!("Geocoder match without coordinates for address: {}", address);
                return Ok(None);
            }
        };

        Ok(Some(GeocodeResult {
            matched_address: first.matched_address.unwrap_or_else(|| address.to_string()),
            lat,
            lon,
            geography: first.geographies,
        }))
    }
}
