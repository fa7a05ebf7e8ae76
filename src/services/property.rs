use crate::config::{credential, PropertySettings};
use crate::models::PropertyRecord;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use super::{http_client, PropertyLookup};

/// Reasons a property lookup produced no record
#[derive(Debug, Error)]
pub enum PropertyError {
    #[error("No property API key configured")]
    NotConfigured,

    #[error("No property record found")]
    NotFound,

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Property API returned {0}")]
    ApiError(StatusCode),

    #[error("Invalid response format: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// RentCast property records client
pub struct RentCastClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl RentCastClient {
    pub fn new(settings: &PropertySettings) -> Result<Self, reqwest::Error> {
        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: credential(&settings.api_key),
            client: http_client(settings.timeout_secs)?,
        })
    }

    /// Fetch the property record for an address, with the reason when there is none
    pub async fn fetch(&self, address: &str) -> Result<PropertyRecord, PropertyError> {
        let api_key = self.api_key.as_deref().ok_or(PropertyError::NotConfigured)?;

        let url = format!(
            "{}/properties?address={}",
            self.base_url,
            urlencoding::encode(address)
        );

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(PropertyError::NotFound),
            status if !status.is_success() => return Err(PropertyError::ApiError(status)),
            _ => {}
        }

        let body = response.text().await?;
        let json: Value = serde_json::from_str(&body)?;

        first_record(json).ok_or(PropertyError::NotFound)
    }
}

/// A list yields its first object; an object yields itself if it carries an id.
fn first_record(json: Value) -> Option<PropertyRecord> {
    match json {
        Value::Array(items) => match items.into_iter().next() {
            Some(Value::Object(record)) => Some(record),
            _ => None,
        },
        Value::Object(record) if has_id(&record) => Some(record),
        _ => None,
    }
}

fn has_id(record: &PropertyRecord) -> bool {
    match record.get("id") {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

#[async_trait]
impl PropertyLookup for RentCastClient {
    async fn lookup_property(&self, address: &str) -> Option<PropertyRecord> {
        match self.fetch(address).await {
            Ok(record) => Some(record),
            Err(e @ (PropertyError::NotConfigured | PropertyError::NotFound)) => {
                tracing::info!("No property data for {}: {}", address, e);
                None
            }
            Err(e) => {
                tracing::warn!("Property lookup failed for {}: {}", address, e);
                None
            }
        }
    }
}
