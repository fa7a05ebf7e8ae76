use crate::config::{credential, ImageSettings};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use super::{http_client, ImageEnricher};

/// Errors that can occur when searching for a placeholder image
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("No image access key configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Image API returned {0}")]
    ApiError(StatusCode),

    #[error("Invalid response format: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// Unsplash photo search for a generic placeholder image
///
/// The returned image illustrates the kind of property; it is never a photo
/// of the property itself.
pub struct UnsplashClient {
    base_url: String,
    access_key: Option<String>,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<Photo>>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    #[serde(default)]
    urls: HashMap<String, String>,
}

/// Build the search text: property type (lower-cased, default "residential"), then city.
pub fn build_query(city: Option<&str>, property_type: Option<&str>) -> String {
    let kind = property_type
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .unwrap_or_else(|| "residential".to_string());

    match city.map(str::trim).filter(|c| !c.is_empty()) {
        Some(city) => format!("{kind} {city}"),
        None => kind,
    }
}

/// Prefer the "regular" rendition, then "small", then "full"
fn pick_url(mut urls: HashMap<String, String>) -> Option<String> {
    ["regular", "small", "full"]
        .into_iter()
        .find_map(|size| urls.remove(size).filter(|u| !u.is_empty()))
}

impl UnsplashClient {
    pub fn new(settings: &ImageSettings) -> Result<Self, reqwest::Error> {
        Ok(Self {
            base_url: settings.base_url.clone(),
            access_key: credential(&settings.access_key),
            client: http_client(settings.timeout_secs)?,
        })
    }

    pub async fn fetch(&self, city: Option<&str>, property_type: Option<&str>) -> Result<Option<String>, ImageError> {
        let access_key = self.access_key.as_deref().ok_or(ImageError::NotConfigured)?;
        let query = build_query(city, property_type);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("query", query.as_str()), ("client_id", access_key), ("per_page", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ImageError::ApiError(response.status()));
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;

        Ok(parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|photo| pick_url(photo.urls)))
    }
}

#[async_trait]
impl ImageEnricher for UnsplashClient {
    fn is_configured(&self) -> bool {
        self.access_key.is_some()
    }

    async fn find_image(&self, city: Option<&str>, property_type: Option<&str>) -> Option<String> {
        match self.fetch(city, property_type).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Placeholder image lookup failed: {}", e);
                None
            }
        }
    }
}
