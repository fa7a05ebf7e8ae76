use crate::config::{credential, NewsSettings};
use crate::models::{AreaHint, NewsItem};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::{http_client, NewsFinder};

/// Maximum articles requested and returned
pub const MAX_ARTICLES: usize = 10;
const WINDOW: &str = "7 days ago";

/// Errors that can occur when fetching local news
#[derive(Debug, Error)]
pub enum NewsError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("News API returned {0}")]
    ApiError(StatusCode),

    #[error("Invalid response format: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// NewsCatcher client
///
/// Tries the Local News API first, filtering on the location string. Keys
/// without Local News access get a 401 there; only in that case the v3
/// search API is queried with the location as free text instead.
pub struct NewsCatcherClient {
    local_url: String,
    search_url: String,
    api_key: Option<String>,
    client: Client,
}

#[derive(Debug, Serialize)]
struct LocalNewsRequest<'a> {
    q: &'a str,
    locations: [&'a str; 1],
    detection_methods: [&'a str; 2],
    lang: &'a str,
    from_: &'a str,
    page_size: usize,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    lang: &'a str,
    countries: &'a str,
    from_: &'a str,
    page_size: usize,
}

#[derive(Debug, Deserialize)]
struct ArticlesResponse {
    #[serde(default)]
    articles: Option<Vec<Map<String, Value>>>,
}

impl NewsCatcherClient {
    pub fn new(settings: &NewsSettings) -> Result<Self, reqwest::Error> {
        Ok(Self {
            local_url: settings.local_url.clone(),
            search_url: settings.search_url.clone(),
            api_key: credential(&settings.api_key),
            client: http_client(settings.timeout_secs)?,
        })
    }

    /// Fetch news for the area
    ///
    /// Returns an empty list without any call when there is no key or the
    /// hint has neither city nor state.
    pub async fn fetch(&self, area: &AreaHint) -> Result<Vec<NewsItem>, NewsError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(vec![]);
        };
        let Some(location) = area.location_string() else {
            return Ok(vec![]);
        };

        let local = LocalNewsRequest {
            q: "*",
            locations: [location.as_str()],
            detection_methods: ["local_section", "ai_extracted"],
            lang: "en",
            from_: WINDOW,
            page_size: MAX_ARTICLES,
        };

        let response = self
            .client
            .post(&self.local_url)
            .header("x-api-token", api_key)
            .json(&local)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let body = response.text().await?;
                Ok(normalize_articles(serde_json::from_str(&body)?))
            }
            StatusCode::UNAUTHORIZED => {
                tracing::info!(
                    "Local News API returned 401 (key lacks Local News access), searching news for {} instead",
                    location
                );
                self.search(api_key, &location).await
            }
            status => Err(NewsError::ApiError(status)),
        }
    }

    async fn search(&self, api_key: &str, location: &str) -> Result<Vec<NewsItem>, NewsError> {
        let search = SearchRequest {
            q: location,
            lang: "en",
            countries: "US",
            from_: WINDOW,
            page_size: MAX_ARTICLES,
        };

        let response = self
            .client
            .post(&self.search_url)
            .header("x-api-token", api_key)
            .json(&search)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NewsError::ApiError(response.status()));
        }

        let body = response.text().await?;
        Ok(normalize_articles(serde_json::from_str(&body)?))
    }
}

fn normalize_articles(response: ArticlesResponse) -> Vec<NewsItem> {
    let str_field = |article: &Map<String, Value>, keys: &[&str]| {
        keys.iter()
            .filter_map(|k| article.get(*k).and_then(Value::as_str))
            .find(|v| !v.is_empty())
            .map(str::to_string)
    };

    response
        .articles
        .unwrap_or_default()
        .iter()
        .take(MAX_ARTICLES)
        .filter_map(|a| {
            Some(NewsItem {
                title: str_field(a, &["title"])?,
                url: str_field(a, &["link", "url"])?,
                source: str_field(a, &["domain_url", "rights", "source"]),
                published_date: str_field(a, &["published_date"]),
            })
        })
        .collect()
}

#[async_trait]
impl NewsFinder for NewsCatcherClient {
    async fn find_news(&self, area: &AreaHint) -> Vec<NewsItem> {
        match self.fetch(area).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Local news fetch failed for {:?}: {}", area.location_string(), e);
                vec![]
            }
        }
    }
}
