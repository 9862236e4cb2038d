use std::env;
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::Movie;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::CatalogProvider;
use crate::error::CatalogError;

const DEFAULT_CATALOG_URL: &str = "https://tv-api.com/en/API/Top250Movies/k_zcuw1ytf";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub url: String,
    pub timeout: Duration,
}

impl CatalogConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let url = env::var("QUIZ_CATALOG_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATALOG_URL.into());
        let timeout = env::var("QUIZ_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), Duration::from_secs);
        Self { url, timeout }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CATALOG_URL.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Catalog provider speaking the Top-250 JSON API over HTTP.
#[derive(Clone)]
pub struct HttpCatalogProvider {
    client: Client,
    config: CatalogConfig,
}

impl HttpCatalogProvider {
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be initialized.
    pub fn new(config: CatalogConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>, CatalogError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| CatalogError::NetworkFailure(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::ServerFailure(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| CatalogError::NetworkFailure(err.to_string()))?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl CatalogProvider for HttpCatalogProvider {
    async fn fetch_catalog(&self) -> Result<Vec<Movie>, CatalogError> {
        let url = Url::parse(&self.config.url).map_err(|_| CatalogError::InvalidSourceAddress)?;
        let body = self.get_bytes(url).await?;
        let movies = decode_catalog(&body)?;
        tracing::info!(count = movies.len(), "fetched movie catalog");
        Ok(movies)
    }

    async fn fetch_image(&self, movie: &Movie) -> Result<Vec<u8>, CatalogError> {
        let url = movie
            .resized_image_url()
            .map_err(|_| CatalogError::InvalidSourceAddress)?;
        self.get_bytes(url).await
    }
}

#[derive(Debug, Deserialize)]
struct TopMoviesResponse {
    #[serde(rename = "errorMessage", default)]
    error_message: Option<String>,
    items: Vec<TopMovieItem>,
}

#[derive(Debug, Deserialize)]
struct TopMovieItem {
    #[serde(rename = "fullTitle")]
    full_title: String,
    #[serde(rename = "imDbRating")]
    rating: String,
    image: String,
}

/// Decode a Top-250 response body into movies.
///
/// # Errors
///
/// Returns `CatalogError::Rejected` when the provider reports an error message and
/// `CatalogError::DecodingFailure` for malformed JSON or an empty item list.
pub fn decode_catalog(body: &[u8]) -> Result<Vec<Movie>, CatalogError> {
    let response: TopMoviesResponse = serde_json::from_slice(body).map_err(|err| {
        tracing::warn!(%err, "failed to decode movie catalog");
        CatalogError::DecodingFailure
    })?;

    if let Some(message) = response.error_message.filter(|m| !m.trim().is_empty()) {
        return Err(CatalogError::Rejected(message));
    }
    if response.items.is_empty() {
        return Err(CatalogError::DecodingFailure);
    }

    Ok(response
        .items
        .into_iter()
        .map(|item| Movie::new(item.full_title, item.rating, item.image))
        .collect())
}
