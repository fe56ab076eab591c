//! TMDB movie search provider
//!
//! API Flow:
//! 1. Search: /search/movie?api_key=…&query=<title>&year=<year>
//! 2. Take `poster_path` from the first result, if any
//! 3. Join it onto the image base URL (e.g. https://image.tmdb.org/t/p/w300)
//!
//! A response without results, or whose first result has no poster, is a
//! "no match" rather than an error.
use reqwest::Client as HttpClient;
use serde::Deserialize;

use super::PosterLookup;
use crate::config::Config;
use crate::error::{CatalogError, CatalogResult};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    poster_path: Option<String>,
}

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_base: String,
}

impl TmdbClient {
    pub fn new(api_key: String, api_url: String, image_base: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            image_base,
        }
    }

    /// Build a client from configuration; `None` without an API key
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.api_key()?;
        Some(Self::new(
            api_key.to_string(),
            config.tmdb_api_url.clone(),
            config.tmdb_image_base.clone(),
        ))
    }

    /// Search URL for a title and optional year, with the title percent-encoded
    fn search_url(&self, title: &str, year: Option<i32>) -> String {
        let mut url = format!(
            "{}/search/movie?api_key={}&query={}",
            self.api_url.trim_end_matches('/'),
            urlencoding::encode(&self.api_key),
            urlencoding::encode(title),
        );
        if let Some(year) = year {
            url.push_str(&format!("&year={}", year));
        }
        url
    }

    /// Poster URL from a search response body, if the first result has one
    fn poster_from_body(&self, body: &str) -> CatalogResult<Option<String>> {
        let response: SearchResponse = serde_json::from_str(body)?;

        Ok(response
            .results
            .into_iter()
            .next()
            .and_then(|r| r.poster_path)
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}{}", self.image_base, path)))
    }
}

#[async_trait::async_trait]
impl PosterLookup for TmdbClient {
    async fn find_poster(&self, title: &str, year: Option<i32>) -> CatalogResult<Option<String>> {
        let response = self
            .http_client
            .get(self.search_url(title, year))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(CatalogError::ExternalApi(format!(
                "TMDB API returned status {}",
                status
            )));
        }

        let body = response.text().await?;
        let poster = self.poster_from_body(&body).map_err(|e| {
            tracing::debug!(error = %e, title = %title, "Failed to parse TMDB response");
            e
        })?;

        tracing::debug!(
            title = %title,
            year = ?year,
            found = poster.is_some(),
            provider = "tmdb",
            "Poster search completed"
        );

        Ok(poster)
    }
}
