//! Catalog HTTP client

use crate::types::{RawGame, RawPage};
use crate::{CatalogConfig, CatalogError, GameDetails, GameSummary};
use reqwest::{Response, StatusCode};
use std::time::Duration;

/// Queries shorter than this (in characters, ignoring surrounding
/// whitespace) are answered with no results and never sent
pub const MIN_QUERY_CHARS: usize = 3;

/// Catalog API client
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    config: CatalogConfig,
}

impl CatalogClient {
    /// Create a new catalog client
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("questlog/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Whether a query is long enough to be sent
    pub fn is_searchable(query: &str) -> bool {
        query.trim().chars().count() >= MIN_QUERY_CHARS
    }

    /// Search games by name
    ///
    /// Returns at most `search_limit` ranked matches. Short queries yield an
    /// empty list without any request.
    pub async fn search(&self, query: &str) -> Result<Vec<GameSummary>, CatalogError> {
        if !Self::is_searchable(query) {
            tracing::debug!("Query {:?} too short, not searching", query);
            return Ok(Vec::new());
        }

        let limit = self.config.search_limit.to_string();
        let response = self
            .get("/games", &[("search", query.trim()), ("page_size", limit.as_str())])
            .await?;
        let page: RawPage = Self::parse(Self::check(response).await?).await?;

        let mut results = page.into_summaries();
        results.truncate(self.config.search_limit as usize);

        tracing::debug!("Search {:?} returned {} games", query, results.len());
        Ok(results)
    }

    /// Get the full record of a game
    ///
    /// `Ok(None)` when the catalog does not know the id, or the id cannot be
    /// one it would know.
    pub async fn fetch_details(&self, id: &str) -> Result<Option<GameDetails>, CatalogError> {
        let id = id.trim();
        if !Self::is_valid_id(id) {
            tracing::debug!("Refusing to look up invalid id {:?}", id);
            return Ok(None);
        }

        let response = self.get(&format!("/games/{}", id), &[]).await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("Game {} not found in catalog", id);
            return Ok(None);
        }

        let raw: RawGame = Self::parse(Self::check(response).await?).await?;
        Ok(Some(GameDetails::from(raw)))
    }

    /// Get the curated featured list
    ///
    /// An empty list is reported as [`CatalogError::NoResults`].
    pub async fn fetch_featured(&self) -> Result<Vec<GameSummary>, CatalogError> {
        let count = self.config.featured_count.to_string();
        let response = self
            .get(
                "/games",
                &[
                    ("page_size", count.as_str()),
                    ("ordering", self.config.featured_ordering.as_str()),
                    ("dates", self.config.featured_dates.as_str()),
                ],
            )
            .await?;
        let page: RawPage = Self::parse(Self::check(response).await?).await?;

        let mut featured = page.into_summaries();
        featured.truncate(self.config.featured_count as usize);

        if featured.is_empty() {
            return Err(CatalogError::NoResults);
        }

        Ok(featured)
    }

    /// Issue a GET against the catalog with the API key attached
    async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Response, CatalogError> {
        if self.config.api_key.trim().is_empty() {
            return Err(CatalogError::MissingApiKey);
        }

        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        Ok(response)
    }

    /// Turn a non-success status into an error
    async fn check(response: Response) -> Result<Response, CatalogError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!("Catalog request failed with {}", status);
        Err(CatalogError::Api {
            status: status.as_u16(),
            body,
        })
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, CatalogError> {
        response.json().await.map_err(|e| {
            if e.is_decode() {
                CatalogError::Decode(e)
            } else {
                CatalogError::Http(e)
            }
        })
    }

    fn is_valid_id(id: &str) -> bool {
        !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}
