//! Game catalog client for questlog
//!
//! Thin async wrapper around a RAWG-style HTTP API: text search, detail
//! lookup by id and a curated featured list. Responses are validated into
//! fully-shaped records at this boundary.
//!
//! # Features
//!
//! - Short queries never reach the network
//! - Missing or blank fields get explicit defaults
//! - Request sequencing so stale responses can be dropped by callers

mod client;
mod sequence;
mod types;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::{CatalogClient, MIN_QUERY_CHARS};
pub use sequence::{RequestSequencer, Ticket};
pub use types::{GameDetails, GameSummary, UNTITLED};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid catalog response: {0}")]
    Decode(reqwest::Error),

    #[error("No catalog API key configured")]
    MissingApiKey,

    #[error("Catalog returned no results")]
    NoResults,
}

/// Catalog client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// API base URL
    pub base_url: String,

    /// API key, sent as the `key` query parameter
    pub api_key: String,

    /// Maximum number of search results
    pub search_limit: u32,

    /// Number of featured games
    pub featured_count: u32,

    /// Ordering of the featured list
    pub featured_ordering: String,

    /// Release date range of the featured list (`from,to`)
    pub featured_dates: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.rawg.io/api".to_string(),
            api_key: String::new(),
            search_limit: 10,
            featured_count: 8,
            featured_ordering: "-rating".to_string(),
            featured_dates: "2023-01-01,2024-12-31".to_string(),
            timeout_secs: 30,
        }
    }
}
