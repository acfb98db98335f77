//! Catalog records and their wire shapes

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

/// Name given to catalog entries that arrive without one
pub const UNTITLED: &str = "Untitled";

/// A search or featured-list hit
#[derive(Debug, Clone, PartialEq)]
pub struct GameSummary {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub released: Option<NaiveDate>,
    /// Average rating out of 5, `None` when unrated
    pub rating: Option<f32>,
    pub genres: Vec<String>,
    pub platforms: Vec<String>,
}

impl GameSummary {
    pub fn release_year(&self) -> Option<i32> {
        self.released.map(|date| date.year())
    }
}

/// Full record for a single game
#[derive(Debug, Clone, PartialEq)]
pub struct GameDetails {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub released: Option<NaiveDate>,
    pub rating: Option<f32>,
    pub genres: Vec<String>,
    pub platforms: Vec<String>,
    pub description: Option<String>,
}

impl GameDetails {
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
            released: self.released,
            rating: self.rating,
            genres: self.genres.clone(),
            platforms: self.platforms.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Number(u64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Number(id) => id.to_string(),
            RawId::Text(id) => id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawNamed {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPlatformEntry {
    platform: RawNamed,
}

/// A game as the catalog sends it
#[derive(Debug, Deserialize)]
pub(crate) struct RawGame {
    id: RawId,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    background_image: Option<String>,
    #[serde(default)]
    released: Option<String>,
    #[serde(default)]
    rating: Option<f32>,
    #[serde(default)]
    genres: Option<Vec<RawNamed>>,
    #[serde(default)]
    platforms: Option<Vec<RawPlatformEntry>>,
    #[serde(default)]
    description_raw: Option<String>,
}

/// One page of list results
#[derive(Debug, Deserialize)]
pub(crate) struct RawPage {
    #[serde(default)]
    pub(crate) results: Option<Vec<RawGame>>,
}

impl RawPage {
    pub(crate) fn into_summaries(self) -> Vec<GameSummary> {
        self.results
            .unwrap_or_default()
            .into_iter()
            .map(GameSummary::from)
            .collect()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn names(list: Option<Vec<RawNamed>>) -> Vec<String> {
    list.unwrap_or_default()
        .into_iter()
        .filter_map(|named| non_blank(named.name))
        .collect()
}

fn parse_release(released: Option<String>) -> Option<NaiveDate> {
    released.and_then(|date| NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok())
}

fn parse_rating(rating: Option<f32>) -> Option<f32> {
    rating.filter(|r| r.is_finite() && *r > 0.0)
}

impl From<RawGame> for GameDetails {
    fn from(raw: RawGame) -> Self {
        Self {
            id: raw.id.into_string(),
            name: non_blank(raw.name).unwrap_or_else(|| UNTITLED.to_string()),
            image: non_blank(raw.background_image),
            released: parse_release(raw.released),
            rating: parse_rating(raw.rating),
            genres: names(raw.genres),
            platforms: names(
                raw.platforms
                    .map(|entries| entries.into_iter().map(|e| e.platform).collect()),
            ),
            description: non_blank(raw.description_raw),
        }
    }
}

impl From<RawGame> for GameSummary {
    fn from(raw: RawGame) -> Self {
        GameDetails::from(raw).summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_detail_record() {
        let json = r#"{
            "id": 3498,
            "name": "Grand Theft Auto V",
            "background_image": "https://media.rawg.io/gta5.jpg",
            "released": "2013-09-17",
            "rating": 4.47,
            "genres": [{"id": 4, "name": "Action"}, {"id": 3, "name": "Adventure"}],
            "platforms": [{"platform": {"id": 4, "name": "PC"}}, {"platform": {"id": 187, "name": "PlayStation 5"}}],
            "description_raw": "Rockstar Games went bigger."
        }"#;

        let raw: RawGame = serde_json::from_str(json).unwrap();
        let details = GameDetails::from(raw);

        assert_eq!(details.id, "3498");
        assert_eq!(details.name, "Grand Theft Auto V");
        assert_eq!(details.released, NaiveDate::from_ymd_opt(2013, 9, 17));
        assert_eq!(details.genres, vec!["Action", "Adventure"]);
        assert_eq!(details.platforms, vec!["PC", "PlayStation 5"]);
        assert_eq!(details.description.as_deref(), Some("Rockstar Games went bigger."));
        assert_eq!(details.summary().release_year(), Some(2013));
    }

    #[test]
    fn test_defaults_applied_to_sparse_record() {
        let json = r#"{
            "id": "hades",
            "name": "  ",
            "background_image": "",
            "released": null,
            "rating": 0,
            "genres": null,
            "platforms": null
        }"#;

        let raw: RawGame = serde_json::from_str(json).unwrap();
        let summary = GameSummary::from(raw);

        assert_eq!(summary.id, "hades");
        assert_eq!(summary.name, UNTITLED);
        assert!(summary.image.is_none());
        assert!(summary.released.is_none());
        assert!(summary.rating.is_none());
        assert!(summary.genres.is_empty());
        assert!(summary.platforms.is_empty());
    }

    #[test]
    fn test_bad_release_date_is_dropped() {
        let raw: RawGame =
            serde_json::from_str(r#"{"id": 1, "name": "X", "released": "TBA"}"#).unwrap();
        assert!(GameSummary::from(raw).released.is_none());
    }

    #[test]
    fn test_page_without_results() {
        let page: RawPage = serde_json::from_str(r#"{"count": 0, "results": null}"#).unwrap();
        assert!(page.into_summaries().is_empty());
    }
}
