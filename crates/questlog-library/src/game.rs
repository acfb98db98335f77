//! Tracked game entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::StatusFilter;

/// Catalog identifier of a game, unique within the library
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for GameId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for GameId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

// Older exports stored the catalog's numeric id as-is.
impl<'de> Deserialize<'de> for GameId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Number(u64),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Text(id) => GameId(id),
            Repr::Number(id) => GameId::from(id),
        })
    }
}

/// Where a game sits in the player's collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Completed,
    Wishlist,
    Abandoned,
}

impl GameStatus {
    pub const ALL: [GameStatus; 4] = [
        GameStatus::Playing,
        GameStatus::Completed,
        GameStatus::Abandoned,
        GameStatus::Wishlist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Playing => "playing",
            GameStatus::Completed => "completed",
            GameStatus::Wishlist => "wishlist",
            GameStatus::Abandoned => "abandoned",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            GameStatus::Playing => "Playing",
            GameStatus::Completed => "Completed",
            GameStatus::Wishlist => "Wishlist",
            GameStatus::Abandoned => "Abandoned",
        }
    }

    /// Next status in view order, wrapping around
    pub fn next(&self) -> GameStatus {
        match self {
            GameStatus::Playing => GameStatus::Completed,
            GameStatus::Completed => GameStatus::Abandoned,
            GameStatus::Abandoned => GameStatus::Wishlist,
            GameStatus::Wishlist => GameStatus::Playing,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for GameStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "playing" => Ok(GameStatus::Playing),
            "completed" => Ok(GameStatus::Completed),
            "wishlist" => Ok(GameStatus::Wishlist),
            "abandoned" => Ok(GameStatus::Abandoned),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// A game in the library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedGame {
    pub id: GameId,
    pub name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image: Option<String>,
    pub status: GameStatus,
    /// Set on first insertion, never touched afterwards
    pub added_date: DateTime<Utc>,
    #[serde(default)]
    pub genres: Vec<String>,
}

fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Input for an add-or-update
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub id: GameId,
    pub name: String,
    pub image: Option<String>,
    pub status: GameStatus,
    pub genres: Vec<String>,
}

impl NewEntry {
    pub fn new(id: impl Into<GameId>, name: impl Into<String>, status: GameStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: None,
            status,
            genres: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        let image = image.into();
        self.image = if image.trim().is_empty() {
            None
        } else {
            Some(image)
        };
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn into_tracked(self, added_date: DateTime<Utc>) -> TrackedGame {
        TrackedGame {
            id: self.id,
            name: self.name,
            image: self.image,
            status: self.status,
            added_date,
            genres: self.genres,
        }
    }
}

/// Per-status totals of the library
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub all: usize,
    pub playing: usize,
    pub completed: usize,
    pub abandoned: usize,
    pub wishlist: usize,
}

impl StatusCounts {
    pub fn tally<'a>(games: impl IntoIterator<Item = &'a TrackedGame>) -> Self {
        let mut counts = Self::default();
        for game in games {
            counts.all += 1;
            match game.status {
                GameStatus::Playing => counts.playing += 1,
                GameStatus::Completed => counts.completed += 1,
                GameStatus::Abandoned => counts.abandoned += 1,
                GameStatus::Wishlist => counts.wishlist += 1,
            }
        }
        counts
    }

    pub fn get(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.all,
            StatusFilter::Status(GameStatus::Playing) => self.playing,
            StatusFilter::Status(GameStatus::Completed) => self.completed,
            StatusFilter::Status(GameStatus::Abandoned) => self.abandoned,
            StatusFilter::Status(GameStatus::Wishlist) => self.wishlist,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in GameStatus::ALL {
            assert_eq!(status.as_str().parse::<GameStatus>().unwrap(), status);
        }
        assert_eq!(
            "Playing".parse::<GameStatus>(),
            Err(ParseStatusError("Playing".to_string()))
        );
    }

    #[test]
    fn test_status_cycle_visits_every_status() {
        let mut status = GameStatus::Playing;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(status);
            status = status.next();
        }
        assert_eq!(status, GameStatus::Playing);
        for s in GameStatus::ALL {
            assert!(seen.contains(&s));
        }
    }

    #[test]
    fn test_deserialize_stored_entry() {
        let json = r#"{
            "id": "3498",
            "name": "Grand Theft Auto V",
            "image": "",
            "status": "completed",
            "addedDate": "2024-03-01T12:00:00.000Z",
            "genres": ["Action", "Adventure"]
        }"#;

        let game: TrackedGame = serde_json::from_str(json).unwrap();
        assert_eq!(game.id, GameId::from("3498"));
        assert_eq!(game.image, None);
        assert_eq!(game.status, GameStatus::Completed);
        assert_eq!(game.genres, vec!["Action", "Adventure"]);
    }

    #[test]
    fn test_deserialize_numeric_id_and_missing_fields() {
        let json = r#"{"id": 42, "name": "Hades", "status": "playing", "addedDate": "2024-01-01T00:00:00Z"}"#;

        let game: TrackedGame = serde_json::from_str(json).unwrap();
        assert_eq!(game.id.as_str(), "42");
        assert!(game.genres.is_empty());
        assert!(game.image.is_none());
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let game = NewEntry::new("1", "Celeste", GameStatus::Wishlist).into_tracked(Utc::now());
        let json = serde_json::to_string(&game).unwrap();
        assert!(json.contains("\"addedDate\""));
        assert!(json.contains("\"status\":\"wishlist\""));
    }

    #[test]
    fn test_new_entry_blank_image() {
        let entry = NewEntry::new("1", "Celeste", GameStatus::Playing).with_image("  ");
        assert!(entry.image.is_none());

        let entry = entry.with_image("https://img.example/celeste.jpg");
        assert_eq!(entry.image.as_deref(), Some("https://img.example/celeste.jpg"));
    }

    #[test]
    fn test_counts_tally() {
        let now = Utc::now();
        let games = vec![
            NewEntry::new("1", "A", GameStatus::Playing).into_tracked(now),
            NewEntry::new("2", "B", GameStatus::Playing).into_tracked(now),
            NewEntry::new("3", "C", GameStatus::Wishlist).into_tracked(now),
        ];

        let counts = StatusCounts::tally(&games);
        assert_eq!(counts.all, 3);
        assert_eq!(counts.playing, 2);
        assert_eq!(counts.wishlist, 1);
        assert_eq!(counts.get(StatusFilter::Status(GameStatus::Completed)), 0);
        assert_eq!(counts.get(StatusFilter::All), 3);
    }
}
