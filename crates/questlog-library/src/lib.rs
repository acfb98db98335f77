//! Game library store for questlog
//!
//! Owns the collection of tracked games, the rules for mutating it, the
//! derived views (filters and status counts) and its durable representation.
//! The whole collection lives in one storage slot and is rewritten after
//! every mutation.

mod events;
mod game;
mod slot;
mod store;

pub use events::LibraryEvent;
pub use game::{GameId, GameStatus, NewEntry, ParseStatusError, StatusCounts, TrackedGame};
pub use slot::{FileSlot, MemorySlot, Slot};
pub use store::{LibraryStore, Removal, StatusUpdate, Upsert};

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Name used in confirmations when a removed game is no longer in the library.
pub const FALLBACK_GAME_NAME: &str = "Game";

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Slot error: {0}")]
    Slot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Library filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    /// Every tracked game
    #[default]
    All,
    /// Games with one status
    Status(GameStatus),
}

impl StatusFilter {
    /// Filters in the order the views list them
    pub const ALL: [StatusFilter; 5] = [
        StatusFilter::All,
        StatusFilter::Status(GameStatus::Playing),
        StatusFilter::Status(GameStatus::Completed),
        StatusFilter::Status(GameStatus::Abandoned),
        StatusFilter::Status(GameStatus::Wishlist),
    ];

    /// Check whether a game passes this filter
    pub fn matches(&self, game: &TrackedGame) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Status(status) => game.status == *status,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Status(status) => status.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Status(status) => status.label(),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Status)
    }
}

impl From<GameStatus> for StatusFilter {
    fn from(status: GameStatus) -> Self {
        StatusFilter::Status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parse() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "wishlist".parse::<StatusFilter>().unwrap(),
            StatusFilter::Status(GameStatus::Wishlist)
        );
        assert!("finished".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_filter_display_round_trip() {
        for filter in StatusFilter::ALL {
            assert_eq!(filter.to_string().parse::<StatusFilter>().unwrap(), filter);
        }
    }

    #[test]
    fn test_error_display() {
        let err = LibraryError::Slot("locked".to_string());
        assert!(format!("{}", err).contains("locked"));
    }
}
