//! The library store

use crate::{
    FALLBACK_GAME_NAME, GameId, GameStatus, LibraryError, LibraryEvent, NewEntry, Slot,
    StatusCounts, StatusFilter, TrackedGame,
};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::mpsc::{Receiver, Sender, channel};

/// Outcome of an add-or-update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// A new entry was appended
    Created,
    /// The id was already tracked; only its status changed
    Updated { previous: GameStatus },
}

/// Outcome of a removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// Name of the removed game, or the generic fallback
    pub name: String,
    pub found: bool,
}

/// Outcome of a status update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdate {
    Changed { previous: GameStatus },
    /// Nothing was written
    NotFound,
}

/// Owner of the tracked game collection and its durable slot
///
/// The collection is loaded once when the store is opened and rewritten in
/// full after each mutation. Every persisted mutation is announced on the
/// store's event channel.
pub struct LibraryStore<S: Slot> {
    slot: S,
    games: Vec<TrackedGame>,
    tx: Sender<LibraryEvent>,
    rx: Receiver<LibraryEvent>,
}

impl<S: Slot> LibraryStore<S> {
    /// Open the store, loading whatever the slot holds
    pub fn open(slot: S) -> Self {
        let games = Self::load(&slot);
        let (tx, rx) = channel();

        tracing::info!("Library opened with {} games", games.len());

        Self {
            slot,
            games,
            tx,
            rx,
        }
    }

    /// Read the collection from a slot
    ///
    /// Never fails: a missing, unreadable or corrupt slot yields an empty
    /// library. Duplicate ids keep their first entry.
    pub fn load(slot: &S) -> Vec<TrackedGame> {
        let contents = match slot.read() {
            Ok(Some(contents)) => contents,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Could not read library, starting empty: {}", e);
                return Vec::new();
            }
        };

        let parsed: Vec<TrackedGame> = match serde_json::from_str(&contents) {
            Ok(games) => games,
            Err(e) => {
                tracing::warn!("Stored library is corrupt, starting empty: {}", e);
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let total = parsed.len();
        let games: Vec<TrackedGame> = parsed
            .into_iter()
            .filter(|game| seen.insert(game.id.clone()))
            .collect();

        if games.len() != total {
            tracing::warn!("Dropped {} duplicate library entries", total - games.len());
        }

        games
    }

    /// Serialize the whole collection into the slot
    pub fn save(&self) -> Result<(), LibraryError> {
        let contents = serde_json::to_string(&self.games)?;
        self.slot.write(&contents)
    }

    /// Add a game, or overwrite the status of an already tracked one
    ///
    /// For a tracked id only `status` changes; name, image, genres and the
    /// added date stay as first recorded.
    pub fn add_or_update(&mut self, entry: NewEntry) -> Result<Upsert, LibraryError> {
        let (upsert, name, status) = match self.position(&entry.id) {
            Some(index) => {
                let game = &mut self.games[index];
                let previous = game.status;
                game.status = entry.status;
                (Upsert::Updated { previous }, game.name.clone(), game.status)
            }
            None => {
                let name = entry.name.clone();
                let status = entry.status;
                self.games.push(entry.clone().into_tracked(Utc::now()));
                (Upsert::Created, name, status)
            }
        };

        tracing::debug!("Upsert {} ({:?})", entry.id, upsert);

        let saved = self.save();
        self.emit(LibraryEvent::Upserted {
            id: entry.id,
            name,
            status,
            created: upsert == Upsert::Created,
        });
        saved.map(|_| upsert)
    }

    /// Remove a game
    ///
    /// The slot is rewritten and an event emitted even when the id is not
    /// tracked; the event then carries the fallback name.
    pub fn remove(&mut self, id: &GameId) -> Result<Removal, LibraryError> {
        let removal = match self.position(id) {
            Some(index) => Removal {
                name: self.games.remove(index).name,
                found: true,
            },
            None => {
                tracing::debug!("Remove of untracked game {}", id);
                Removal {
                    name: FALLBACK_GAME_NAME.to_string(),
                    found: false,
                }
            }
        };

        let saved = self.save();
        self.emit(LibraryEvent::Removed {
            id: id.clone(),
            name: removal.name.clone(),
            found: removal.found,
        });
        saved.map(|_| removal)
    }

    /// Change the status of a tracked game
    ///
    /// Unknown ids leave the library and the slot untouched and emit nothing.
    pub fn update_status(
        &mut self,
        id: &GameId,
        status: GameStatus,
    ) -> Result<StatusUpdate, LibraryError> {
        let Some(index) = self.position(id) else {
            tracing::debug!("Status update for untracked game {}", id);
            return Ok(StatusUpdate::NotFound);
        };

        let game = &mut self.games[index];
        let previous = game.status;
        game.status = status;
        let name = game.name.clone();

        let saved = self.save();
        self.emit(LibraryEvent::StatusChanged {
            id: id.clone(),
            name,
            from: previous,
            to: status,
        });
        saved.map(|_| StatusUpdate::Changed { previous })
    }

    /// Games passing a filter, in library order
    pub fn filter(&self, filter: StatusFilter) -> Vec<&TrackedGame> {
        self.games.iter().filter(|game| filter.matches(game)).collect()
    }

    /// Per-status totals, computed on each call
    pub fn counts(&self) -> StatusCounts {
        StatusCounts::tally(&self.games)
    }

    pub fn get(&self, id: &GameId) -> Option<&TrackedGame> {
        self.games.iter().find(|game| &game.id == id)
    }

    pub fn contains(&self, id: &GameId) -> bool {
        self.position(id).is_some()
    }

    /// All games in insertion order
    pub fn games(&self) -> &[TrackedGame] {
        &self.games
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Try to receive a change event without blocking
    pub fn try_recv(&self) -> Option<LibraryEvent> {
        self.rx.try_recv().ok()
    }

    /// Take every pending change event
    pub fn drain_events(&self) -> Vec<LibraryEvent> {
        self.rx.try_iter().collect()
    }

    fn position(&self, id: &GameId) -> Option<usize> {
        self.games.iter().position(|game| &game.id == id)
    }

    fn emit(&self, event: LibraryEvent) {
        // The store owns the receiver, so the channel never closes.
        let _ = self.tx.send(event);
    }
}
