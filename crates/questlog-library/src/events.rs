//! Change events emitted by the library store

use crate::{GameId, GameStatus};

/// Something that changed in the library and was persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryEvent {
    /// A game was added, or an existing entry got a new status
    Upserted {
        id: GameId,
        name: String,
        status: GameStatus,
        created: bool,
    },
    /// An existing entry's status changed
    StatusChanged {
        id: GameId,
        name: String,
        from: GameStatus,
        to: GameStatus,
    },
    /// A removal was requested; `name` falls back to a generic label when
    /// the game was not in the library
    Removed { id: GameId, name: String, found: bool },
}

impl LibraryEvent {
    pub fn id(&self) -> &GameId {
        match self {
            LibraryEvent::Upserted { id, .. }
            | LibraryEvent::StatusChanged { id, .. }
            | LibraryEvent::Removed { id, .. } => id,
        }
    }

    /// Confirmation text for the user
    pub fn message(&self) -> String {
        match self {
            LibraryEvent::Upserted { name, created: true, status, .. } => {
                format!("{} added to the library as {}", name, status.label())
            }
            LibraryEvent::Upserted { name, created: false, status, .. } => {
                format!("{} updated to {}", name, status.label())
            }
            LibraryEvent::StatusChanged { name, to, .. } => {
                format!("Status of {} changed to \"{}\"", name, to.label())
            }
            LibraryEvent::Removed { name, .. } => format!("{} removed from the library", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let added = LibraryEvent::Upserted {
            id: GameId::from("1"),
            name: "Hades".to_string(),
            status: GameStatus::Playing,
            created: true,
        };
        assert_eq!(added.message(), "Hades added to the library as Playing");

        let removed = LibraryEvent::Removed {
            id: GameId::from("1"),
            name: "Game".to_string(),
            found: false,
        };
        assert_eq!(removed.message(), "Game removed from the library");
        assert_eq!(removed.id().as_str(), "1");
    }
}
