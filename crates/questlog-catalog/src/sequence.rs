//! Ordering of overlapping catalog requests

/// Identifies one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Hands out tickets and decides which responses are still worth showing
///
/// A response is accepted unless a response to a newer request has already
/// been accepted. Requests are never cancelled.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: u64,
    applied: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for a new request
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Record a completed response, returning whether it should be shown
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if ticket.0 > self.applied {
            self.applied = ticket.0;
            true
        } else {
            tracing::debug!("Discarding stale response {:?}", ticket);
            false
        }
    }

    /// Whether the latest issued request has not been answered yet
    pub fn is_pending(&self) -> bool {
        self.applied < self.issued
    }

    /// Forget outstanding requests; their responses will be discarded
    pub fn invalidate(&mut self) {
        self.issued += 1;
        self.applied = self.issued;
    }
}
