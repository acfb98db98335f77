//! Background catalog requests

use questlog_catalog::{
    CatalogClient, CatalogError, GameDetails, GameSummary, RequestSequencer, Ticket,
};
use std::sync::mpsc::{Receiver, Sender, channel};
use tokio::runtime::Handle;

/// A finished catalog request
#[derive(Debug)]
pub enum CatalogReply {
    Search {
        ticket: Ticket,
        query: String,
        result: Result<Vec<GameSummary>, CatalogError>,
    },
    Details {
        ticket: Ticket,
        id: String,
        result: Result<Option<GameDetails>, CatalogError>,
    },
    Featured {
        ticket: Ticket,
        result: Result<Vec<GameSummary>, CatalogError>,
    },
}

/// Runs catalog calls on the runtime and hands back only current replies
///
/// Each request kind has its own sequencer, so a newer search supersedes an
/// older one without affecting an outstanding detail lookup.
pub struct Requests {
    client: CatalogClient,
    runtime: Handle,
    tx: Sender<CatalogReply>,
    rx: Receiver<CatalogReply>,
    search: RequestSequencer,
    details: RequestSequencer,
    featured: RequestSequencer,
}

impl Requests {
    pub fn new(client: CatalogClient, runtime: Handle) -> Self {
        let (tx, rx) = channel();
        Self {
            client,
            runtime,
            tx,
            rx,
            search: RequestSequencer::new(),
            details: RequestSequencer::new(),
            featured: RequestSequencer::new(),
        }
    }

    pub fn search(&mut self, query: String) {
        let ticket = self.search.issue();
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = client.search(&query).await;
            let _ = tx.send(CatalogReply::Search {
                ticket,
                query,
                result,
            });
        });
    }

    pub fn details(&mut self, id: String) {
        let ticket = self.details.issue();
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = client.fetch_details(&id).await;
            let _ = tx.send(CatalogReply::Details { ticket, id, result });
        });
    }

    pub fn featured(&mut self) {
        let ticket = self.featured.issue();
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = client.fetch_featured().await;
            let _ = tx.send(CatalogReply::Featured { ticket, result });
        });
    }

    /// Drop outstanding searches
    pub fn cancel_search(&mut self) {
        self.search.invalidate();
    }

    /// Drop outstanding detail lookups
    pub fn cancel_details(&mut self) {
        self.details.invalidate();
    }

    pub fn search_pending(&self) -> bool {
        self.search.is_pending()
    }

    /// Next reply that is still current, skipping stale ones
    pub fn try_recv(&mut self) -> Option<CatalogReply> {
        while let Ok(reply) = self.rx.try_recv() {
            let accepted = match &reply {
                CatalogReply::Search { ticket, .. } => self.search.accept(*ticket),
                CatalogReply::Details { ticket, .. } => self.details.accept(*ticket),
                CatalogReply::Featured { ticket, .. } => self.featured.accept(*ticket),
            };
            if accepted {
                return Some(reply);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questlog_catalog::CatalogConfig;
    use tokio::runtime::Runtime;

    fn offline_requests(runtime: &Runtime) -> Requests {
        let client = CatalogClient::new(CatalogConfig::default()).unwrap();
        Requests::new(client, runtime.handle().clone())
    }

    fn search_reply(ticket: Ticket, query: &str) -> CatalogReply {
        CatalogReply::Search {
            ticket,
            query: query.to_string(),
            result: Ok(Vec::new()),
        }
    }

    #[test]
    fn test_older_search_reply_is_skipped() {
        let runtime = Runtime::new().unwrap();
        let mut requests = offline_requests(&runtime);
        let older = requests.search.issue();
        let newer = requests.search.issue();
        assert!(requests.search_pending());

        // Newer answer lands first
        requests.tx.send(search_reply(newer, "zelda")).unwrap();
        requests.tx.send(search_reply(older, "zel")).unwrap();

        match requests.try_recv() {
            Some(CatalogReply::Search { ticket, query, .. }) => {
                assert_eq!(ticket, newer);
                assert_eq!(query, "zelda");
            }
            other => panic!("unexpected reply: {other:?}"),
        }
        assert!(requests.try_recv().is_none());
        assert!(!requests.search_pending());
    }

    #[test]
    fn test_stale_search_does_not_hide_other_replies() {
        let runtime = Runtime::new().unwrap();
        let mut requests = offline_requests(&runtime);
        let older = requests.search.issue();
        let newer = requests.search.issue();
        let featured = requests.featured.issue();

        requests.tx.send(search_reply(newer, "zelda")).unwrap();
        requests.tx.send(search_reply(older, "zel")).unwrap();
        requests
            .tx
            .send(CatalogReply::Featured {
                ticket: featured,
                result: Ok(Vec::new()),
            })
            .unwrap();

        assert!(matches!(requests.try_recv(), Some(CatalogReply::Search { .. })));
        assert!(matches!(requests.try_recv(), Some(CatalogReply::Featured { .. })));
        assert!(requests.try_recv().is_none());
    }

    #[test]
    fn test_cancelled_search_reply_is_skipped() {
        let runtime = Runtime::new().unwrap();
        let mut requests = offline_requests(&runtime);
        let ticket = requests.search.issue();
        requests.cancel_search();

        requests.tx.send(search_reply(ticket, "zelda")).unwrap();

        assert!(requests.try_recv().is_none());
        assert!(!requests.search_pending());
    }
}
