//! Search request sequencer.
//!
//! Issues one search per emitted query and tags it with a fresh epoch. When a
//! completion arrives, [`RequestSequencer::complete`] decides whether it may
//! touch visible state: only the completion of the most recently issued search
//! is ever applied, regardless of the order in which responses come back.

use crate::api::SearchApi;
use crate::epoch::{Epoch, EpochCounter};
use crate::error::{TransportError, TransportResult};
use crate::event::{CoreEvent, EventSender};
use crate::types::{ResultItem, SearchRequest};

/// Static parameters attached to every search request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub limit: Option<usize>,
    pub repos: Vec<String>,
    pub file_types: Vec<String>,
}

/// What [`RequestSequencer::search`] did with a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchIssue {
    /// A request tagged with this epoch is in flight.
    Issued(Epoch),
    /// The query was empty: nothing was sent and results must be cleared now.
    Cleared,
}

/// How a completion should be applied.
#[derive(Debug, PartialEq)]
pub enum SearchVerdict {
    /// A newer search superseded this one; ignore it entirely.
    Stale,
    /// Replace the result set with these items.
    Applied(Vec<ResultItem>),
    /// Keep the previous result set and surface the failure.
    Failed(TransportError),
}

pub struct RequestSequencer {
    api: SearchApi,
    params: SearchParams,
    epoch: EpochCounter,
    loading: bool,
    tx: EventSender,
}

impl RequestSequencer {
    pub fn new(api: SearchApi, params: SearchParams, tx: EventSender) -> Self {
        Self { api, params, epoch: EpochCounter::new(), loading: false, tx }
    }

    /// Starts a search for `query`.
    ///
    /// The query is trimmed first. An empty query sends nothing, clears the
    /// loading flag and still advances the epoch, so a search that is already in
    /// flight can no longer land on top of the cleared view.
    pub fn search(&mut self, query: &str) -> SearchIssue {
        let query = query.trim();
        let epoch = self.epoch.advance();

        if query.is_empty() {
            tracing::debug!(%epoch, "empty query, clearing results");
            self.loading = false;
            return SearchIssue::Cleared;
        }

        self.loading = true;
        let request = SearchRequest {
            query: query.to_owned(),
            limit: self.params.limit,
            repos: self.params.repos.clone(),
            file_types: self.params.file_types.clone(),
        };
        tracing::debug!(%epoch, query, "issuing search");

        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.search(&request).await;
            let _ = tx.send(CoreEvent::SearchCompleted { epoch, query: request.query, result });
        });

        SearchIssue::Issued(epoch)
    }

    /// Classifies a completion. Clears `loading` only for the current epoch.
    pub fn complete(
        &mut self,
        epoch: Epoch,
        result: TransportResult<Vec<ResultItem>>,
    ) -> SearchVerdict {
        if !self.epoch.is_current(epoch) {
            tracing::debug!(%epoch, current = %self.epoch.current(), "discarding stale search");
            return SearchVerdict::Stale;
        }
        self.loading = false;
        match result {
            Ok(items) => SearchVerdict::Applied(items),
            Err(err) => SearchVerdict::Failed(err),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn current_epoch(&self) -> Epoch {
        self.epoch.current()
    }
}
