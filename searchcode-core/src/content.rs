//! Content fetch coordinator.
//!
//! Owns the content buffer of the current selection. It reacts to
//! [`SelectionChange`]s but never mutates the selection itself. Content fetches
//! carry their own epoch, independent of the search epoch: starting a new
//! search does not cancel a content fetch, only a further selection change
//! does.

use crate::api::SearchApi;
use crate::epoch::{Epoch, EpochCounter};
use crate::error::{TransportError, TransportResult};
use crate::event::{CoreEvent, EventSender};
use crate::selection::SelectionChange;
use crate::types::{ItemKey, ResultItem};

/// How a content completion was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentVerdict {
    /// The selection moved on; the completion was ignored.
    Stale,
    /// The buffer now holds the fetched text (possibly empty).
    Applied,
    /// The fetch failed; the buffer was emptied.
    Failed(TransportError),
}

pub struct ContentCoordinator {
    api: SearchApi,
    epoch: EpochCounter,
    /// Identity the buffer belongs to (or is being fetched for).
    key: Option<ItemKey>,
    content: String,
    loading: bool,
    tx: EventSender,
}

impl ContentCoordinator {
    pub fn new(api: SearchApi, tx: EventSender) -> Self {
        Self {
            api,
            epoch: EpochCounter::new(),
            key: None,
            content: String::new(),
            loading: false,
            tx,
        }
    }

    /// Reacts to a selection mutation.
    ///
    /// Returns the epoch of the fetch that was started, if any. A null
    /// selection empties the buffer synchronously and issues nothing. A
    /// selection whose identity matches the current buffer is left alone.
    pub fn on_selection_changed(&mut self, change: &SelectionChange) -> Option<Epoch> {
        self.follow(change.current.as_ref())
    }

    /// Aligns the buffer with `selection`.
    pub fn follow(&mut self, selection: Option<&ResultItem>) -> Option<Epoch> {
        match selection {
            None => {
                self.epoch.advance();
                self.key = None;
                self.content.clear();
                self.loading = false;
                None
            }
            Some(item) if self.key.as_ref().is_some_and(|k| item.has_key(k)) => None,
            Some(item) => Some(self.fetch(item.key())),
        }
    }

    /// Re-fetches the current selection's content on explicit request.
    pub fn reload(&mut self) -> Option<Epoch> {
        let key = self.key.clone()?;
        Some(self.fetch(key))
    }

    fn fetch(&mut self, key: ItemKey) -> Epoch {
        let epoch = self.epoch.advance();
        tracing::debug!(%epoch, %key, "fetching content");
        self.key = Some(key.clone());
        self.content.clear();
        self.loading = true;

        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.file_content(&key).await;
            let _ = tx.send(CoreEvent::ContentLoaded { epoch, key, result });
        });
        epoch
    }

    /// Applies a completion if it belongs to the latest fetch.
    pub fn complete(&mut self, epoch: Epoch, result: TransportResult<Option<String>>) -> ContentVerdict {
        if !self.epoch.is_current(epoch) {
            tracing::debug!(%epoch, current = %self.epoch.current(), "discarding stale content");
            return ContentVerdict::Stale;
        }
        self.loading = false;
        match result {
            Ok(text) => {
                self.content = text.unwrap_or_default();
                ContentVerdict::Applied
            }
            Err(err) => {
                self.content.clear();
                ContentVerdict::Failed(err)
            }
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn key(&self) -> Option<&ItemKey> {
        self.key.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Epoch of the latest fetch or clear; changes whenever the buffer is invalidated.
    pub fn current_epoch(&self) -> Epoch {
        self.epoch.current()
    }
}
