//! Completion events produced by background tasks.
//!
//! Timers and service calls run on spawned tokio tasks that never touch session
//! state. When they finish they send one [`CoreEvent`] over the session's
//! unbounded channel; the owner of the [`Session`](crate::session::Session)
//! feeds each event back through `handle_event`, so every mutation happens on a
//! single task.

use tokio::sync::mpsc;

use crate::epoch::Epoch;
use crate::error::TransportResult;
use crate::types::{HealthResponse, ItemKey, RepoInfo, ResultItem};

/// Everything a background task can report.
#[derive(Debug)]
pub enum CoreEvent {
    /// The debounce quiet period for the given timer generation has elapsed.
    QuerySettled { generation: Epoch },
    /// A search request finished (successfully or not).
    SearchCompleted {
        epoch: Epoch,
        query: String,
        result: TransportResult<Vec<ResultItem>>,
    },
    /// A file-content request finished. `Ok(None)` means the file is absent.
    ContentLoaded {
        epoch: Epoch,
        key: ItemKey,
        result: TransportResult<Option<String>>,
    },
    /// The health probe finished.
    HealthChecked(TransportResult<HealthResponse>),
    /// The repository listing finished.
    ReposListed(TransportResult<Vec<RepoInfo>>),
}

/// Send half handed to every component that spawns work.
pub type EventSender = mpsc::UnboundedSender<CoreEvent>;
/// Receive half owned by the session.
pub type EventReceiver = mpsc::UnboundedReceiver<CoreEvent>;

/// Creates a fresh core event channel.
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
