//! Orchestration root.
//!
//! A [`Session`] owns one debouncer, one search sequencer, one result store and
//! one content coordinator, plus the receiving half of the core event channel.
//! The renderer reads state through the accessors and mutates it only through
//! `submit_query`, `commit_query`, the selection methods and `reload_content`.
//!
//! All asynchronous completions come back through [`Session::next_event`] and
//! must be passed to [`Session::handle_event`] on the same task, which keeps
//! the session single-writer:
//!
//! ```no_run
//! # async fn run(mut session: searchcode_core::Session) {
//! while let Some(event) = session.next_event().await {
//!     if let Some(failure) = session.handle_event(event) {
//!         eprintln!("{failure}");
//!     }
//! }
//! # }
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::api::SearchApi;
use crate::content::{ContentCoordinator, ContentVerdict};
use crate::debounce::{Debouncer, DEFAULT_QUIET_PERIOD};
use crate::epoch::Epoch;
use crate::error::TransportError;
use crate::event::{self, CoreEvent, EventReceiver, EventSender};
use crate::selection::{ResultStore, SelectionChange};
use crate::sequencer::{RequestSequencer, SearchIssue, SearchParams, SearchVerdict};
use crate::transport::Transport;
use crate::types::{RepoInfo, ResultItem};

/// Tunables for a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Debounce quiet period for typed queries.
    pub debounce: Duration,
    /// Parameters sent with every search.
    pub search: SearchParams,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_QUIET_PERIOD,
            search: SearchParams { limit: Some(200), repos: Vec::new(), file_types: Vec::new() },
        }
    }
}

/// Which logical request stream a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Search,
    Content,
    Health,
    Repos,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stream::Search => "search",
            Stream::Content => "content",
            Stream::Health => "health",
            Stream::Repos => "repos",
        })
    }
}

/// A transport failure surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub stream: Stream,
    pub error: TransportError,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stream, self.error)
    }
}

/// Result of the last health probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ServiceHealth {
    /// No probe has completed yet.
    #[default]
    Unknown,
    /// The service answered with this status string.
    Up(String),
    /// The probe failed.
    Down,
}

pub struct Session {
    api: SearchApi,
    debouncer: Debouncer,
    sequencer: RequestSequencer,
    store: ResultStore,
    content: ContentCoordinator,
    /// Query of the most recently issued search (trimmed), or empty after a clear.
    active_query: String,
    health: ServiceHealth,
    repos: Option<Vec<RepoInfo>>,
    last_failure: Option<Failure>,
    tx: EventSender,
    rx: EventReceiver,
}

impl Session {
    /// Creates a session that talks to the service through `transport`.
    pub fn new(transport: Arc<dyn Transport>, config: SessionConfig) -> Self {
        let (tx, rx) = event::channel();
        let api = SearchApi::new(transport);
        Self {
            debouncer: Debouncer::new(config.debounce, tx.clone()),
            sequencer: RequestSequencer::new(api.clone(), config.search, tx.clone()),
            store: ResultStore::new(),
            content: ContentCoordinator::new(api.clone(), tx.clone()),
            api,
            active_query: String::new(),
            health: ServiceHealth::Unknown,
            repos: None,
            last_failure: None,
            tx,
            rx,
        }
    }

    // -----------------------------------------------------------------------
    // Mutating entry points
    // -----------------------------------------------------------------------

    /// Records typed query text; the search runs once typing pauses.
    pub fn submit_query(&mut self, text: impl Into<String>) {
        self.debouncer.on_input(text);
    }

    /// Runs the pending (or last) query immediately, skipping the quiet period.
    pub fn commit_query(&mut self) {
        if let Some(text) = self.debouncer.on_commit() {
            self.run_search(&text);
        }
    }

    /// Selects `item` if it belongs to the current result set.
    ///
    /// Returns `true` when the selection changed.
    pub fn select_item(&mut self, item: &ResultItem) -> bool {
        let change = self.store.select(item);
        self.apply_selection(change)
    }

    pub fn select_index(&mut self, index: usize) -> bool {
        let change = self.store.select_index(index);
        self.apply_selection(change)
    }

    pub fn select_next(&mut self) -> bool {
        let change = self.store.select_next();
        self.apply_selection(change)
    }

    pub fn select_previous(&mut self) -> bool {
        let change = self.store.select_previous();
        self.apply_selection(change)
    }

    pub fn select_first(&mut self) -> bool {
        let change = self.store.select_first();
        self.apply_selection(change)
    }

    pub fn select_last(&mut self) -> bool {
        let change = self.store.select_last();
        self.apply_selection(change)
    }

    /// Fetches the selected file's content again. No-op without a selection.
    pub fn reload_content(&mut self) -> bool {
        self.content.reload().is_some()
    }

    /// Starts a health probe; the outcome arrives as [`CoreEvent::HealthChecked`].
    pub fn probe_health(&self) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(CoreEvent::HealthChecked(api.health().await));
        });
    }

    /// Starts a repository listing; the outcome arrives as [`CoreEvent::ReposListed`].
    pub fn list_repos(&self) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(CoreEvent::ReposListed(api.repos().await));
        });
    }

    // -----------------------------------------------------------------------
    // Event plumbing
    // -----------------------------------------------------------------------

    /// Waits for the next background completion.
    ///
    /// Never returns `None` while the session is alive, since the session keeps
    /// its own sender.
    pub async fn next_event(&mut self) -> Option<CoreEvent> {
        self.rx.recv().await
    }

    /// Applies one completion to session state.
    ///
    /// Returns the failure, if the completion was a current one that failed.
    /// Stale completions are dropped without any effect.
    pub fn handle_event(&mut self, event: CoreEvent) -> Option<Failure> {
        match event {
            CoreEvent::QuerySettled { generation } => {
                if let Some(text) = self.debouncer.accept(generation) {
                    self.run_search(&text);
                }
                None
            }
            CoreEvent::SearchCompleted { epoch, query, result } => {
                match self.sequencer.complete(epoch, result) {
                    SearchVerdict::Stale => None,
                    SearchVerdict::Applied(items) => {
                        tracing::info!(%epoch, %query, hits = items.len(), "search applied");
                        let change = self.store.replace_results(items);
                        self.content.on_selection_changed(&change);
                        self.clear_failure(Stream::Search);
                        None
                    }
                    SearchVerdict::Failed(error) => self.fail(Stream::Search, error),
                }
            }
            CoreEvent::ContentLoaded { epoch, key, result } => {
                match self.content.complete(epoch, result) {
                    ContentVerdict::Stale => None,
                    ContentVerdict::Applied => {
                        tracing::debug!(%epoch, %key, "content applied");
                        self.clear_failure(Stream::Content);
                        None
                    }
                    ContentVerdict::Failed(error) => self.fail(Stream::Content, error),
                }
            }
            CoreEvent::HealthChecked(result) => match result {
                Ok(health) => {
                    tracing::info!(status = %health.status, "service health");
                    self.health = ServiceHealth::Up(health.status);
                    self.clear_failure(Stream::Health);
                    None
                }
                Err(error) => {
                    self.health = ServiceHealth::Down;
                    self.fail(Stream::Health, error)
                }
            },
            CoreEvent::ReposListed(result) => match result {
                Ok(repos) => {
                    tracing::info!(count = repos.len(), "repositories listed");
                    self.repos = Some(repos);
                    self.clear_failure(Stream::Repos);
                    None
                }
                Err(error) => self.fail(Stream::Repos, error),
            },
        }
    }

    fn run_search(&mut self, text: &str) {
        match self.sequencer.search(text) {
            SearchIssue::Issued(_) => {
                self.active_query = text.trim().to_owned();
            }
            SearchIssue::Cleared => {
                self.active_query.clear();
                let change = self.store.clear();
                self.content.on_selection_changed(&change);
            }
        }
    }

    fn apply_selection(&mut self, change: Option<SelectionChange>) -> bool {
        match change {
            Some(change) => {
                self.content.on_selection_changed(&change);
                true
            }
            None => false,
        }
    }

    fn fail(&mut self, stream: Stream, error: TransportError) -> Option<Failure> {
        tracing::warn!(%stream, %error, "request failed");
        let failure = Failure { stream, error };
        self.last_failure = Some(failure.clone());
        Some(failure)
    }

    fn clear_failure(&mut self, stream: Stream) {
        if self.last_failure.as_ref().is_some_and(|f| f.stream == stream) {
            self.last_failure = None;
        }
    }

    // -----------------------------------------------------------------------
    // Read accessors for rendering
    // -----------------------------------------------------------------------

    pub fn results(&self) -> &[ResultItem] {
        self.store.results()
    }

    pub fn selection(&self) -> Option<&ResultItem> {
        self.store.selection()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.store.selected_index()
    }

    pub fn content(&self) -> &str {
        self.content.content()
    }

    pub fn search_loading(&self) -> bool {
        self.sequencer.is_loading()
    }

    pub fn content_loading(&self) -> bool {
        self.content.is_loading()
    }

    /// Changes every time the content buffer is invalidated or refilled.
    ///
    /// Renderers can cache derived data (e.g. highlighted lines) keyed on this.
    pub fn content_revision(&self) -> (Epoch, bool) {
        (self.content.current_epoch(), self.content.is_loading())
    }

    /// Query of the search currently shown or in flight.
    pub fn active_query(&self) -> &str {
        &self.active_query
    }

    /// `true` while typed text is waiting for the debounce quiet period.
    pub fn query_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn health(&self) -> &ServiceHealth {
        &self.health
    }

    pub fn repos(&self) -> Option<&[RepoInfo]> {
        self.repos.as_deref()
    }

    pub fn last_failure(&self) -> Option<&Failure> {
        self.last_failure.as_ref()
    }
}
