//! Debounce scheduler for query text.
//!
//! Every [`Debouncer::on_input`] aborts the pending timer task and spawns a new
//! one, so only the latest text can ever be emitted. A timer that had already
//! fired and queued its [`CoreEvent::QuerySettled`] before being aborted is
//! filtered out in [`Debouncer::accept`] by its generation number.

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::epoch::{Epoch, EpochCounter};
use crate::event::{CoreEvent, EventSender};

/// Quiet period used when none is configured.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

pub struct Debouncer {
    quiet: Duration,
    generation: EpochCounter,
    pending: Option<JoinHandle<()>>,
    /// Text recorded by the last `on_input` and not yet emitted.
    latest: Option<String>,
    /// Last emitted text; `on_commit` re-emits it when nothing newer is recorded.
    committed: Option<String>,
    tx: EventSender,
}

impl Debouncer {
    pub fn new(quiet: Duration, tx: EventSender) -> Self {
        Self {
            quiet,
            generation: EpochCounter::new(),
            pending: None,
            latest: None,
            committed: None,
            tx,
        }
    }

    /// Records `text` and restarts the quiet-period timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_input(&mut self, text: impl Into<String>) {
        self.abort_timer();
        self.latest = Some(text.into());
        let generation = self.generation.advance();
        let tx = self.tx.clone();
        let quiet = self.quiet;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            let _ = tx.send(CoreEvent::QuerySettled { generation });
        }));
    }

    /// Emits immediately, bypassing the timer.
    ///
    /// Returns the pending text if there is one, otherwise the last emitted
    /// text again (explicit re-submit). `None` only when nothing was ever typed.
    pub fn on_commit(&mut self) -> Option<String> {
        self.abort_timer();
        self.generation.advance();
        let text = self.latest.take().or_else(|| self.committed.clone())?;
        self.committed = Some(text.clone());
        Some(text)
    }

    /// Resolves a timer firing into the text to emit.
    ///
    /// Returns `None` for firings from superseded or cancelled timers.
    pub fn accept(&mut self, generation: Epoch) -> Option<String> {
        if !self.generation.is_current(generation) {
            tracing::trace!(%generation, "dropping superseded debounce firing");
            return None;
        }
        self.pending = None;
        let text = self.latest.take()?;
        self.committed = Some(text.clone());
        Some(text)
    }

    /// Discards the pending text and its timer. Idempotent.
    pub fn cancel(&mut self) {
        self.abort_timer();
        self.generation.advance();
        self.latest = None;
    }

    /// `true` while recorded text is waiting for its quiet period.
    pub fn is_pending(&self) -> bool {
        self.latest.is_some()
    }

    fn abort_timer(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.abort_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event;

    fn settled(event: CoreEvent) -> Epoch {
        match event {
            CoreEvent::QuerySettled { generation } => generation,
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn only_latest_input_is_emitted() {
        let (tx, mut rx) = event::channel();
        let mut debouncer = Debouncer::new(DEFAULT_QUIET_PERIOD, tx);

        debouncer.on_input("M");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.on_input("Ma");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.on_input("Math");

        let generation = settled(rx.recv().await.unwrap());
        assert_eq!(debouncer.accept(generation).as_deref(), Some("Math"));
        assert!(!debouncer.is_pending());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err(), "superseded timers must not fire");
    }

    #[tokio::test(start_paused = true)]
    async fn timer_waits_for_full_quiet_period() {
        let (tx, mut rx) = event::channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(300), tx);

        debouncer.on_input("a");
        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(rx.try_recv().is_err());
        tokio::time::sleep(Duration::from_millis(2)).await;
        let generation = settled(rx.recv().await.unwrap());
        assert_eq!(debouncer.accept(generation).as_deref(), Some("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn commit_bypasses_timer_and_invalidates_it() {
        let (tx, mut rx) = event::channel();
        let mut debouncer = Debouncer::new(DEFAULT_QUIET_PERIOD, tx);

        debouncer.on_input("foo");
        assert_eq!(debouncer.on_commit().as_deref(), Some("foo"));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn queued_firing_from_old_generation_is_rejected() {
        let (tx, _rx) = event::channel();
        let mut debouncer = Debouncer::new(DEFAULT_QUIET_PERIOD, tx);

        debouncer.on_input("old");
        let stale = debouncer.generation.current();
        debouncer.on_input("new");
        assert_eq!(debouncer.accept(stale), None);
        assert!(debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn commit_without_new_input_resubmits_last_text() {
        let (tx, _rx) = event::channel();
        let mut debouncer = Debouncer::new(DEFAULT_QUIET_PERIOD, tx);

        assert_eq!(debouncer.on_commit(), None);
        debouncer.on_input("Math");
        assert_eq!(debouncer.on_commit().as_deref(), Some("Math"));
        assert_eq!(debouncer.on_commit().as_deref(), Some("Math"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_is_idempotent() {
        let (tx, mut rx) = event::channel();
        let mut debouncer = Debouncer::new(DEFAULT_QUIET_PERIOD, tx);

        debouncer.on_input("x");
        debouncer.cancel();
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }
}
