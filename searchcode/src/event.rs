//! Terminal event bus for searchcode.
//!
//! User input and timer ticks are normalised into a single `AppEvent` enum and
//! sent over a tokio unbounded MPSC channel. Search-service completions travel
//! on the session's own channel (`searchcode_core::CoreEvent`); the main loop
//! selects over both.
//!
//! Two independent intervals drive the render and logic cycles:
//! - **Render interval** (33 ms, about 30 FPS) triggers a `terminal.draw()` call.
//! - **Tick interval** (100 ms) advances the loading spinners.

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// All events the terminal side can receive.
#[derive(Debug)]
pub enum AppEvent {
    /// A key press from the terminal (`KeyEventKind::Press` only).
    ///
    /// Release and repeat events are filtered in [`spawn_event_task`] to avoid
    /// double-firing on Windows, which synthesises both press and release for
    /// every keystroke.
    Key(KeyEvent),
    /// A mouse event from the terminal (click, scroll, move).
    Mouse(MouseEvent),
    /// Terminal was resized. The next frame reads the new size.
    Resize,
    /// Spinner tick.
    Tick,
    /// Render tick.
    Render,
}

/// Holds the sender and receiver ends of the terminal event channel.
pub struct EventHandler {
    /// Send half, cloned into the input task.
    pub tx: mpsc::UnboundedSender<AppEvent>,
    /// Receive half, owned by the main loop.
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the background task that feeds the terminal event channel.
///
/// The task exits once the receiver is dropped. `reader.next().fuse()` keeps
/// `select!` from polling a finished crossterm stream.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut tick_interval = interval(Duration::from_millis(100));
        let mut render_interval = interval(Duration::from_millis(33));
        let mut reader = EventStream::new();

        loop {
            let tick_tick = tick_interval.tick();
            let render_tick = render_interval.tick();
            let crossterm_event = reader.next().fuse();

            let sent = tokio::select! {
                _ = tick_tick => tx.send(AppEvent::Tick),
                _ = render_tick => tx.send(AppEvent::Render),
                maybe_event = crossterm_event => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        tx.send(AppEvent::Key(key))
                    }
                    Some(Ok(Event::Resize(..))) => tx.send(AppEvent::Resize),
                    Some(Ok(Event::Mouse(mouse))) => tx.send(AppEvent::Mouse(mouse)),
                    Some(Ok(_)) => Ok(()),
                    Some(Err(err)) => {
                        tracing::warn!(%err, "terminal input error");
                        Ok(())
                    }
                    None => break,
                },
            };
            if sent.is_err() {
                break;
            }
        }
    });
}
