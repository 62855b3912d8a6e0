//! searchcode: interactive terminal client for a searchcode server.
//!
//! Entry point for the `searchcode` binary. Wires together configuration
//! (`config`), file logging (`logging`), the terminal lifecycle (`tui`), the
//! terminal event bus (`event`), UI state (`app`) and rendering (`ui`) around a
//! `searchcode_core::Session` talking to the service over HTTP.
//!
//! # Startup sequence
//!
//! 1. Parse flags and load config; errors here print to a normal terminal.
//! 2. Start file logging.
//! 3. `install_panic_hook()`, installed first so it is the innermost hook.
//! 4. `register_sigterm()`, an `Arc<AtomicBool>` polled by the event loop.
//! 5. Build the HTTP transport and the session; kick off the health probe,
//!    the repository listing and the initial query, if any.
//! 6. `init_tui()` and `spawn_event_task()`.
//!
//! # Safety
//!
//! `restore_tui()` runs after the event loop exits on every path (quit key,
//! SIGTERM, channel close). Inside the loop `?` is only used on `draw`, whose
//! error breaks out through the same exit point.

mod app;
mod config;
mod event;
mod highlight;
mod logging;
mod theme;
mod tui;
mod ui;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;

use searchcode_core::{HttpTransport, Session};

use crate::ui::keybindings::{handle_key, handle_mouse, KeyAction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::Config::load(config::Cli::parse())?;
    logging::init(&config.log_file)?;
    tracing::info!(server = %config.server_url, "starting searchcode");

    let theme = theme::Theme::from_name(&config.theme);
    highlight::warm_up();

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm().context("registering SIGTERM handler")?;

    let transport = HttpTransport::new(&config.server_url, config.wire_case, config.request_timeout)
        .context("building HTTP client")?;
    let mut session = Session::new(Arc::new(transport), config.session.clone());
    session.probe_health();
    session.list_repos();

    if let Some(query) = &config.initial_query {
        session.submit_query(query.as_str());
        session.commit_query();
    }
    let mut state = app::AppState::startup(config.initial_query.as_deref());

    let mut terminal = tui::init_tui()?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;

    let result = run(&mut terminal, &mut rx, &mut state, &mut session, &theme, &term_flag).await;

    tui::restore_tui()?;
    tracing::info!("exiting");
    result
}

/// The event loop. Returns only on quit or on a draw error.
async fn run(
    terminal: &mut tui::Tui,
    rx: &mut tokio::sync::mpsc::UnboundedReceiver<event::AppEvent>,
    state: &mut app::AppState,
    session: &mut Session,
    theme: &theme::Theme,
    term_flag: &std::sync::atomic::AtomicBool,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            // Heartbeat: SIGTERM is checked at least every 50ms even when the
            // terminal is idle.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {}
            Some(core_event) = session.next_event() => {
                session.handle_event(core_event);
            }
            maybe_event = rx.recv() => {
                let action = match maybe_event {
                    Some(event::AppEvent::Render) => {
                        state.sync(session);
                        terminal.draw(|frame| ui::render(frame, state, session, theme))?;
                        KeyAction::Continue
                    }
                    Some(event::AppEvent::Key(key)) => handle_key(key, state, session),
                    Some(event::AppEvent::Mouse(mouse)) => handle_mouse(mouse, state, session),
                    Some(event::AppEvent::Tick) => {
                        state.tick();
                        KeyAction::Continue
                    }
                    // ratatui picks up the new size from frame.area() on the next Render.
                    Some(event::AppEvent::Resize) => KeyAction::Continue,
                    None => KeyAction::Quit,
                };
                if action == KeyAction::Quit {
                    return Ok(());
                }
            }
        }
        if term_flag.load(Ordering::Relaxed) {
            tracing::info!("SIGTERM received");
            return Ok(());
        }
    }
}
