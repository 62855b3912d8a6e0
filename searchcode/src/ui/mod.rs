//! UI rendering module for searchcode.
//!
//! `render()` is the single entry point, called from the event loop's
//! `terminal.draw()` closure. Layout arithmetic and the status bar live in
//! `layout.rs`; each panel has its own module.

mod layout;
pub mod content_view;
pub mod help;
pub mod keybindings;
pub mod result_list;
pub mod search_bar;

use ratatui::{Frame, style::Style, widgets::Block};

use searchcode_core::Session;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_bar};

/// Renders one complete frame.
///
/// Viewport heights and panel rects are written back into `state` so that the
/// next keypress or click can use them.
pub fn render(frame: &mut Frame, state: &mut AppState, session: &Session, theme: &Theme) {
    let [search, results, content, status_bar] = compute_layout(frame, state);

    state.results_viewport_height = inner_rect(results).height;
    state.content_viewport_height = inner_rect(content).height;
    state.panel_rects = [search, results, content];

    frame.render_widget(Block::new().style(Style::new().bg(theme.background)), frame.area());
    search_bar::render_search_bar(frame, search, state, theme);
    result_list::render_result_list(frame, results, state, session, theme);
    content_view::render_content(frame, content, state, session, theme);
    render_status_bar(frame, status_bar, state, session, theme);

    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use serde_json::Value;

    use searchcode_core::{Request, SessionConfig, Transport, TransportResult};

    use super::*;

    struct Offline;

    #[async_trait]
    impl Transport for Offline {
        async fn request(&self, _request: Request) -> TransportResult<Value> {
            std::future::pending::<TransportResult<Value>>().await
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[tokio::test]
    async fn first_frame_shows_empty_state() {
        let session = Session::new(Arc::new(Offline), SessionConfig::default());
        let mut state = AppState::default();
        let theme = Theme::dark();
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();

        terminal.draw(|frame| render(frame, &mut state, &session, &theme)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Type to search"));
        assert!(text.contains("Type a query to search"));
        assert!(text.contains("Select a result"));
        assert!(text.contains("INSERT"));
        assert!(state.results_viewport_height > 0);
    }

    #[tokio::test]
    async fn theme_background_fills_empty_panels() {
        let session = Session::new(Arc::new(Offline), SessionConfig::default());
        let mut state = AppState::default();
        let theme = Theme::catppuccin_mocha();
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();

        terminal.draw(|frame| render(frame, &mut state, &session, &theme)).unwrap();

        let cell = &terminal.backend().buffer()[(90, 12)];
        assert_eq!(cell.bg, theme.background);
    }

    #[tokio::test]
    async fn help_overlay_is_drawn_on_top() {
        let session = Session::new(Arc::new(Offline), SessionConfig::default());
        let mut state = AppState::with_mode(Mode::HelpOverlay);
        let theme = Theme::dark();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        terminal.draw(|frame| render(frame, &mut state, &session, &theme)).unwrap();

        assert!(screen_text(&terminal).contains("Reload the selected file"));
    }
}
