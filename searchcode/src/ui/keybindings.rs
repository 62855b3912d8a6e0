//! Keybinding dispatcher for searchcode.
//!
//! Translates crossterm key and mouse events into `AppState` and `Session`
//! mutations and returns a `KeyAction` telling the event loop whether to
//! continue or quit. The dispatcher branches first on `state.mode` so that
//! Insert, Normal and HelpOverlay have isolated handlers.
//!
//! Query edits go to `Session::submit_query` (debounced); Enter goes to
//! `Session::commit_query`. Result navigation always goes through the session
//! so a content fetch follows every selection change.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use searchcode_core::Session;

use crate::app::{AppState, Mode, PanelFocus};
use crate::ui::layout::inner_rect;

/// Control-flow signal returned from the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
}

const WHEEL_LINES: usize = 3;

/// Dispatches a key event to the handler matching the current mode.
pub fn handle_key(key: KeyEvent, state: &mut AppState, session: &mut Session) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::Normal => handle_normal(key, state, session),
        Mode::Insert => handle_insert(key, state, session),
    }
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

/// Handles a key event while the query is being edited.
///
/// Any edit that changes the text restarts the debounce timer with the full
/// new query.
fn handle_insert(key: KeyEvent, state: &mut AppState, session: &mut Session) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    let changed = match key.code {
        KeyCode::Char('w') if ctrl => state.delete_word_before_cursor(),
        KeyCode::Char('u') if ctrl => state.clear_query(),
        KeyCode::Char('n') if ctrl => {
            session.select_next();
            false
        }
        KeyCode::Char('p') if ctrl => {
            session.select_previous();
            false
        }
        KeyCode::Char('a') if ctrl => {
            state.cursor_home();
            false
        }
        KeyCode::Char('e') if ctrl => {
            state.cursor_end();
            false
        }
        KeyCode::Char(_) if ctrl => false,
        KeyCode::Char(c) => state.insert_char(c),
        KeyCode::Backspace => state.delete_before_cursor(),
        KeyCode::Delete => state.delete_at_cursor(),
        KeyCode::Left => {
            state.cursor_left();
            false
        }
        KeyCode::Right => {
            state.cursor_right();
            false
        }
        KeyCode::Home => {
            state.cursor_home();
            false
        }
        KeyCode::End => {
            state.cursor_end();
            false
        }
        KeyCode::Down => {
            session.select_next();
            false
        }
        KeyCode::Up => {
            session.select_previous();
            false
        }
        KeyCode::Enter => {
            session.commit_query();
            state.mode = Mode::Normal;
            state.focus = PanelFocus::Results;
            false
        }
        KeyCode::Esc => {
            state.mode = Mode::Normal;
            false
        }
        _ => false,
    };

    if changed {
        session.submit_query(state.query.clone());
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState, session: &mut Session) -> KeyAction {
    if let Some(action) = handle_navigation_key(key, state, session) {
        return action;
    }

    match key.code {
        KeyCode::Tab | KeyCode::BackTab => {
            state.focus = state.focus.toggle();
        }
        KeyCode::Char('h') | KeyCode::Left => state.focus = PanelFocus::Results,
        KeyCode::Char('l') | KeyCode::Right => state.focus = PanelFocus::Content,
        KeyCode::Enter if state.focus == PanelFocus::Results => {
            state.focus = PanelFocus::Content;
        }

        KeyCode::Char('/') | KeyCode::Char('i') => {
            state.cursor_end();
            state.mode = Mode::Insert;
        }

        KeyCode::Char('r') => {
            session.reload_content();
        }
        KeyCode::Char('R') => {
            session.probe_health();
            session.list_repos();
        }

        KeyCode::Char('<') => state.shrink_results_panel(),
        KeyCode::Char('>') => state.grow_results_panel(),

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
        }

        KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,

        _ => {}
    }
    KeyAction::Continue
}

/// Handles movement keys: j / k / g / G and the Ctrl page combos.
///
/// With the results panel focused they move the selection; with the content
/// panel focused they scroll the file. Returns `None` for other keys.
fn handle_navigation_key(
    key: KeyEvent,
    state: &mut AppState,
    session: &mut Session,
) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let half = state.half_page() as isize;
    let full = state.full_page() as isize;

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => move_by(state, session, 1),
        KeyCode::Char('k') | KeyCode::Up => move_by(state, session, -1),
        KeyCode::Char('d') if ctrl => move_by(state, session, half),
        KeyCode::Char('u') if ctrl => move_by(state, session, -half),
        KeyCode::Char('f') if ctrl => move_by(state, session, full),
        KeyCode::Char('b') if ctrl => move_by(state, session, -full),
        KeyCode::PageDown => move_by(state, session, full),
        KeyCode::PageUp => move_by(state, session, -full),
        KeyCode::Char('g') | KeyCode::Home => match state.focus {
            PanelFocus::Results => {
                session.select_first();
            }
            PanelFocus::Content => state.content_top(),
        },
        KeyCode::Char('G') | KeyCode::End => match state.focus {
            PanelFocus::Results => {
                session.select_last();
            }
            PanelFocus::Content => state.content_bottom(),
        },
        _ => return None,
    }
    Some(KeyAction::Continue)
}

/// Moves the focused panel by `delta` rows (negative is up).
fn move_by(state: &mut AppState, session: &mut Session, delta: isize) {
    match state.focus {
        PanelFocus::Results => {
            let len = session.results().len();
            if len == 0 {
                return;
            }
            let current = session.selected_index().unwrap_or(0);
            let target = current.saturating_add_signed(delta).min(len - 1);
            session.select_index(target);
        }
        PanelFocus::Content => {
            let lines = delta.unsigned_abs();
            if delta >= 0 {
                state.scroll_content_down(lines);
            } else {
                state.scroll_content_up(lines);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
            state.mode = Mode::Normal;
        }
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Handles a mouse event: click-to-select, click-to-focus and scroll-wheel.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState, session: &mut Session) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            handle_mouse_click(mouse.column, mouse.row, state, session);
        }
        MouseEventKind::ScrollUp => handle_wheel(mouse.column, mouse.row, state, session, -1),
        MouseEventKind::ScrollDown => handle_wheel(mouse.column, mouse.row, state, session, 1),
        _ => {}
    }
    KeyAction::Continue
}

/// Clicking the search box starts editing; clicking a result row selects it;
/// clicking the content panel focuses it.
fn handle_mouse_click(col: u16, row: u16, state: &mut AppState, session: &mut Session) {
    if state.mode == Mode::HelpOverlay {
        return;
    }
    let pos = Position { x: col, y: row };
    let [search, results, content] = state.panel_rects;

    if search.contains(pos) {
        state.cursor_end();
        state.mode = Mode::Insert;
    } else if results.contains(pos) {
        state.focus = PanelFocus::Results;
        state.mode = Mode::Normal;
        let list_area = inner_rect(results);
        if list_area.contains(pos) {
            let index = state.result_list_state.offset() + (row - list_area.y) as usize;
            session.select_index(index);
        }
    } else if content.contains(pos) {
        state.focus = PanelFocus::Content;
        state.mode = Mode::Normal;
    }
}

/// Scrolls whichever panel is under the pointer.
fn handle_wheel(col: u16, row: u16, state: &mut AppState, session: &mut Session, direction: isize) {
    if state.mode == Mode::HelpOverlay {
        state.help_scroll = if direction < 0 {
            state.help_scroll.saturating_sub(WHEEL_LINES as u16)
        } else {
            state.help_scroll.saturating_add(WHEEL_LINES as u16)
        };
        return;
    }
    let pos = Position { x: col, y: row };
    let [_, results, content] = state.panel_rects;
    if results.contains(pos) {
        let focus = std::mem::replace(&mut state.focus, PanelFocus::Results);
        move_by(state, session, direction);
        state.focus = focus;
    } else if content.contains(pos) {
        let focus = std::mem::replace(&mut state.focus, PanelFocus::Content);
        move_by(state, session, direction * WHEEL_LINES as isize);
        state.focus = focus;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use ratatui::layout::Rect;
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

    fn session() -> Session {
        Session::new(Arc::new(Offline), SessionConfig::default())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[tokio::test(start_paused = true)]
    async fn typing_edits_query_and_schedules_search() {
        let mut state = AppState::default();
        let mut session = session();

        for c in "Math".chars() {
            handle_key(key(KeyCode::Char(c)), &mut state, &mut session);
        }
        assert_eq!(state.query, "Math");
        assert!(session.query_pending());
        assert!(!session.search_loading(), "nothing sent before the quiet period");
    }

    #[tokio::test(start_paused = true)]
    async fn enter_commits_and_switches_to_normal() {
        let mut state = AppState::default();
        let mut session = session();

        handle_key(key(KeyCode::Char('x')), &mut state, &mut session);
        handle_key(key(KeyCode::Enter), &mut state, &mut session);

        assert_eq!(state.mode, Mode::Normal);
        assert!(session.search_loading());
        assert!(!session.query_pending());
        assert_eq!(session.active_query(), "x");
    }

    #[tokio::test(start_paused = true)]
    async fn cursor_moves_do_not_resubmit() {
        let mut state = AppState::with_query("abc");
        let mut session = session();

        handle_key(key(KeyCode::Left), &mut state, &mut session);
        handle_key(key(KeyCode::Home), &mut state, &mut session);
        assert!(!session.query_pending());

        handle_key(ctrl('u'), &mut state, &mut session);
        assert_eq!(state.query, "");
        assert!(session.query_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn q_quits_only_from_normal_mode() {
        let mut state = AppState::default();
        let mut session = session();

        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut state, &mut session), KeyAction::Continue);
        assert_eq!(state.query, "q");

        handle_key(key(KeyCode::Esc), &mut state, &mut session);
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut state, &mut session), KeyAction::Quit);
    }

    #[tokio::test(start_paused = true)]
    async fn ctrl_c_quits_from_any_mode() {
        let mut session = session();
        for mode in [Mode::Insert, Mode::Normal, Mode::HelpOverlay] {
            let mut state = AppState::with_mode(mode);
            assert_eq!(handle_key(ctrl('c'), &mut state, &mut session), KeyAction::Quit);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn help_overlay_opens_and_closes() {
        let mut state = AppState::with_mode(Mode::Normal);
        let mut session = session();

        handle_key(key(KeyCode::Char('?')), &mut state, &mut session);
        assert_eq!(state.mode, Mode::HelpOverlay);
        handle_key(key(KeyCode::Char('j')), &mut state, &mut session);
        assert_eq!(state.help_scroll, 1);
        handle_key(key(KeyCode::Esc), &mut state, &mut session);
        assert_eq!(state.mode, Mode::Normal);
    }

    #[tokio::test(start_paused = true)]
    async fn focus_and_insert_transitions() {
        let mut state = AppState::with_mode(Mode::Normal);
        let mut session = session();

        handle_key(key(KeyCode::Tab), &mut state, &mut session);
        assert_eq!(state.focus, PanelFocus::Content);
        handle_key(key(KeyCode::Char('h')), &mut state, &mut session);
        assert_eq!(state.focus, PanelFocus::Results);
        handle_key(key(KeyCode::Char('/')), &mut state, &mut session);
        assert_eq!(state.mode, Mode::Insert);
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_on_empty_results_is_harmless() {
        let mut state = AppState::with_mode(Mode::Normal);
        let mut session = session();

        handle_key(key(KeyCode::Char('j')), &mut state, &mut session);
        handle_key(key(KeyCode::Char('G')), &mut state, &mut session);
        handle_key(ctrl('d'), &mut state, &mut session);
        assert_eq!(session.selected_index(), None);
        assert!(!session.content_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn clicking_search_box_enters_insert_mode() {
        let mut state = AppState::with_mode(Mode::Normal);
        state.panel_rects = [
            Rect::new(0, 0, 100, 3),
            Rect::new(0, 2, 40, 17),
            Rect::new(39, 2, 61, 17),
        ];
        let mut session = session();

        let click = |column, row| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(click(60, 10), &mut state, &mut session);
        assert_eq!(state.focus, PanelFocus::Content);
        handle_mouse(click(5, 1), &mut state, &mut session);
        assert_eq!(state.mode, Mode::Insert);
    }
}
