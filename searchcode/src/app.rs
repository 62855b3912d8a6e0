//! UI state for searchcode.
//!
//! Owns everything the terminal needs that the search session does not: mode,
//! focus, the query line editor, scroll offsets, cached viewport geometry and
//! the highlighted content cache. Search results, selection and file content
//! belong to `searchcode_core::Session`; [`AppState::sync`] pulls what the
//! renderer needs from it once per frame.

use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::ListState;

use searchcode_core::{Epoch, Session};

use crate::highlight;

/// Editor mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Vim-style navigation over results and content.
    Normal,
    /// Keystrokes edit the query. The client starts here.
    #[default]
    Insert,
    /// Full-screen help overlay is shown above all panels.
    HelpOverlay,
}

/// Which panel currently receives navigation keys.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    #[default]
    Results,
    Content,
}

impl PanelFocus {
    pub fn toggle(self) -> Self {
        match self {
            PanelFocus::Results => PanelFocus::Content,
            PanelFocus::Content => PanelFocus::Results,
        }
    }
}

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub struct AppState {
    pub mode: Mode,
    pub focus: PanelFocus,

    /// Query line as typed.
    pub query: String,
    /// Cursor position in `query`, counted in chars.
    pub cursor: usize,

    /// Mirrors the session's selection; owns the list's scroll offset.
    pub result_list_state: ListState,

    /// First visible line of the content panel.
    pub content_scroll: usize,
    /// Highlighted content of the current selection.
    pub content_lines: Vec<Line<'static>>,
    /// Session content revision `content_lines` was built from.
    content_revision: Option<(Epoch, bool)>,

    /// Inner heights cached after each render for page-wise movement.
    pub results_viewport_height: u16,
    pub content_viewport_height: u16,

    /// Width percentage of the results panel. The content panel takes the rest.
    pub left_pct: u16,

    pub help_scroll: u16,

    /// `[search, results, content]` outer rects from the last frame, for mouse hits.
    pub panel_rects: [Rect; 3],

    spinner_frame: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            focus: PanelFocus::default(),
            query: String::new(),
            cursor: 0,
            result_list_state: ListState::default(),
            content_scroll: 0,
            content_lines: Vec::new(),
            content_revision: None,
            results_viewport_height: 0,
            content_viewport_height: 0,
            left_pct: 40,
            help_scroll: 0,
            panel_rects: [Rect::default(); 3],
            spinner_frame: 0,
        }
    }
}

impl AppState {
    /// Starts with `query` already typed and the cursor at its end.
    pub fn with_query(query: &str) -> Self {
        Self { query: query.to_owned(), cursor: query.chars().count(), ..Self::default() }
    }

    pub fn with_mode(mode: Mode) -> Self {
        Self { mode, ..Self::default() }
    }

    /// State for the first frame. A query given on the command line is
    /// already submitted, so the client opens in Normal mode on its results.
    pub fn startup(initial_query: Option<&str>) -> Self {
        match initial_query {
            Some(query) => Self { mode: Mode::Normal, ..Self::with_query(query) },
            None => Self::with_mode(Mode::Insert),
        }
    }

    // -----------------------------------------------------------------------
    // Session mirror
    // -----------------------------------------------------------------------

    /// Pulls selection and content from `session`.
    ///
    /// Re-highlights only when the session's content revision changed, and
    /// resets the content scroll at the same time.
    pub fn sync(&mut self, session: &Session) {
        self.result_list_state.select(session.selected_index());

        let revision = session.content_revision();
        if self.content_revision == Some(revision) {
            return;
        }
        self.content_revision = Some(revision);
        self.content_scroll = 0;
        self.content_lines = match session.selection() {
            Some(item) if !session.content().is_empty() => {
                highlight::highlight(session.content(), &item.file_ext)
            }
            _ => Vec::new(),
        };
    }

    pub fn tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
    }

    pub fn spinner(&self) -> char {
        SPINNER[self.spinner_frame]
    }

    // -----------------------------------------------------------------------
    // Query editing
    //
    // Each editing method returns `true` when the text changed, so the caller
    // knows to hand it to the debouncer.
    // -----------------------------------------------------------------------

    fn byte_index(&self, char_index: usize) -> usize {
        self.query
            .char_indices()
            .nth(char_index)
            .map_or(self.query.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.query.chars().count()
    }

    pub fn insert_char(&mut self, c: char) -> bool {
        let at = self.byte_index(self.cursor);
        self.query.insert(at, c);
        self.cursor += 1;
        true
    }

    /// Backspace.
    pub fn delete_before_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.query.remove(at);
        true
    }

    /// Delete.
    pub fn delete_at_cursor(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.query.remove(at);
        true
    }

    /// Deletes back to the previous word boundary (Ctrl-w).
    pub fn delete_word_before_cursor(&mut self) -> bool {
        let chars: Vec<char> = self.query.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        if start == self.cursor {
            return false;
        }
        let (from, to) = (self.byte_index(start), self.byte_index(self.cursor));
        self.query.replace_range(from..to, "");
        self.cursor = start;
        true
    }

    /// Clears the whole line (Ctrl-u).
    pub fn clear_query(&mut self) -> bool {
        self.cursor = 0;
        if self.query.is_empty() {
            return false;
        }
        self.query.clear();
        true
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }

    // -----------------------------------------------------------------------
    // Content scrolling
    // -----------------------------------------------------------------------

    fn max_content_scroll(&self) -> usize {
        self.content_lines
            .len()
            .saturating_sub(self.content_viewport_height.max(1) as usize)
    }

    pub fn scroll_content_down(&mut self, lines: usize) {
        self.content_scroll = self.content_scroll.saturating_add(lines).min(self.max_content_scroll());
    }

    pub fn scroll_content_up(&mut self, lines: usize) {
        self.content_scroll = self.content_scroll.saturating_sub(lines);
    }

    pub fn content_top(&mut self) {
        self.content_scroll = 0;
    }

    pub fn content_bottom(&mut self) {
        self.content_scroll = self.max_content_scroll();
    }

    /// Half the height of the focused panel, at least one row.
    pub fn half_page(&self) -> usize {
        let height = match self.focus {
            PanelFocus::Results => self.results_viewport_height,
            PanelFocus::Content => self.content_viewport_height,
        };
        (height / 2).max(1) as usize
    }

    /// Full height of the focused panel, at least one row.
    pub fn full_page(&self) -> usize {
        let height = match self.focus {
            PanelFocus::Results => self.results_viewport_height,
            PanelFocus::Content => self.content_viewport_height,
        };
        height.max(1) as usize
    }

    // -----------------------------------------------------------------------
    // Panel geometry
    // -----------------------------------------------------------------------

    const MIN_LEFT: u16 = 20;
    const MAX_LEFT: u16 = 70;
    const STEP: u16 = 5;

    /// Gives the content panel 5% more width, down to a 20% results panel.
    pub fn shrink_results_panel(&mut self) {
        self.left_pct = self.left_pct.saturating_sub(Self::STEP).max(Self::MIN_LEFT);
    }

    /// Gives the results panel 5% more width, up to 70%.
    pub fn grow_results_panel(&mut self) {
        self.left_pct = (self.left_pct + Self::STEP).min(Self::MAX_LEFT);
    }
}
