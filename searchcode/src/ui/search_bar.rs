//! Query input box.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

const PLACEHOLDER: &str = "Type to search…  (Esc: navigate, ?: help)";

/// Renders the search box and, in Insert mode, places the terminal cursor.
///
/// Long queries scroll horizontally so the cursor always stays visible.
pub fn render_search_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let editing = state.mode == Mode::Insert;
    let block = panel_block(" Search ", editing, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    if state.query.is_empty() {
        let hint = Span::styled(PLACEHOLDER, Style::default().fg(theme.query_placeholder));
        frame.render_widget(Paragraph::new(Line::from(hint)), inner);
    } else {
        let offset = visible_offset(state.cursor, inner.width);
        let visible: String = state.query.chars().skip(offset).take(inner.width as usize).collect();
        let text = Span::styled(visible, Style::default().fg(theme.query_text));
        frame.render_widget(Paragraph::new(Line::from(text)), inner);
    }

    if editing {
        let offset = visible_offset(state.cursor, inner.width);
        let x = inner.x + (state.cursor - offset) as u16;
        frame.set_cursor_position(Position { x, y: inner.y });
    }
}

/// First visible char index so that `cursor` lands inside a `width`-wide box.
fn visible_offset(cursor: usize, width: u16) -> usize {
    cursor.saturating_sub(width.saturating_sub(1) as usize)
}
