//! Content panel renderer.
//!
//! Renders the selected file from `AppState.content_lines` with manual virtual
//! scrolling: only `lines[content_scroll..content_scroll + viewport_height]`
//! are materialised per frame, so large files cost O(viewport) to draw.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem},
};

use searchcode_core::Session;

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

pub fn render_content(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    session: &Session,
    theme: &Theme,
) {
    let is_focused = state.focus == PanelFocus::Content;
    let title = match session.selection() {
        Some(item) => format!(" {}:{} ", item.repo_name, item.file_path),
        None => " Content ".to_owned(),
    };
    let block = panel_block(title, is_focused, theme);
    let inner = inner_rect(area);
    let viewport_height = inner.height as usize;

    frame.render_widget(block, area);

    if state.content_lines.is_empty() {
        let msg = if session.content_loading() {
            "Loading…"
        } else if session.selection().is_none() {
            "Select a result to view its content"
        } else {
            "(empty)"
        };
        let placeholder = ListItem::new(Line::styled(msg, Style::default().fg(theme.muted)));
        frame.render_widget(List::new(vec![placeholder]), inner);
        return;
    }

    let total = state.content_lines.len();
    let gutter_width = total.to_string().len();
    let visible_start = state.content_scroll.min(total.saturating_sub(1));
    let visible_end = (visible_start + viewport_height).min(total);

    let gutter_style = Style::default().fg(theme.gutter);
    let items: Vec<ListItem> = state.content_lines[visible_start..visible_end]
        .iter()
        .enumerate()
        .map(|(offset, line)| {
            let number = visible_start + offset + 1;
            let mut spans = vec![Span::styled(format!("{number:>gutter_width$} │ "), gutter_style)];
            spans.extend(line.spans.iter().cloned());
            ListItem::new(Line::from(spans))
        })
        .collect();

    frame.render_widget(List::new(items), inner);
}
