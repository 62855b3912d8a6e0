//! Result list panel renderer.
//!
//! One row per hit: score, file name, then `repo:directory` dimmed. The list's
//! selection mirrors the session's selection (see `AppState::sync`), so the
//! highlight always marks the file whose content is shown on the right.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
};

use searchcode_core::{ResultItem, Session};

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::panel_block;

pub fn render_result_list(
    frame: &mut Frame,
    area: Rect,
    state: &mut AppState,
    session: &Session,
    theme: &Theme,
) {
    let is_focused = state.focus == PanelFocus::Results;
    let results = session.results();
    let title = if results.is_empty() {
        " Results ".to_owned()
    } else {
        format!(" Results ({}) ", results.len())
    };
    let block = panel_block(title, is_focused, theme);

    let items: Vec<ListItem> = if results.is_empty() {
        let msg = if session.search_loading() {
            "Searching…"
        } else if session.active_query().is_empty() {
            "Type a query to search"
        } else {
            "No matches"
        };
        vec![ListItem::new(Line::styled(msg, Style::default().fg(theme.muted)))]
    } else {
        results.iter().map(|item| result_item(item, theme)).collect()
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(theme.selection_fg)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut state.result_list_state);
}

fn result_item(item: &ResultItem, theme: &Theme) -> ListItem<'static> {
    let score = Span::styled(format!("{:>5.2} ", item.score), Style::default().fg(theme.result_score));
    let name = Span::styled(item.file_name.clone(), Style::default().fg(theme.result_name));
    let location = Span::styled(
        format!("  {}:{}", item.repo_name, item.directory()),
        Style::default().fg(theme.result_path),
    );
    ListItem::new(Line::from(vec![score, name, location]))
}
