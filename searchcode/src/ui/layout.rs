//! Layout engine and shared chrome for searchcode.
//!
//! Pure layout arithmetic plus the panel block and status bar builders. Called
//! inside `terminal.draw()` on every render so each frame reflects the current
//! terminal size.
//!
//! # Panel geometry
//!
//! A 3-row search box sits on top and a 1-row status bar at the bottom. At
//! `>= 80` columns the results list and content view share the middle side by
//! side, split by `AppState.left_pct`. Narrower terminals stack them, results
//! above content.
//!
//! `Spacing::Overlap(1)` combined with `Block::merge_borders(MergeStrategy::Fuzzy)`
//! makes adjacent panel borders share a single cell.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use searchcode_core::{ServiceHealth, Session};

use crate::app::{AppState, Mode};
use crate::theme::Theme;

/// Below this width the two panels are stacked.
pub const SIDE_BY_SIDE_MIN_WIDTH: u16 = 80;

/// Returns `[search, results, content, status_bar]` for the current frame.
pub fn compute_layout(frame: &Frame, state: &AppState) -> [Rect; 4] {
    let area = frame.area();

    let [body, status_bar] =
        area.layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));
    let [search, main_area] = body.layout(
        &Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).spacing(Spacing::Overlap(1)),
    );

    let split = if area.width >= SIDE_BY_SIDE_MIN_WIDTH {
        Layout::horizontal([Constraint::Percentage(state.left_pct), Constraint::Fill(1)])
    } else {
        Layout::vertical([Constraint::Percentage(40), Constraint::Fill(1)])
    };
    let [results, content] = main_area.layout(&split.spacing(Spacing::Overlap(1)));

    [search, results, content, status_bar]
}

/// Returns the inner `Rect` of a panel after removing the 1-cell border.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel.
///
/// Focused panels get a thick border in `border_active`. `MergeStrategy::Fuzzy`
/// is required because `Exact` mis-joins thick and plain borders.
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the 1-row status bar.
///
/// Left to right: mode, search state, content state, service health, indexed
/// repositories, and the most recent failure if one is outstanding.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    session: &Session,
    theme: &Theme,
) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Insert => (" INSERT ", theme.status_mode_insert),
        Mode::Normal | Mode::HelpOverlay => (" NORMAL ", theme.status_mode_normal),
    };
    let busy = Style::default().fg(theme.status_busy);
    let sep = || Span::raw(" │ ");

    let mut spans = vec![Span::styled(
        mode_text,
        Style::default().fg(mode_fg).add_modifier(Modifier::BOLD),
    )];

    spans.push(sep());
    if session.search_loading() {
        spans.push(Span::styled(format!("{} searching", state.spinner()), busy));
    } else if session.query_pending() {
        spans.push(Span::styled("… typing", busy));
    } else if session.active_query().is_empty() {
        spans.push(Span::raw("no query"));
    } else {
        let hits = session.results().len();
        let noun = if hits == 1 { "hit" } else { "hits" };
        spans.push(Span::raw(format!("{hits} {noun} for \"{}\"", session.active_query())));
    }

    if session.content_loading() {
        spans.push(sep());
        spans.push(Span::styled(format!("{} loading file", state.spinner()), busy));
    }

    spans.push(sep());
    spans.push(match session.health() {
        ServiceHealth::Unknown => Span::raw("○ server"),
        ServiceHealth::Up(status) => {
            Span::styled(format!("● server {status}"), Style::default().fg(theme.status_ok))
        }
        ServiceHealth::Down => {
            Span::styled("● server down", Style::default().fg(theme.status_error))
        }
    });

    if let Some(repos) = session.repos() {
        spans.push(sep());
        let noun = if repos.len() == 1 { "repo" } else { "repos" };
        spans.push(Span::raw(format!("{} {noun}", repos.len())));
    }

    if let Some(failure) = session.last_failure() {
        spans.push(sep());
        spans.push(Span::styled(
            format!("✗ {failure}"),
            Style::default().fg(theme.status_error),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
