//! Help overlay renderer.
//!
//! Draws a centred modal over the panels. `Clear` erases the background first,
//! inside the same `terminal.draw()` closure as everything else.

use ratatui::{
    Frame,
    layout::Constraint,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay, scrolled by `help_scroll` rows.
///
/// Skipped on terminals narrower than 60 columns.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help  (j/k scroll, ? or Esc to dismiss) ")
        .border_style(ratatui::style::Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Search box (INSERT)"),
        Line::from("  typing        Search once typing pauses"),
        Line::from("  Enter         Search now and switch to NORMAL"),
        Line::from("  Up / Down     Previous / next result"),
        Line::from("  Ctrl-n / p    Next / previous result"),
        Line::from("  Ctrl-w / u    Delete word / clear query"),
        Line::from("  Esc           Switch to NORMAL"),
        Line::from(""),
        Line::from("Navigation (NORMAL)"),
        Line::from("  j / k         Next / previous result, or scroll content"),
        Line::from("  g / G         First / last result, or top / bottom of file"),
        Line::from("  Ctrl-d / u    Half page down / up"),
        Line::from("  Ctrl-f / b    Full page down / up"),
        Line::from("  Tab, h / l    Focus results / content"),
        Line::from("  Enter         Open selected result in the content panel"),
        Line::from("  / or i        Edit the query"),
        Line::from(""),
        Line::from("Actions"),
        Line::from("  r             Reload the selected file"),
        Line::from("  R             Re-check server health and repositories"),
        Line::from("  < / >         Shrink / grow the results panel"),
        Line::from(""),
        Line::from("General"),
        Line::from("  ?             Open / close this help overlay"),
        Line::from("  q / Esc       Quit (from NORMAL)"),
        Line::from("  Ctrl-c        Quit from anywhere"),
        Line::from("  mouse         Click a result to select it, wheel to scroll"),
    ])
}
