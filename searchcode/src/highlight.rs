//! Syntax highlighting for the content panel.
//!
//! Turns raw file text into owned ratatui `Line`s using syntect's bundled
//! grammars. Highlighting runs on the main task once per content change (the
//! result is cached in `AppState`), never per frame.

use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEMES: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Files longer than this are shown as plain text.
pub const MAX_HIGHLIGHT_LINES: usize = 5000;

const SYNTECT_THEME: &str = "base16-ocean.dark";

/// Forces the lazy syntax and theme sets to load.
///
/// Loading takes tens of milliseconds; doing it before the first frame keeps the
/// first selection from stalling the UI.
pub fn warm_up() {
    let _ = &*SYNTAXES;
    let _ = &*THEMES;
}

/// Maps a file extension to the token syntect knows the grammar by.
///
/// Extensions syntect has no grammar for but a close relative does are
/// redirected (TypeScript to JavaScript, SCSS to CSS). Unknown extensions are
/// returned lowercased and resolved by syntect itself.
pub fn syntax_token(ext: &str) -> String {
    let ext = ext.trim_start_matches('.').to_ascii_lowercase();
    let token = match ext.as_str() {
        "ts" | "tsx" | "jsx" | "mjs" | "cjs" => "js",
        "bash" | "zsh" => "sh",
        "yml" => "yaml",
        "h" => "c",
        "hpp" | "hh" | "cc" | "cxx" => "cpp",
        "class" => "java",
        "scss" | "sass" | "less" => "css",
        "htm" => "html",
        "markdown" => "md",
        _ => return ext,
    };
    token.to_owned()
}

fn find_syntax(ext: &str) -> &'static SyntaxReference {
    let token = syntax_token(ext);
    SYNTAXES
        .find_syntax_by_token(&token)
        .unwrap_or_else(|| SYNTAXES.find_syntax_plain_text())
}

/// Highlights `content` as a file with extension `ext`.
///
/// Always returns exactly one `Line` per source line (an empty file yields no
/// lines). Falls back to unstyled text when the file is too long or no theme is
/// available.
pub fn highlight(content: &str, ext: &str) -> Vec<Line<'static>> {
    let theme = THEMES.themes.get(SYNTECT_THEME).or_else(|| THEMES.themes.values().next());
    let Some(theme) = theme else {
        return plain(content);
    };
    if content.lines().count() > MAX_HIGHLIGHT_LINES {
        return plain(content);
    }

    let mut h = HighlightLines::new(find_syntax(ext), theme);
    LinesWithEndings::from(content)
        .map(|line| match h.highlight_line(line, &SYNTAXES) {
            Ok(ranges) => Line::from(
                ranges
                    .into_iter()
                    .map(|(style, text)| syntect_to_span(style, text))
                    .collect::<Vec<_>>(),
            ),
            Err(_) => Line::raw(strip_eol(line).to_owned()),
        })
        .collect()
}

/// Unstyled lines, one per source line.
pub fn plain(content: &str) -> Vec<Line<'static>> {
    content.lines().map(|l| Line::raw(l.to_owned())).collect()
}

fn strip_eol(text: &str) -> &str {
    text.trim_end_matches(['\n', '\r'])
}

/// Converts a syntect `(Style, &str)` pair into an owned ratatui `Span`.
///
/// Background colours are dropped so the panel background shows through.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    let fg = style.foreground;
    let mut out = Style::default();
    if fg.a > 0 {
        out = out.fg(Color::Rgb(fg.r, fg.g, fg.b));
    }
    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(strip_eol(content).to_owned(), out)
}
