//! Color theme system for searchcode.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI surface
//! the client renders. Two built-in themes are provided:
//!
//! - `dark` uses ANSI 16 colors so it works on any terminal, including
//!   256-color SSH sessions with no truecolor support.
//! - `catppuccin_mocha` is the Catppuccin Mocha palette in RGB; requires truecolor.

use ratatui::style::Color;

/// All color values used across the client's UI surfaces.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the currently focused panel.
    pub border_active: Color,
    /// Border color for unfocused panels.
    pub border_inactive: Color,

    // Search box
    /// Query text color.
    pub query_text: Color,
    /// Placeholder shown while the query is empty.
    pub query_placeholder: Color,

    // Result list
    /// Foreground of the selected result row.
    pub selection_fg: Color,
    /// Background of the selected result row.
    pub selection_bg: Color,
    /// File name in a result row.
    pub result_name: Color,
    /// Directory and repository parts of a result row.
    pub result_path: Color,
    /// Relevance score column.
    pub result_score: Color,

    // Content view
    /// Line-number gutter.
    pub gutter: Color,
    /// Placeholder and informational text inside panels.
    pub muted: Color,

    // Status bar
    /// Status bar background.
    pub status_bar_bg: Color,
    /// Status bar foreground (general text).
    pub status_bar_fg: Color,
    /// Mode indicator color when in NORMAL mode.
    pub status_mode_normal: Color,
    /// Mode indicator color when in INSERT mode.
    pub status_mode_insert: Color,
    /// Healthy service indicator.
    pub status_ok: Color,
    /// Failure and unreachable-service indicator.
    pub status_error: Color,
    /// In-flight request spinners.
    pub status_busy: Color,

    // General
    /// Application background, painted under every panel.
    pub background: Color,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            query_text: Color::White,
            query_placeholder: Color::DarkGray,

            selection_fg: Color::Black,
            selection_bg: Color::Cyan,
            result_name: Color::White,
            result_path: Color::DarkGray,
            result_score: Color::Yellow,

            gutter: Color::DarkGray,
            muted: Color::DarkGray,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,
            status_ok: Color::Green,
            status_error: Color::Red,
            status_busy: Color::Yellow,

            background: Color::Reset,
        }
    }

    /// Returns the Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161);    // #a6e3a1
        let red = Color::Rgb(243, 139, 168);      // #f38ba8
        let yellow = Color::Rgb(249, 226, 175);   // #f9e2af
        let peach = Color::Rgb(250, 179, 135);    // #fab387
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay0 = Color::Rgb(108, 112, 134); // #6c7086
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90);    // #45475a
        let base = Color::Rgb(30, 30, 46);        // #1e1e2e
        let text = Color::Rgb(205, 214, 244);     // #cdd6f4
        let subtext0 = Color::Rgb(166, 173, 200); // #a6adc8

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            query_text: text,
            query_placeholder: overlay0,

            selection_fg: base,
            selection_bg: lavender,
            result_name: text,
            result_path: subtext0,
            result_score: peach,

            gutter: overlay0,
            muted: overlay1,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_insert: green,
            status_ok: green,
            status_error: red,
            status_busy: yellow,

            background: base,
        }
    }

    /// Resolves a theme name string to the corresponding built-in theme.
    ///
    /// Unknown names fall back to `dark()` so a typo in config never prevents
    /// startup. The fallback is logged, not treated as an error.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }
}
