//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};

use crate::view::ChipClass;

/// Grid color palette.
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Reset;
    pub const HEADER_BG: Color = Color::Blue;
    pub const CURSOR_BG: Color = Color::DarkGray;

    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const HEADER_FG: Color = Color::White;

    pub const SELECTED_MARK: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const EDIT_FG: Color = Color::Black;
    pub const EDIT_BG: Color = Color::Yellow;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    pub fn default() -> Style {
        Style::default().fg(Theme::FG).bg(Theme::BG)
    }

    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    pub fn header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn table_header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Row under the cursor.
    pub fn cursor() -> Style {
        Style::default()
            .bg(Theme::CURSOR_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Selection checkbox mark.
    pub fn selected_mark() -> Style {
        Style::default().fg(Theme::SELECTED_MARK)
    }

    /// Cell currently open for editing.
    pub fn editing() -> Style {
        Style::default().fg(Theme::EDIT_FG).bg(Theme::EDIT_BG)
    }

    pub fn warning() -> Style {
        Style::default().fg(Theme::WARNING)
    }

    /// Maps a chip display hint to a terminal style.
    pub fn from_chip(class: ChipClass) -> Style {
        let fg = match class {
            ChipClass::Blue => Color::Blue,
            ChipClass::Red => Color::Red,
            ChipClass::Green => Color::Green,
            ChipClass::Yellow => Color::Yellow,
            ChipClass::Purple => Color::Magenta,
            ChipClass::Teal => Color::Cyan,
            ChipClass::Violet => Color::LightMagenta,
            ChipClass::Rose => Color::LightRed,
            ChipClass::Gray => Color::Gray,
        };
        Style::default().fg(fg)
    }
}
