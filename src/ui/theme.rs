//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

/// Series colours for multi-entry charts (pie slices, treemap tiles).
pub const PALETTE: &[Color] = &[
    Color::Rgb(99, 110, 250),
    Color::Rgb(239, 85, 59),
    Color::Rgb(0, 204, 150),
    Color::Rgb(171, 99, 250),
    Color::Rgb(255, 161, 90),
    Color::Rgb(25, 211, 243),
    Color::Rgb(255, 102, 146),
    Color::Rgb(182, 232, 128),
    Color::Rgb(255, 151, 255),
    Color::Rgb(254, 203, 82),
];

impl Theme {
    pub fn series_color(i: usize) -> Color {
        PALETTE[i % PALETTE.len()]
    }

    // ── charts ─────────────────────────────────────────────────
    pub fn bar_style() -> Style {
        Style::default().fg(Color::Rgb(99, 110, 250))
    }

    pub fn line_style() -> Style {
        Style::default().fg(Color::Rgb(255, 160, 122))
    }

    pub fn value_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn error_style() -> Style {
        Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD)
    }

    // ── sidebar ────────────────────────────────────────────────
    pub fn field_label_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn field_value_style() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn selected_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn banner_style() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Rgb(245, 245, 220))
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn button_style(enabled: bool) -> Style {
        if enabled {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray).bg(Color::Black)
        }
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}
