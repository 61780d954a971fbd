//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette — semantic roles to Style
// ============================================================================

#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Sidebar --
    pub source_checked: Style,
    pub source_unchecked: Style,
    pub source_cursor: Style,
    pub sidebar_notice: Style,

    // -- Header and tabs --
    pub page_title: Style,
    pub page_updated: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,

    // -- Section --
    pub section_heading: Style,
    pub item_title: Style,
    pub item_selected: Style,
    pub item_date: Style,
    pub item_body: Style,
    pub item_link: Style,
    pub warning: Style,
    pub loading: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            source_checked: Style::default().fg(Color::Green),
            source_unchecked: Style::default().fg(Color::Gray),
            source_cursor: Style::default().bg(Color::DarkGray).fg(Color::White),
            sidebar_notice: Style::default().fg(Color::DarkGray),

            page_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            page_updated: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            tab_active: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),

            section_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            item_title: Style::default().add_modifier(Modifier::BOLD),
            item_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            item_date: Style::default().fg(Color::DarkGray),
            item_body: Style::default(),
            item_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            warning: Style::default().fg(Color::Yellow),
            loading: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
        }
    }

    fn light() -> Self {
        Self {
            source_checked: Style::default().fg(Color::Green),
            source_unchecked: Style::default().fg(Color::DarkGray),
            source_cursor: Style::default().bg(Color::Blue).fg(Color::White),
            sidebar_notice: Style::default().fg(Color::DarkGray),

            page_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            page_updated: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            tab_active: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),

            section_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            item_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            item_selected: Style::default().bg(Color::Blue).fg(Color::White),
            item_date: Style::default().fg(Color::DarkGray),
            item_body: Style::default().fg(Color::Black),
            item_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            warning: Style::default().fg(Color::Red),
            loading: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
        }
    }
}

// ============================================================================
// Style Map — string-keyed lookup
// ============================================================================

/// String-keyed style lookup, built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

const ROLE_NAMES: [&str; 19] = [
    "source_checked",
    "source_unchecked",
    "source_cursor",
    "sidebar_notice",
    "page_title",
    "page_updated",
    "tab_active",
    "tab_inactive",
    "section_heading",
    "item_title",
    "item_selected",
    "item_date",
    "item_body",
    "item_link",
    "warning",
    "loading",
    "status_bar",
    "panel_border",
    "panel_border_focused",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 19] = [
            p.source_checked,
            p.source_unchecked,
            p.source_cursor,
            p.sidebar_notice,
            p.page_title,
            p.page_updated,
            p.tab_active,
            p.tab_inactive,
            p.section_heading,
            p.item_title,
            p.item_selected,
            p.item_date,
            p.item_body,
            p.item_link,
            p.warning,
            p.loading,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name to its `Style`. Unknown roles resolve to `Style::default()`.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}
