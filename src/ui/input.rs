//! Input handling for the TUI.
//!
//! Routes key presses to the help overlay, the sidebar, or the news area
//! depending on what is visible and focused.

use crate::app::{App, AppEvent, Focus};
use crate::util::validate_url_for_open;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::events::spawn_fetches;
use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // Help overlay captures all keys while visible
    if app.show_help {
        if matches!(
            code,
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')
        ) {
            app.show_help = false;
        }
        return Ok(Action::Continue);
    }

    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Ok(Action::Quit);
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(Action::Quit),
        KeyCode::Tab | KeyCode::BackTab => app.cycle_focus(),
        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),
        KeyCode::Right | KeyCode::Char('l') => app.next_tab(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_tab(),
        KeyCode::Char(' ') if app.focus == Focus::Sidebar => toggle_source(app, event_tx),
        KeyCode::Enter => match app.focus {
            Focus::Sidebar => toggle_source(app, event_tx),
            Focus::News => app.toggle_expanded(),
        },
        KeyCode::Char('o') => open_selected(app),
        KeyCode::Char('r') => refresh(app, event_tx),
        KeyCode::Char('t') => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        KeyCode::Char('?') => app.show_help = true,
        _ => {}
    }
    Ok(Action::Continue)
}

fn toggle_source(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let index = app.sidebar_cursor;
    if let Some(ticket) = app.toggle_source(index) {
        spawn_fetches(app, vec![ticket], event_tx);
    }
}

fn refresh(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let tickets = app.begin_fetch_all();
    if tickets.is_empty() {
        app.set_status("No sources selected");
        return;
    }
    tracing::info!(sources = tickets.len(), "Refreshing selected sources");
    spawn_fetches(app, tickets, event_tx);
}

fn open_selected(app: &mut App) {
    let Some(item) = app.selected_news_item() else {
        return;
    };
    let link = item.link.clone();

    // Only http(s) links without control characters reach the opener
    if let Err(e) = validate_url_for_open(&link) {
        app.set_status(e);
    } else if let Err(e) = open::that(&link) {
        app.set_status(format!("Failed to open browser: {}", e));
    } else {
        app.set_status("Opening article in browser...");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SourceState;
    use crate::feed::{DateOrigin, FetchOutcome, FetchSettings, NewsItem, Source, SourceRegistry};
    use crate::theme::ThemeVariant;

    fn app() -> App {
        let registry = SourceRegistry::from_entries(vec![
            Source::new("A", "https://a.example.com/rss"),
            Source::new("B", "https://b.example.com/rss"),
        ]);
        App::new(
            &registry,
            FetchSettings::default(),
            reqwest::Client::new(),
            ThemeVariant::Dark,
        )
    }

    fn item(link: &str) -> NewsItem {
        NewsItem {
            title: "Título".to_string(),
            link: link.to_string(),
            summary: "Resumo".to_string(),
            date: "Fri, 16 Oct 2026 09:00:00 +0000".to_string(),
            date_origin: DateOrigin::Published,
        }
    }

    fn press(app: &mut App, code: KeyCode, tx: &mpsc::Sender<AppEvent>) -> Action {
        handle_input(app, code, KeyModifiers::NONE, tx).unwrap()
    }

    #[test]
    fn test_quit_keys() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = app();
        assert!(matches!(press(&mut app, KeyCode::Char('q'), &tx), Action::Quit));
        assert!(matches!(press(&mut app, KeyCode::Esc, &tx), Action::Quit));
    }

    #[test]
    fn test_help_overlay_captures_keys() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = app();
        press(&mut app, KeyCode::Char('?'), &tx);
        assert!(app.show_help);

        // q closes the overlay instead of quitting
        assert!(matches!(press(&mut app, KeyCode::Char('q'), &tx), Action::Continue));
        assert!(!app.show_help);
    }

    #[test]
    fn test_tab_cycles_focus() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = app();
        assert_eq!(app.focus, Focus::News);
        press(&mut app, KeyCode::Tab, &tx);
        assert_eq!(app.focus, Focus::Sidebar);
        press(&mut app, KeyCode::BackTab, &tx);
        assert_eq!(app.focus, Focus::News);
    }

    #[test]
    fn test_arrow_keys_switch_tabs() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = app();
        press(&mut app, KeyCode::Right, &tx);
        assert_eq!(app.active_tab, 1);
        press(&mut app, KeyCode::Char('h'), &tx);
        assert_eq!(app.active_tab, 0);
    }

    #[test]
    fn test_enter_expands_entry() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = app();
        app.slots[0].state = SourceState::Ready(FetchOutcome::Loaded(vec![item(
            "https://a.example.com/1",
        )]));
        press(&mut app, KeyCode::Enter, &tx);
        assert!(app.expanded.contains(&0));
        press(&mut app, KeyCode::Enter, &tx);
        assert!(!app.expanded.contains(&0));
    }

    #[test]
    fn test_open_rejects_bad_link() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = app();
        app.slots[0].state = SourceState::Ready(FetchOutcome::Loaded(vec![item(
            "javascript:alert(1)",
        )]));
        press(&mut app, KeyCode::Char('o'), &tx);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.starts_with("Cannot open link"));
    }

    #[test]
    fn test_theme_key_sets_status() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = app();
        let before = app.theme_variant;
        press(&mut app, KeyCode::Char('t'), &tx);
        assert_ne!(app.theme_variant, before);
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_space_deselects_then_reselects_source() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = app();
        app.focus = Focus::Sidebar;

        press(&mut app, KeyCode::Char(' '), &tx);
        assert!(!app.slots[0].selected);
        assert_eq!(app.selected_indices(), vec![1]);

        press(&mut app, KeyCode::Char(' '), &tx);
        assert!(app.slots[0].selected);
        assert!(matches!(app.slots[0].state, SourceState::Loading));
    }

    #[tokio::test]
    async fn test_refresh_marks_selected_sources_loading() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = app();
        press(&mut app, KeyCode::Char('r'), &tx);
        assert_eq!(app.loading_progress(), Some((0, 2)));
    }

    #[test]
    fn test_refresh_with_no_selection() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = app();
        app.select_only(&[]);
        press(&mut app, KeyCode::Char('r'), &tx);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "No sources selected");
    }
}
