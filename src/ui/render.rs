//! Render functions for the TUI.
//!
//! Lays out the sidebar, the news area and the status bar, and draws the help
//! overlay on top when it is active.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame,
};

use super::{help, news, sidebar, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 12;

/// Width of the "Filtros" sidebar.
const SIDEBAR_WIDTH: u16 = 34;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    // Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(rows[0]);

    sidebar::render(f, app, columns[0]);
    news::render(f, app, columns[1]);
    status::render(f, app, rows[1]);

    if app.show_help {
        help::render(f, app);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SourceState;
    use crate::feed::{
        DateOrigin, FetchOutcome, FetchSettings, NewsItem, Source, SourceRegistry,
    };
    use crate::page::{NO_SELECTION_PROMPT, PAGE_TITLE, UNAVAILABLE_WARNING};
    use crate::theme::ThemeVariant;
    use crate::util::display_width;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn app() -> App {
        let registry = SourceRegistry::from_entries(vec![
            Source::new("Agência A", "https://a.example.com/rss"),
            Source::new("Agência B", "https://b.example.com/rss"),
        ]);
        App::new(
            &registry,
            FetchSettings::default(),
            reqwest::Client::new(),
            ThemeVariant::Dark,
        )
    }

    fn item(title: &str) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            link: "https://a.example.com/noticia".to_string(),
            summary: "<p>Resumo da notícia</p>".to_string(),
            date: "Fri, 16 Oct 2026 09:00:00 +0000".to_string(),
            date_origin: DateOrigin::Published,
        }
    }

    fn draw(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    /// Buffer contents, one line per row, skipping the padding cells that
    /// follow wide characters.
    fn buffer_text(buffer: &Buffer) -> String {
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| {
                let mut line = String::new();
                let mut skip = 0;
                for cell in row {
                    if skip > 0 {
                        skip -= 1;
                        continue;
                    }
                    line.push_str(cell.symbol());
                    skip = display_width(cell.symbol()).saturating_sub(1);
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_renders_items_of_active_source() {
        let mut app = app();
        app.slots[0].state = SourceState::Ready(FetchOutcome::Loaded(vec![
            item("Primeira manchete"),
            item("Segunda manchete"),
        ]));

        let text = draw(&app, 100, 30);
        assert!(text.contains(PAGE_TITLE));
        assert!(text.contains("Filtros"));
        assert!(text.contains("Primeira manchete"));
        assert!(text.contains("Segunda manchete"));
        assert!(text.contains("Últimas atualizações: Agência A"));
    }

    #[test]
    fn test_expanded_entry_shows_summary() {
        let mut app = app();
        app.slots[0].state =
            SourceState::Ready(FetchOutcome::Loaded(vec![item("Primeira manchete")]));
        app.toggle_expanded();

        let text = draw(&app, 100, 30);
        assert!(text.contains("Resumo da notícia"));
        assert!(text.contains("https://a.example.com/noticia"));
    }

    #[test]
    fn test_failed_source_shows_warning() {
        let mut app = app();
        app.slots[0].state =
            SourceState::Ready(FetchOutcome::Failed("HTTP error: 503".to_string()));

        let text = draw(&app, 120, 30);
        assert!(text.contains(UNAVAILABLE_WARNING));
    }

    #[test]
    fn test_empty_source_shows_warning() {
        let mut app = app();
        app.slots[0].state = SourceState::Ready(FetchOutcome::Loaded(Vec::new()));

        let text = draw(&app, 120, 30);
        assert!(text.contains(UNAVAILABLE_WARNING));
    }

    #[test]
    fn test_no_selection_shows_prompt() {
        let mut app = app();
        app.select_only(&[]);

        let text = draw(&app, 120, 30);
        assert!(text.contains(NO_SELECTION_PROMPT));
    }

    #[test]
    fn test_small_terminal_message() {
        let app = app();
        let text = draw(&app, 40, 8);
        assert!(text.contains("Terminal too small"));
    }

    #[test]
    fn test_help_overlay_drawn() {
        let mut app = app();
        app.show_help = true;
        let text = draw(&app, 100, 30);
        assert!(text.contains("Help (? to close)"));
    }
}
