use crate::app::{App, Focus, SourceState};
use crate::page::SIDEBAR_NOTICE;
use crate::util::truncate_to_width;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Render the "Filtros" sidebar: one checkbox per source plus the notice.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(6)])
        .split(area);

    let is_focused = app.focus == Focus::Sidebar;
    // Borders (2) + "[x] " (4) + failure marker (2)
    let label_width = chunks[0].width.saturating_sub(8) as usize;

    let items: Vec<ListItem> = app
        .slots
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let (mark, mark_style) = if slot.selected {
                ("[x] ", app.style("source_checked"))
            } else {
                ("[ ] ", app.style("source_unchecked"))
            };

            let label_style = if is_focused && i == app.sidebar_cursor {
                app.style("source_cursor")
            } else if slot.selected {
                app.style("item_body")
            } else {
                app.style("source_unchecked")
            };

            let mut spans = vec![
                Span::styled(mark, mark_style),
                Span::styled(
                    truncate_to_width(&slot.source.label, label_width).into_owned(),
                    label_style,
                ),
            ];
            if matches!(&slot.state, SourceState::Ready(outcome) if outcome.is_failed()) {
                spans.push(Span::styled(" ⚠", app.style("warning")));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let border_style = if is_focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Filtros "),
    );
    f.render_widget(list, chunks[0]);

    let notice = Paragraph::new(SIDEBAR_NOTICE)
        .wrap(Wrap { trim: true })
        .style(app.style("sidebar_notice"))
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(app.style("panel_border")),
        );
    f.render_widget(notice, chunks[1]);
}
