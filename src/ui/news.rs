//! Main area: page header, one tab per selected source, and the active
//! source's section of collapsible entries.

use crate::app::{App, Focus, SourceState};
use crate::feed::NewsItem;
use crate::page::{
    section_body, updated_at_line, SectionBody, NO_SELECTION_PROMPT, PAGE_TITLE,
    READ_MORE_LABEL, SECTION_HEADING_PREFIX, UNAVAILABLE_WARNING,
};
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use super::summary::summary_lines;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Indent of the expanded part of an entry, under the title marker.
const DETAIL_INDENT: &str = "   ";

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    render_header(f, app, chunks[0]);

    let selected = app.selected_indices();
    if selected.is_empty() {
        let prompt = Paragraph::new(NO_SELECTION_PROMPT)
            .style(app.style("item_body"))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).border_style(app.style("panel_border")));
        let rest = Rect {
            height: chunks[1].height + chunks[2].height,
            ..chunks[1]
        };
        f.render_widget(prompt, rest);
        return;
    }

    let titles: Vec<Line> = selected
        .iter()
        .filter_map(|&i| app.slots.get(i))
        .map(|slot| Line::from(format!(" {} ", slot.source.label)))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.active_tab)
        .style(app.style("tab_inactive"))
        .highlight_style(app.style("tab_active"))
        .block(Block::default().borders(Borders::ALL).border_style(app.style("panel_border")));
    f.render_widget(tabs, chunks[1]);

    render_section(f, app, chunks[2]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let updated = match (app.last_updated, app.loading_progress()) {
        (_, Some((done, total))) => format!("Carregando fontes... {}/{}", done, total),
        (Some(at), None) => updated_at_line(at),
        (None, None) => String::new(),
    };

    let header = Paragraph::new(vec![
        Line::from(Span::styled(PAGE_TITLE, app.style("page_title"))),
        Line::from(Span::styled(updated, app.style("page_updated"))),
    ]);
    f.render_widget(header, area);
}

fn render_section(f: &mut Frame, app: &App, area: Rect) {
    let Some(slot) = app.active_slot() else {
        return;
    };

    let border_style = if app.focus == Focus::News {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(
            format!(" {}{} ", SECTION_HEADING_PREFIX, slot.source.label),
            app.style("section_heading"),
        ));

    let inner_width = area.width.saturating_sub(2) as usize;
    let visible = area.height.saturating_sub(2) as usize;

    let (lines, selected_span) = match &slot.state {
        SourceState::Idle | SourceState::Loading => {
            let frame = SPINNER[app.spinner_frame % SPINNER.len()];
            let line = Line::from(Span::styled(
                format!("{} Carregando {}...", frame, slot.source.label),
                app.style("loading"),
            ));
            (vec![line], None)
        }
        SourceState::Ready(outcome) => match section_body(outcome) {
            SectionBody::Items { items } => entry_lines(app, &items, inner_width),
            SectionBody::Unavailable { reason } => (unavailable_lines(app, reason.as_deref()), None),
        },
    };

    let offset = selected_span
        .map(|(start, end)| scroll_offset(start, end, visible))
        .unwrap_or(0);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((offset.min(u16::MAX as usize) as u16, 0));
    f.render_widget(paragraph, area);
}

fn unavailable_lines(app: &App, reason: Option<&str>) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        format!("⚠ {}", UNAVAILABLE_WARNING),
        app.style("warning"),
    ))];
    if let Some(reason) = reason {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            strip_control_chars(reason).into_owned(),
            app.style("item_date"),
        )));
    }
    lines
}

/// Build the entry list. Returns the lines and the `[start, end)` line range
/// of the selected entry.
fn entry_lines(
    app: &App,
    items: &[NewsItem],
    width: usize,
) -> (Vec<Line<'static>>, Option<(usize, usize)>) {
    let mut lines = Vec::new();
    let mut selected_span = None;
    let detail_width = width.saturating_sub(DETAIL_INDENT.len());

    for (i, item) in items.iter().enumerate() {
        let start = lines.len();
        let expanded = app.expanded.contains(&i);
        let is_selected = i == app.selected_item;

        let marker = if expanded { "▾ " } else { "▸ " };
        let title_style = if is_selected && app.focus == Focus::News {
            app.style("item_selected")
        } else {
            app.style("item_title")
        };
        let title = strip_control_chars(&item.title);
        lines.push(Line::from(vec![
            Span::styled(marker, title_style),
            Span::styled(
                truncate_to_width(&title, width.saturating_sub(2)).into_owned(),
                title_style,
            ),
        ]));

        if expanded {
            lines.push(Line::from(vec![
                Span::raw(DETAIL_INDENT),
                Span::styled(
                    format!("📅 {}", strip_control_chars(&item.date)),
                    app.style("item_date"),
                ),
            ]));
            lines.extend(summary_lines(
                &item.summary,
                detail_width,
                DETAIL_INDENT,
                app.style("item_body"),
            ));
            lines.push(Line::from(vec![
                Span::raw(DETAIL_INDENT),
                Span::styled(READ_MORE_LABEL, app.style("item_title")),
                Span::raw(" "),
                Span::styled(strip_control_chars(&item.link).into_owned(), app.style("item_link")),
            ]));
            lines.push(Line::from(""));
        }

        if is_selected {
            selected_span = Some((start, lines.len()));
        }
    }

    (lines, selected_span)
}

/// Smallest scroll offset that keeps `[start, end)` in view, favouring the
/// top of the entry when it is taller than the viewport.
fn scroll_offset(start: usize, end: usize, visible: usize) -> usize {
    start.min(end.saturating_sub(visible))
}
