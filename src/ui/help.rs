//! Help overlay — keybinding table.

use crate::app::App;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Row, Table},
    Frame,
};

const KEY_HELP: [(&str, &str); 12] = [
    ("Tab / Shift+Tab", "Switch between sources and news"),
    ("j / ↓", "Move down"),
    ("k / ↑", "Move up"),
    ("Space", "Include / exclude source (sidebar)"),
    ("← / h", "Previous tab"),
    ("→ / l", "Next tab"),
    ("Enter", "Expand / collapse entry"),
    ("o", "Open full article in browser"),
    ("r", "Reload selected sources"),
    ("t", "Cycle theme"),
    ("?", "Toggle this help"),
    ("q / Esc", "Quit"),
];

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(60, 60, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let rows: Vec<Row> = KEY_HELP
        .iter()
        .map(|(key, description)| Row::new(vec![format!("  {}", key), description.to_string()]))
        .collect();

    let table = Table::new(rows, [Constraint::Length(18), Constraint::Min(20)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(" Help (? to close) "),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        )
        .style(app.style("item_body"));

    f.render_widget(table, overlay);
}

/// Create a centered rectangle with the given percentage of the parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
