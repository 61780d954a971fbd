use crate::app::{App, Focus};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if let Some((done, total)) = app.loading_progress() {
        Cow::Owned(format!("Loading... {}/{} sources", done, total))
    } else {
        match app.focus {
            Focus::Sidebar => Cow::Borrowed(
                "[Space]toggle source [j/k]move [Tab]news [r]efresh [?]help [q]uit",
            ),
            Focus::News => Cow::Borrowed(
                "[Enter]expand [o]pen [←/→]tabs [j/k]move [Tab]sources [r]efresh [?]help [q]uit",
            ),
        }
    };

    let paragraph = Paragraph::new(text).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}
