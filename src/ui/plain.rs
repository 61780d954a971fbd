//! Non-interactive output for `--print` and `--json`.

use crate::page::{
    Page, SectionBody, NO_SELECTION_PROMPT, PAGE_TITLE, READ_MORE_LABEL, UNAVAILABLE_WARNING,
};
use crate::util::strip_control_chars;
use std::fmt::Write;

use super::summary::summary_text;

/// Column width summaries are laid out at.
const TEXT_WIDTH: usize = 80;
const SUMMARY_INDENT: &str = "    ";

/// Render the page as plain text, one block per section in selection order.
pub fn render_text(page: &Page) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "{}", PAGE_TITLE);
    let _ = writeln!(out, "Atualizado em: {}", page.updated_at);

    if page.has_no_selection() {
        let _ = writeln!(out, "\n{}", NO_SELECTION_PROMPT);
        return out;
    }

    for section in &page.sections {
        let heading = section.heading();
        let _ = writeln!(out, "\n{}", heading);
        let _ = writeln!(out, "{}", "=".repeat(crate::util::display_width(&heading)));

        match &section.body {
            SectionBody::Unavailable { .. } => {
                let _ = writeln!(out, "⚠ {}", UNAVAILABLE_WARNING);
            }
            SectionBody::Items { items } => {
                for item in items {
                    let _ = writeln!(out, "\n• {}", strip_control_chars(&item.title));
                    let _ = writeln!(out, "  📅 {}", strip_control_chars(&item.date));
                    let summary =
                        summary_text(&item.summary, TEXT_WIDTH - SUMMARY_INDENT.len());
                    for line in summary.lines() {
                        let _ = writeln!(out, "{}{}", SUMMARY_INDENT, line);
                    }
                    let _ = writeln!(
                        out,
                        "  {} {}",
                        READ_MORE_LABEL,
                        strip_control_chars(&item.link)
                    );
                }
            }
        }
    }
    out
}

/// Render the page as pretty-printed JSON.
pub fn render_json(page: &Page) -> serde_json::Result<String> {
    serde_json::to_string_pretty(page)
}
