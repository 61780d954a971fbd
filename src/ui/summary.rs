//! Rich-text rendering of feed summaries.
//!
//! Summaries are trusted markup: publishers send HTML, occasionally markdown or
//! plain text. Markdown is first turned into HTML with `pulldown-cmark`, then
//! everything goes through `html2text`, which lays the text out at the target
//! width. Terminal escapes are stripped from the result.

use crate::util::strip_control_chars;
use pulldown_cmark::{html, Parser};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use std::borrow::Cow;

/// html2text refuses very narrow layouts
const MIN_LAYOUT_WIDTH: usize = 20;

fn looks_like_html(s: &str) -> bool {
    s.match_indices('<').any(|(i, _)| {
        s[i + 1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!')
    }) && s.contains('>')
}

fn markdown_to_html(md: &str) -> String {
    let mut out = String::with_capacity(md.len() + md.len() / 2);
    html::push_html(&mut out, Parser::new(md));
    out
}

/// Lay out a summary as plain text wrapped to `width` columns.
pub fn summary_text(summary: &str, width: usize) -> String {
    let markup: Cow<'_, str> = if looks_like_html(summary) {
        Cow::Borrowed(summary)
    } else {
        Cow::Owned(markdown_to_html(summary))
    };

    let text = match html2text::from_read(markup.as_bytes(), width.max(MIN_LAYOUT_WIDTH)) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(error = %e, "Summary layout failed, showing raw text");
            summary.to_string()
        }
    };

    strip_control_chars(text.trim_end()).into_owned()
}

/// Render a summary into styled lines, each prefixed with `indent`.
///
/// Heading lines (`# ...` in html2text output) get `heading` merged over `body`.
pub fn summary_lines(
    summary: &str,
    width: usize,
    indent: &'static str,
    body: Style,
) -> Vec<Line<'static>> {
    let heading = body.add_modifier(Modifier::BOLD);
    summary_text(summary, width)
        .lines()
        .map(|line| {
            let style = if line.starts_with('#') { heading } else { body };
            Line::from(vec![
                Span::raw(indent),
                Span::styled(line.to_string(), style),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_html() {
        assert!(looks_like_html("<p>Olá</p>"));
        assert!(looks_like_html("texto <br/> mais"));
        assert!(!looks_like_html("a < b and c > d"));
        assert!(!looks_like_html("Sem resumo disponível."));
    }

    #[test]
    fn test_html_tags_removed() {
        let text = summary_text("<p>Olá <b>mundo</b></p><p>Segundo parágrafo</p>", 60);
        assert!(text.contains("Olá"));
        assert!(text.contains("mundo"));
        assert!(text.contains("Segundo parágrafo"));
        assert!(!text.contains("<p>"));
        assert!(!text.contains("</b>"));
    }

    #[test]
    fn test_html_entities_decoded() {
        let text = summary_text("<p>Lei &amp; Ordem</p>", 60);
        assert!(text.contains("Lei & Ordem"));
    }

    #[test]
    fn test_plain_text_kept() {
        assert_eq!(
            summary_text("Sem resumo disponível.", 60),
            "Sem resumo disponível."
        );
    }

    #[test]
    fn test_markdown_rendered() {
        let text = summary_text("# Manchete\n\nCorpo do texto", 60);
        assert!(text.contains("Manchete"));
        assert!(text.contains("Corpo do texto"));
        assert!(!text.contains("\n\n\n"));
    }

    #[test]
    fn test_wraps_to_width() {
        let long = "palavra ".repeat(40);
        let text = summary_text(&long, 30);
        assert!(text.lines().count() > 1);
        assert!(text.lines().all(|l| crate::util::display_width(l) <= 30));
    }

    #[test]
    fn test_escape_sequences_stripped() {
        let text = summary_text("<p>\x1b[31mvermelho\x1b[0m</p>", 60);
        assert!(!text.contains('\x1b'));
        assert!(text.contains("vermelho"));
    }

    #[test]
    fn test_lines_are_indented() {
        let lines = summary_lines("<p>Olá</p>", 40, "   ", Style::default());
        assert!(!lines.is_empty());
        assert_eq!(lines[0].spans[0].content, "   ");
    }

    #[test]
    fn test_empty_summary() {
        assert!(summary_lines("", 40, "  ", Style::default()).is_empty());
    }
}
