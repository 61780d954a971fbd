//! Lenient parsing of entry publication dates.
//!
//! Publishers are inconsistent: besides RFC 2822 and RFC 3339 we see ISO dates
//! without the `T`, `dd/mm/yyyy` stamps, and RFC 2822 with Portuguese day and
//! month names. A date is kept with the offset the feed gave. Anything that
//! still cannot be interpreted is kept verbatim rather than dropped.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone};

/// Formats that carry their own offset.
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S %z",
    "%d/%m/%Y %H:%M:%S %z",
    "%d/%m/%Y %H:%M %z",
];

/// Formats without an offset; read as local time.
const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Portuguese day and month names by their first three letters.
const PORTUGUESE_NAMES: [(&str, &str); 19] = [
    ("dom", "Sun"),
    ("seg", "Mon"),
    ("ter", "Tue"),
    ("qua", "Wed"),
    ("qui", "Thu"),
    ("sex", "Fri"),
    ("sáb", "Sat"),
    ("jan", "Jan"),
    ("fev", "Feb"),
    ("mar", "Mar"),
    ("abr", "Apr"),
    ("mai", "May"),
    ("jun", "Jun"),
    ("jul", "Jul"),
    ("ago", "Aug"),
    ("set", "Sep"),
    ("out", "Oct"),
    ("nov", "Nov"),
    ("dez", "Dec"),
];

/// An entry's publication date as found in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishedDate {
    /// Interpreted, with the feed's own offset.
    Parsed(DateTime<FixedOffset>),
    /// Present, but in no format we understand. Trimmed, otherwise as written.
    Verbatim(String),
}

/// Interpret a publication date. Blank text counts as no date at all.
pub fn parse_published(text: &str) -> Option<PublishedDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let date = parse_timestamp(text)
        .map(PublishedDate::Parsed)
        .unwrap_or_else(|| {
            tracing::debug!(date = %text, "Unrecognized publication date, keeping as written");
            PublishedDate::Verbatim(text.to_string())
        });
    Some(date)
}

fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(text)
        .or_else(|_| DateTime::parse_from_rfc3339(text))
        .ok()
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
        })
        .or_else(|| {
            NAIVE_FORMATS.iter().find_map(|fmt| {
                let naive = NaiveDateTime::parse_from_str(text, fmt).ok()?;
                Local
                    .from_local_datetime(&naive)
                    .earliest()
                    .map(|dt| dt.fixed_offset())
            })
        })
        .or_else(|| {
            let translated = translate_portuguese(text)?;
            DateTime::parse_from_rfc2822(&translated).ok()
        })
}

/// Rewrite Portuguese day/month names to their English abbreviations and drop
/// the `de` connectives (`15 de out de 2026`). `None` when nothing changed.
fn translate_portuguese(text: &str) -> Option<String> {
    let mut changed = false;
    let mut words = Vec::new();

    for word in text.split_whitespace() {
        if word.eq_ignore_ascii_case("de") {
            changed = true;
            continue;
        }

        let (name, comma) = match word.strip_suffix(',') {
            Some(name) => (name, ","),
            None => (word, ""),
        };
        let name = name.trim_end_matches('.');
        let name = name.strip_suffix("-feira").unwrap_or(name);
        let prefix: String = name.chars().take(3).flat_map(char::to_lowercase).collect();
        let english = name
            .chars()
            .all(char::is_alphabetic)
            .then(|| {
                PORTUGUESE_NAMES
                    .iter()
                    .find(|(pt, _)| *pt == prefix || (*pt == "sáb" && prefix == "sab"))
            })
            .flatten();

        match english {
            Some((_, en)) if !name.eq_ignore_ascii_case(en) => {
                changed = true;
                words.push(format!("{}{}", en, comma));
            }
            _ => words.push(word.to_string()),
        }
    }

    changed.then(|| words.join(" "))
}
