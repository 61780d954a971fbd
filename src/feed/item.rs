//! Normalized news items and the policy that fills in missing entry fields.
//!
//! Feed entries come out of the parser as [`RawEntry`] values where every
//! field is optional. [`NormalizePolicy::apply`] is the single place where
//! defaults are substituted, so the fetch-time date placeholder stays visible
//! through [`DateOrigin`] instead of being silently coerced.

use crate::feed::date::PublishedDate;
use chrono::{DateTime, Local};
use serde::Serialize;

/// Summary shown when an entry carries none.
pub const DEFAULT_SUMMARY_PLACEHOLDER: &str = "Sem resumo disponível.";

/// Number of items kept per source unless configured otherwise.
pub const DEFAULT_ITEMS_PER_SOURCE: usize = 8;

/// Format of the fetch-time placeholder date, e.g. `Fri, 16 Oct 2026`.
pub const FALLBACK_DATE_FORMAT: &str = "%a, %d %b %Y";

/// Format of a publication date, in the feed's own offset, e.g.
/// `Thu, 15 Oct 2026 09:30:00 -0300`.
pub const PUBLISHED_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Where a [`NewsItem`]'s date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrigin {
    /// The entry's own publication date.
    Published,
    /// The entry had a publication date in an unrecognized format; it is shown as written.
    Verbatim,
    /// The entry had no publication date; the wall-clock time of the fetch was used.
    FetchTime,
}

/// One feed entry, projected into the shape the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub date: String,
    pub date_origin: DateOrigin,
}

/// A feed entry as parsed, before any default substitution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub published: Option<PublishedDate>,
}

/// Default policy for missing entry fields.
///
/// - `title` / `link`: no default, a missing value becomes the empty string.
/// - `summary`: replaced by `summary_placeholder`.
/// - `published`: only when absent, replaced by the fetch time formatted with
///   [`FALLBACK_DATE_FORMAT`] and tagged [`DateOrigin::FetchTime`]. A date
///   that is present but unrecognized is kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizePolicy {
    pub summary_placeholder: String,
}

impl Default for NormalizePolicy {
    fn default() -> Self {
        Self {
            summary_placeholder: DEFAULT_SUMMARY_PLACEHOLDER.to_string(),
        }
    }
}

impl NormalizePolicy {
    /// Project a raw entry into a [`NewsItem`].
    ///
    /// `now` is taken once per fetch so every item of the same fetch shares
    /// the same placeholder date.
    pub fn apply(&self, raw: RawEntry, now: DateTime<Local>) -> NewsItem {
        let (date, date_origin) = match raw.published {
            Some(PublishedDate::Parsed(published)) => (
                published.format(PUBLISHED_DATE_FORMAT).to_string(),
                DateOrigin::Published,
            ),
            Some(PublishedDate::Verbatim(text)) => (text, DateOrigin::Verbatim),
            None => (
                now.format(FALLBACK_DATE_FORMAT).to_string(),
                DateOrigin::FetchTime,
            ),
        };

        NewsItem {
            title: raw.title.unwrap_or_default(),
            link: raw.link.unwrap_or_default(),
            summary: raw
                .summary
                .unwrap_or_else(|| self.summary_placeholder.clone()),
            date,
            date_origin,
        }
    }
}
