use crate::feed::date::{parse_published, PublishedDate};
use crate::feed::item::RawEntry;
use anyhow::Result;
use chrono::{DateTime, TimeDelta, Utc};
use feed_rs::model::{Entry, Link};
use feed_rs::parser;
use std::cell::RefCell;
use std::rc::Rc;

/// Parse RSS/Atom bytes and return at most `limit` entries, in feed order.
///
/// Entries are not re-sorted: the publisher's order (usually newest first)
/// is what the caller gets.
pub fn parse_entries(bytes: &[u8], limit: usize) -> Result<Vec<RawEntry>> {
    // feed-rs only hands back UTC instants, so each date it meets is recorded
    // here and the parser gets a token indexing the record instead.
    let dates: Rc<RefCell<Vec<PublishedDate>>> = Rc::default();
    let recorder = Rc::clone(&dates);
    let feed_parser = parser::Builder::new()
        .timestamp_parser(move |text| {
            let date = parse_published(text)?;
            let mut dates = recorder.borrow_mut();
            dates.push(date);
            date_token(dates.len() - 1)
        })
        .build();

    let feed = feed_parser.parse(bytes)?;
    let dates = dates.borrow();

    let entries = feed
        .entries
        .into_iter()
        .take(limit)
        .map(|entry| raw_entry(entry, &dates))
        .collect();

    Ok(entries)
}

fn date_token(index: usize) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(index).ok()?;
    DateTime::<Utc>::MIN_UTC.checked_add_signed(TimeDelta::try_seconds(secs)?)
}

fn token_index(token: DateTime<Utc>) -> Option<usize> {
    usize::try_from((token - DateTime::<Utc>::MIN_UTC).num_seconds()).ok()
}

fn raw_entry(entry: Entry, dates: &[PublishedDate]) -> RawEntry {
    RawEntry {
        title: entry.title.map(|t| t.content),
        link: article_link(&entry.links),
        summary: entry.summary.map(|s| s.content),
        published: entry
            .published
            .and_then(token_index)
            .and_then(|i| dates.get(i).cloned()),
    }
}

/// Prefer the `alternate` link (the article page), falling back to the first link.
fn article_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| l.rel.as_deref() == Some("alternate"))
        .or_else(|| links.first())
        .map(|l| l.href.clone())
}
