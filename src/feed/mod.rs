//! Feed retrieval and normalization.
//!
//! - [`registry`] - the ordered label → URL mapping of monitored sources
//! - [`parser`] - RSS/Atom parsing via `feed-rs`, bounded to the first N entries
//! - [`item`] - the normalized [`NewsItem`] and the default policy for missing fields
//! - [`fetcher`] - HTTP retrieval, the per-source failure boundary, multi-source fetches
//!
//! # Example
//!
//! ```ignore
//! use radar::feed::{
//!     build_client, fetch_selected, FetchSettings, SourceRegistry, DEFAULT_REQUEST_TIMEOUT,
//! };
//!
//! let registry = SourceRegistry::builtin();
//! let client = build_client(DEFAULT_REQUEST_TIMEOUT)?;
//! let reports = fetch_selected(&client, registry.as_slice(), &FetchSettings::default()).await;
//! ```

mod date;
mod fetcher;
mod item;
mod parser;
mod registry;

pub use date::{parse_published, PublishedDate};
pub use fetcher::{
    build_client, fetch_items, fetch_selected, fetch_source, FetchError, FetchOutcome,
    FetchSettings, SourceReport, DEFAULT_MAX_CONCURRENT_FETCHES, DEFAULT_REQUEST_TIMEOUT,
};
pub use item::{
    DateOrigin, NewsItem, NormalizePolicy, RawEntry, DEFAULT_ITEMS_PER_SOURCE,
    DEFAULT_SUMMARY_PLACEHOLDER, FALLBACK_DATE_FORMAT, PUBLISHED_DATE_FORMAT,
};
pub use parser::parse_entries;
pub use registry::{Source, SourceRegistry};
