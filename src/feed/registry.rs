//! Feed source registry: the ordered label → URL mapping the radar monitors.
//!
//! A registry is built once at startup (from the built-in list or from the
//! config file) and never mutated afterwards. Order is significant: it is the
//! order of the sidebar checkboxes, the tabs, and the printed sections.

use crate::util::validate_url;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named feed URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub label: String,
    pub url: String,
}

impl Source {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// The reference set of sources, in display order.
const BUILTIN_SOURCES: [(&str, &str); 5] = [
    ("🤖 Google & IA (The Keyword)", "https://blog.google/rss/"),
    (
        "⚖️ STF (Notícias)",
        "https://www.stf.jus.br/portal/rss/noticiasRss.asp",
    ),
    (
        "🏛️ Câmara dos Deputados",
        "https://www.camara.leg.br/noticias/rss",
    ),
    (
        "🔺 G1 Centro-Oeste de Minas",
        "https://g1.globo.com/dynamo/mg/centro-oeste/rss2.xml",
    ),
    (
        "👮 Conjur (Jurídico & Político)",
        "https://www.conjur.com.br/rss.xml",
    ),
];

/// Ordered, immutable collection of [`Source`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRegistry {
    sources: Vec<Source>,
}

impl SourceRegistry {
    /// The built-in registry.
    pub fn builtin() -> Self {
        Self {
            sources: BUILTIN_SOURCES
                .iter()
                .map(|(label, url)| Source::new(*label, *url))
                .collect(),
        }
    }

    /// Build a registry from configured entries, preserving their order.
    ///
    /// Entries with a non-http(s) or unparseable URL are skipped, as are
    /// entries whose label was already used by an earlier entry.
    pub fn from_entries(entries: impl IntoIterator<Item = Source>) -> Self {
        let mut seen = HashSet::new();
        let mut sources = Vec::new();

        for source in entries {
            if let Err(e) = validate_url(&source.url) {
                tracing::warn!(
                    label = %source.label,
                    url = %source.url,
                    error = %e,
                    "Skipping source with invalid URL"
                );
                continue;
            }
            if !seen.insert(source.label.clone()) {
                tracing::warn!(label = %source.label, "Skipping source with duplicate label");
                continue;
            }
            sources.push(source);
        }

        Self { sources }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Source> {
        self.sources.get(index)
    }

    /// Index of the source with the given label, if any.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.sources.iter().position(|s| s.label == label)
    }

    pub fn as_slice(&self) -> &[Source] {
        &self.sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_order() {
        let registry = SourceRegistry::builtin();
        assert_eq!(registry.len(), 5);
        let labels: Vec<&str> = registry.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "🤖 Google & IA (The Keyword)",
                "⚖️ STF (Notícias)",
                "🏛️ Câmara dos Deputados",
                "🔺 G1 Centro-Oeste de Minas",
                "👮 Conjur (Jurídico & Político)",
            ]
        );
    }

    #[test]
    fn test_builtin_urls_are_valid() {
        for source in SourceRegistry::builtin().iter() {
            assert!(validate_url(&source.url).is_ok(), "{}", source.url);
        }
    }

    #[test]
    fn test_from_entries_keeps_order() {
        let registry = SourceRegistry::from_entries(vec![
            Source::new("B", "https://b.example.com/rss"),
            Source::new("A", "https://a.example.com/rss"),
        ]);
        assert_eq!(registry.get(0).unwrap().label, "B");
        assert_eq!(registry.get(1).unwrap().label, "A");
        assert_eq!(registry.position("A"), Some(1));
        assert_eq!(registry.position("missing"), None);
    }

    #[test]
    fn test_from_entries_skips_invalid_urls() {
        let registry = SourceRegistry::from_entries(vec![
            Source::new("ftp", "ftp://example.com/feed"),
            Source::new("garbage", "not a url"),
            Source::new("ok", "https://example.com/feed"),
        ]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(0).unwrap().label, "ok");
    }

    #[test]
    fn test_from_entries_skips_duplicate_labels() {
        let registry = SourceRegistry::from_entries(vec![
            Source::new("Same", "https://one.example.com/rss"),
            Source::new("Same", "https://two.example.com/rss"),
        ]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(0).unwrap().url, "https://one.example.com/rss");
    }

    #[test]
    fn test_empty_registry() {
        let registry = SourceRegistry::from_entries(Vec::new());
        assert!(registry.is_empty());
        assert!(registry.get(0).is_none());
    }
}
