//! Configuration file parser for ~/.config/radar/config.toml.
//!
//! The config file is optional — a missing file yields `Config::default()`,
//! which monitors the built-in source registry. Unknown keys are accepted by
//! serde and logged as warnings, since they are usually typos.
use crate::feed::{
    FetchSettings, NormalizePolicy, Source, SourceRegistry, DEFAULT_ITEMS_PER_SOURCE,
    DEFAULT_MAX_CONCURRENT_FETCHES, DEFAULT_REQUEST_TIMEOUT, DEFAULT_SUMMARY_PLACEHOLDER,
};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// Maximum number of items shown per source.
    pub items_per_source: usize,

    /// Summary shown for entries that carry none.
    pub summary_placeholder: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Number of sources fetched at the same time. 1 = one after another.
    pub max_concurrent_fetches: usize,

    /// Sources to monitor, in display order. Empty = built-in registry.
    pub sources: Vec<Source>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            items_per_source: DEFAULT_ITEMS_PER_SOURCE,
            summary_placeholder: DEFAULT_SUMMARY_PLACEHOLDER.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            sources: Vec::new(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 6] = [
        "theme",
        "items_per_source",
        "summary_placeholder",
        "request_timeout_secs",
        "max_concurrent_fetches",
        "sources",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(
            theme = %config.theme,
            sources = config.sources.len(),
            items_per_source = config.items_per_source,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// The source registry to monitor: configured sources, or the built-in set.
    pub fn registry(&self) -> SourceRegistry {
        if self.sources.is_empty() {
            SourceRegistry::builtin()
        } else {
            SourceRegistry::from_entries(self.sources.iter().cloned())
        }
    }

    /// Per-request timeout. Zero falls back to the default.
    pub fn request_timeout(&self) -> Duration {
        if self.request_timeout_secs == 0 {
            tracing::warn!("request_timeout_secs must be positive, using default");
            DEFAULT_REQUEST_TIMEOUT
        } else {
            Duration::from_secs(self.request_timeout_secs)
        }
    }

    /// Fetch settings derived from this config.
    ///
    /// `items_per_source = 0` is rejected in favour of the default, and
    /// `max_concurrent_fetches = 0` is treated as 1.
    pub fn fetch_settings(&self) -> FetchSettings {
        let limit = if self.items_per_source == 0 {
            tracing::warn!(
                default = DEFAULT_ITEMS_PER_SOURCE,
                "items_per_source must be positive, using default"
            );
            DEFAULT_ITEMS_PER_SOURCE
        } else {
            self.items_per_source
        };

        FetchSettings {
            limit,
            max_concurrent: self.max_concurrent_fetches.max(1),
            policy: NormalizePolicy {
                summary_placeholder: self.summary_placeholder.clone(),
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
