use thiserror::Error;
use url::Url;

/// Errors that can occur during URL validation.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
}

/// Validates a URL string for use as a feed source.
///
/// Only checks that the URL parses, uses `http`/`https` and names a host.
/// Anything beyond that (reachability, content type) is left to the fetch.
///
/// # Examples
///
/// ```
/// use radar::util::validate_url;
///
/// let url = validate_url("https://example.com/feed.xml").unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
///
/// assert!(validate_url("file:///etc/passwd").is_err());
/// assert!(validate_url("not a url").is_err());
/// ```
pub fn validate_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}

/// Validates an article link before handing it to the system browser.
///
/// Feed content is untrusted, so only well-formed http(s) URLs without
/// control characters are passed to `open::that`. The error is a
/// user-facing status message.
pub fn validate_url_for_open(url_str: &str) -> Result<(), String> {
    if url_str.trim().is_empty() {
        return Err("Article has no link".to_string());
    }
    if url_str.chars().any(char::is_control) {
        return Err("Refusing to open link with control characters".to_string());
    }
    validate_url(url_str)
        .map(|_| ())
        .map_err(|e| format!("Cannot open link: {}", e))
}
