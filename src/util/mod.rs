//! Small shared helpers.
//!
//! - **URL validation**: feed source URLs and article links before opening
//! - **Text processing**: Unicode-aware width, truncation and escape stripping

mod text;
mod url_validator;

pub use text::{display_width, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_url, validate_url_for_open, UrlValidationError};
