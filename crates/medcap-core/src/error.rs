//! Error types for the medcap-core library.

use thiserror::Error;

/// Main error type for the medcap library.
///
/// A missing table or missing identity fields are not errors; those are
/// reported as `None` through [`crate::ExtractionResult`]. This type covers
/// faults that abort a pipeline stage.
#[derive(Error, Debug)]
pub enum MedcapError {
    /// A configured CSS selector could not be used.
    #[error("selector error: {0}")]
    Selector(#[from] SelectorError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while compiling a CSS selector.
#[derive(Error, Debug)]
pub enum SelectorError {
    /// The selector string is not valid CSS.
    #[error("invalid selector for {field} ({selector:?}): {reason}")]
    Invalid {
        field: &'static str,
        selector: String,
        reason: String,
    },

    /// The selector string is empty.
    #[error("empty selector for {0}")]
    Empty(&'static str),
}

/// Result type for the medcap library.
pub type Result<T> = std::result::Result<T, MedcapError>;
