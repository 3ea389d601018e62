use thiserror::Error;

/// Errors raised by the URL record and the query codec.
///
/// Parsing and the component accessors never fail: malformed input is
/// normalized into the closest record. Only call-shape mistakes surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// `encode_query` was given something that is neither a mapping nor a sequence
    #[error("cannot encode a {found} as a query string, expected an object or an array")]
    UnsupportedQueryShape { found: &'static str },
    /// A dried value did not describe a URL
    #[error("invalid dried URL value: {0}")]
    InvalidDryValue(String),
    /// Serde failure while reading a dried value
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for fallible URL operations
pub type Result<T> = core::result::Result<T, Error>;
