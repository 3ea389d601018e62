//! Mutable URL records with permissive parsing, relative resolution and a
//! nested query-string codec.
//!
//! ```
//! use rurl::Url;
//!
//! let url = Url::parse("/search?q[terms][]=rust&q[terms][]=url", Some("https://example.com:8443/"));
//! assert_eq!(url.host(), "example.com:8443");
//! assert_eq!(url.query()["q"]["terms"][1], "url");
//! ```

// Internal modules (not public API)
mod character_sets;
mod checkers;
mod error;
mod helpers;
mod object_path;
mod parser;
mod path;
mod query;
mod scheme;
mod types;
mod unicode;
mod url_components;
mod url_record;

// Public API
pub use checkers::{MaybeUrl, is_url};
pub use error::{Error, Result};
pub use object_path::{path, set_path};
pub use parser::{AsAddress, ExtractedProtocol, UrlParts, extract_protocol};
pub use path::resolve_path;
pub use query::{QueryOptions, decode_uri_segment, encode_query, parse_form_path, parse_query, parse_query_values};
pub use scheme::{requires_port, requires_slashes};
pub use types::{Component, SegmentIndex};
pub use url_record::{UrlJson, UrlRecord as Url};

/// Parse `address`, resolving it against `base` when it is relative
pub fn parse(address: &str, base: Option<&str>) -> Url {
    Url::parse(address, base)
}

/// Resolve `to` against `from` and return the resulting `href`
///
/// # Examples
///
/// ```
/// assert_eq!(rurl::resolve("http://example.com/a/b", "../c"), "http://example.com/c");
/// assert_eq!(rurl::resolve("http://example.com/a/b", "//other.org/"), "http://other.org/");
/// ```
pub fn resolve(from: &str, to: &str) -> String {
    Url::parse(to, Some(from)).href()
}
