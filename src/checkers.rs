use serde_json::Value;

use crate::parser::UrlParts;
use crate::url_record::UrlRecord;

/// Field names a URL-shaped object may carry
pub const FIELD_NAMES: [&str; 18] = [
    "protocol",
    "slashes",
    "auth",
    "username",
    "password",
    "host",
    "hostname",
    "port",
    "pathname",
    "search",
    "query",
    "hash",
    "href",
    "origin",
    "path",
    "resource",
    "segments",
    "from_base",
];

/// Values that may or may not describe a URL
pub trait MaybeUrl {
    fn is_url(&self) -> bool;
}

impl MaybeUrl for UrlRecord {
    fn is_url(&self) -> bool {
        true
    }
}

impl MaybeUrl for UrlParts {
    fn is_url(&self) -> bool {
        true
    }
}

impl MaybeUrl for str {
    /// Whether the text parses to something with a host, a protocol or an
    /// absolute path
    fn is_url(&self) -> bool {
        !self.is_empty() && UrlRecord::parse(self, None).seems_valid()
    }
}

impl MaybeUrl for String {
    fn is_url(&self) -> bool {
        self.as_str().is_url()
    }
}

impl MaybeUrl for Value {
    /// Strings are parsed; objects qualify when every key is a URL field name
    fn is_url(&self) -> bool {
        match self {
            Value::String(text) => text.is_url(),
            Value::Object(map) => !map.is_empty() && map.keys().all(|key| FIELD_NAMES.contains(&key.as_str())),
            _ => false,
        }
    }
}

#[cfg(feature = "url")]
impl MaybeUrl for url::Url {
    fn is_url(&self) -> bool {
        true
    }
}

impl<T: MaybeUrl + ?Sized> MaybeUrl for &T {
    fn is_url(&self) -> bool {
        (**self).is_url()
    }
}

/// Check whether `value` is, or looks like, a URL.
///
/// # Examples
///
/// ```
/// use rurl::{Url, is_url};
/// use serde_json::json;
///
/// assert!(is_url("https://example.com"));
/// assert!(is_url("/relative/but/absolute"));
/// assert!(!is_url("just words"));
/// assert!(is_url(&Url::new()));
/// assert!(is_url(&json!({"hostname": "example.com", "port": "80"})));
/// assert!(!is_url(&json!({"hostname": "example.com", "color": "red"})));
/// ```
pub fn is_url<T: MaybeUrl + ?Sized>(value: &T) -> bool {
    value.is_url()
}
