use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::query::{QueryOptions, encode_map};
use crate::scheme::requires_slashes;

/// Anything that can be turned into an address string for parsing.
///
/// Strings are taken as they are, URL records give their `href`, and
/// URL-shaped objects are assembled from their parts.
pub trait AsAddress {
    fn to_address(&self) -> Cow<'_, str>;
}

impl AsAddress for str {
    fn to_address(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl AsAddress for String {
    fn to_address(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl<T: AsAddress + ?Sized> AsAddress for &T {
    fn to_address(&self) -> Cow<'_, str> {
        (**self).to_address()
    }
}

impl AsAddress for UrlParts {
    fn to_address(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }
}

impl AsAddress for Value {
    fn to_address(&self) -> Cow<'_, str> {
        match self {
            Value::String(text) => Cow::Borrowed(text),
            Value::Object(map) => Cow::Owned(
                ADAPTERS
                    .iter()
                    .find_map(|adapter| adapter(map))
                    .unwrap_or_default(),
            ),
            Value::Null => Cow::Borrowed(""),
            other => Cow::Owned(other.to_string()),
        }
    }
}

#[cfg(feature = "url")]
impl AsAddress for url::Url {
    fn to_address(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

/// Loose URL parts, as found in records produced by other URL libraries.
///
/// Displays as an address string, filling in the separators each part
/// needs: `protocol` gains its `:`, `search` its `?` and `hash` its `#`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlParts {
    pub protocol: String,
    /// `None` writes `//` whenever there is a host or the protocol requires it
    pub slashes: Option<bool>,
    pub username: String,
    pub password: String,
    /// Takes precedence over `hostname` and `port`
    pub host: String,
    pub hostname: String,
    pub port: String,
    pub pathname: String,
    pub search: String,
    pub hash: String,
}

impl UrlParts {
    fn has_host(&self) -> bool {
        !self.host.is_empty() || !self.hostname.is_empty()
    }

    fn writes_slashes(&self) -> bool {
        self.slashes
            .unwrap_or_else(|| self.has_host() || requires_slashes(&self.protocol) == Some(true))
    }
}

impl fmt::Display for UrlParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.protocol.is_empty() {
            f.write_str(&self.protocol)?;
            if !self.protocol.ends_with(':') {
                f.write_str(":")?;
            }
        }
        if self.writes_slashes() {
            f.write_str("//")?;
        }

        if !self.username.is_empty() || !self.password.is_empty() {
            f.write_str(&self.username)?;
            if !self.password.is_empty() {
                write!(f, ":{}", self.password)?;
            }
            f.write_str("@")?;
        }

        if self.host.is_empty() {
            f.write_str(&self.hostname)?;
            if !self.port.is_empty() {
                write!(f, ":{}", self.port)?;
            }
        } else {
            f.write_str(&self.host)?;
        }

        if self.has_host() && !self.pathname.is_empty() && !self.pathname.starts_with('/') {
            f.write_str("/")?;
        }
        f.write_str(&self.pathname)?;

        if !self.search.is_empty() {
            if !self.search.starts_with('?') {
                f.write_str("?")?;
            }
            f.write_str(&self.search)?;
        }
        if !self.hash.is_empty() {
            if !self.hash.starts_with('#') {
                f.write_str("#")?;
            }
            f.write_str(&self.hash)?;
        }
        Ok(())
    }
}

type Adapter = fn(&Map<String, Value>) -> Option<String>;

/// Object shapes, most specific first. The last one accepts any object.
const ADAPTERS: [Adapter; 3] = [href_shape, uri_shape, record_shape];

/// `{href}`, as serialized URL records and WHATWG URL objects carry
fn href_shape(map: &Map<String, Value>) -> Option<String> {
    map.get("href").and_then(Value::as_str).map(str::to_owned)
}

/// `{scheme, userinfo|user, password, host, port, path, query, fragment}`
fn uri_shape(map: &Map<String, Value>) -> Option<String> {
    let scheme = text(map, "scheme")?;
    let (username, password) = match text(map, "userinfo") {
        Some(userinfo) => match userinfo.split_once(':') {
            Some((user, pass)) => (user.to_owned(), pass.to_owned()),
            None => (userinfo, String::new()),
        },
        None => (
            text(map, "user").unwrap_or_default(),
            text(map, "password").unwrap_or_default(),
        ),
    };

    let parts = UrlParts {
        protocol: scheme,
        username,
        password,
        hostname: text(map, "host").unwrap_or_default(),
        port: text(map, "port").unwrap_or_default(),
        pathname: text(map, "path").unwrap_or_default(),
        search: query_text(map, "query"),
        hash: text(map, "fragment").unwrap_or_default(),
        ..UrlParts::default()
    };
    Some(parts.to_string())
}

/// `{protocol, slashes, auth|username+password, host|hostname+port,
/// pathname|path, search|query, hash}`, the shape of legacy parsed-URL records
fn record_shape(map: &Map<String, Value>) -> Option<String> {
    let (username, password) = match text(map, "auth") {
        Some(auth) => match auth.split_once(':') {
            Some((user, pass)) => (user.to_owned(), pass.to_owned()),
            None => (auth, String::new()),
        },
        None => (
            text(map, "username").unwrap_or_default(),
            text(map, "password").unwrap_or_default(),
        ),
    };

    let search = match map.get("search") {
        Some(Value::String(search)) if !search.is_empty() => search.clone(),
        _ => query_text(map, "query"),
    };

    let parts = UrlParts {
        protocol: text(map, "protocol").unwrap_or_default(),
        slashes: map.get("slashes").and_then(Value::as_bool),
        username,
        password,
        host: text(map, "host").unwrap_or_default(),
        hostname: text(map, "hostname").unwrap_or_default(),
        port: text(map, "port").unwrap_or_default(),
        pathname: text(map, "pathname")
            .or_else(|| text(map, "path"))
            .unwrap_or_default(),
        search,
        hash: text(map, "hash").unwrap_or_default(),
    };
    Some(parts.to_string())
}

/// A string or number field as text; anything else counts as missing
fn text(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// A query given either as text or as an already-parsed mapping
fn query_text(map: &Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::Object(query)) => encode_map(query, &QueryOptions::default()),
        _ => text(map, key).unwrap_or_default(),
    }
}
