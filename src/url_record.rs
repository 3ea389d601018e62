use std::cell::OnceCell;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::helpers::{split_auth, split_port_suffix};
use crate::parser::{AsAddress, UrlParts, extract_protocol, parse_input};
use crate::query::{QueryOptions, encode_map, parse_query};
use crate::scheme::requires_slashes;
use crate::types::{Component, SegmentIndex};
use crate::unicode::percent_encode::{escape_pathname, percent_encode_userinfo};
use crate::url_components::UrlComponents;

/// The search string and the query mapping. Whichever was written last is
/// authoritative; the other is derived from it on first read.
#[derive(Debug, Default)]
struct QuerySlot {
    /// Authoritative when `query` is `None`, otherwise a cache
    search: OnceCell<String>,
    query: Option<Map<String, Value>>,
    /// Cache of `search` decoded, only used while `query` is `None`
    decoded: OnceCell<Map<String, Value>>,
}

impl QuerySlot {
    fn from_search(search: String) -> Self {
        Self {
            search: OnceCell::from(search),
            ..Self::default()
        }
    }

    fn from_query(query: Map<String, Value>) -> Self {
        Self {
            query: Some(query),
            ..Self::default()
        }
    }

    fn search(&self) -> &str {
        self.search.get_or_init(|| {
            let encoded = self
                .query
                .as_ref()
                .map(|query| encode_map(query, &QueryOptions::default()))
                .unwrap_or_default();
            if encoded.is_empty() { encoded } else { format!("?{encoded}") }
        })
    }

    fn query(&self) -> &Map<String, Value> {
        match &self.query {
            Some(query) => query,
            None => self
                .decoded
                .get_or_init(|| parse_query(self.search(), &QueryOptions::default())),
        }
    }

    fn query_mut(&mut self) -> &mut Map<String, Value> {
        if self.query.is_none() {
            let decoded = self
                .decoded
                .take()
                .unwrap_or_else(|| parse_query(self.search(), &QueryOptions::default()));
            self.query = Some(decoded);
        }
        self.search = OnceCell::new();
        self.query.get_or_insert_with(Map::new)
    }

    /// Copy of the authoritative side only
    fn authoritative(&self) -> Self {
        match &self.query {
            Some(query) => Self::from_query(query.clone()),
            None => Self::from_search(self.search().to_owned()),
        }
    }
}

/// A mutable URL value.
///
/// Every component can be read and written on its own, and writes keep
/// the rest of the record consistent: setting `host` updates `hostname` and
/// `port`, a default port is dropped, and the derived views (`segments`,
/// `query`/`search`) are recomputed on the next read after their source
/// changes.
///
/// Parsing never fails. Input that doesn't look like a URL still produces a
/// record, with whatever didn't fit in the pathname; see
/// [`seems_valid`](Self::seems_valid).
///
/// # Examples
///
/// ```
/// use rurl::Url;
///
/// let mut url = Url::parse("https://example.com:443/docs/guide.html?v=2", None);
/// assert_eq!(url.host(), "example.com");
/// assert_eq!(url.segments(), ["docs", "guide.html"]);
///
/// url.set_port("8443");
/// url.query_mut().insert("lang".into(), "en".into());
/// assert_eq!(url.href(), "https://example.com:8443/docs/guide.html?v=2&lang=en");
/// ```
#[derive(Debug, Default)]
pub struct UrlRecord {
    pub(crate) components: UrlComponents,
    query: QuerySlot,
    /// Cache of `pathname` split on `/`
    segments: OnceCell<Vec<String>>,
    from_base: Vec<Component>,
}

impl UrlRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_components(components: UrlComponents, from_base: Vec<Component>) -> Self {
        Self {
            components,
            from_base,
            ..Self::default()
        }
    }

    /// Parse `address`, resolving it against `base` when it is relative.
    ///
    /// ```
    /// use rurl::Url;
    ///
    /// let url = Url::parse("../img/logo.png", Some("https://example.com/blog/post/"));
    /// assert_eq!(url.href(), "https://example.com/blog/img/logo.png");
    /// ```
    pub fn parse(address: &str, base: Option<&str>) -> Self {
        let base = base.map(|base| parse_input(base, None, true));
        parse_input(address, base.as_ref(), true)
    }

    /// Parse anything address-like (strings, records, URL-shaped JSON
    /// objects) against an already parsed base.
    pub fn parse_with<A: AsAddress + ?Sized>(address: &A, base: Option<&Self>) -> Self {
        parse_input(&address.to_address(), base, true)
    }

    /// Resolve `address` against this record
    pub fn resolve<A: AsAddress + ?Sized>(&self, address: &A) -> Self {
        Self::parse_with(address, Some(self))
    }

    /// The full serialization
    pub fn href(&self) -> String {
        let components = &self.components;
        let mut href = String::with_capacity(
            components.protocol.len() + components.host.len() + components.pathname.len() + 16,
        );
        href.push_str(&components.protocol);
        if components.has_slashes() {
            href.push_str("//");
        }
        let auth = components.auth();
        if !auth.is_empty() {
            href.push_str(&auth);
            href.push('@');
        }
        href.push_str(&components.host);
        href.push_str(self.pathname());
        href.push_str(self.search());
        href.push_str(&components.hash);
        href
    }

    /// Replace the whole record by parsing `href`
    pub fn set_href(&mut self, href: &str) {
        *self = parse_input(href, None, true);
    }

    /// The scheme with its trailing `:`, like `"https:"`
    pub fn protocol(&self) -> &str {
        &self.components.protocol
    }

    /// Change the scheme. A trailing `//` turns slashes on.
    ///
    /// When the new scheme disagrees with the current record about `//` and
    /// there is no host yet, the record is parsed again under the new scheme,
    /// so `sip:alice@example.com` switched to `https:` gains a real host.
    pub fn set_protocol(&mut self, protocol: &str) {
        let protocol = protocol.to_lowercase();
        let (scheme, embedded_slashes) = match protocol.strip_suffix("//") {
            Some(scheme) => (scheme, true),
            None => (protocol.as_str(), false),
        };
        let scheme = scheme.trim_end_matches(':');
        let protocol = if scheme.is_empty() { String::new() } else { format!("{scheme}:") };

        let previous = self.components.slashes;
        let wanted = if embedded_slashes {
            Some(true)
        } else {
            requires_slashes(&protocol)
        };

        self.components.protocol = protocol;
        if embedded_slashes {
            self.components.slashes = Some(true);
        }

        match wanted {
            Some(slashes) if Some(slashes) != previous && self.components.host.is_empty() => {
                self.reparse_with_slashes(slashes);
            }
            _ => self.components.fold_port(),
        }
    }

    fn reparse_with_slashes(&mut self, slashes: bool) {
        let address = format!(
            "{}{}{}{}{}",
            self.components.protocol,
            if slashes { "//" } else { "" },
            self.components.pathname,
            self.search(),
            self.components.hash,
        );
        debug!(address = %address, "scheme changed slash requirement, parsing again");
        let from_base = std::mem::take(&mut self.from_base);
        *self = parse_input(&address, None, true);
        self.from_base = from_base;
    }

    /// Whether `//` follows the scheme. `None` when the scheme is unknown
    /// and the address didn't say.
    pub fn slashes(&self) -> Option<bool> {
        self.components.slashes
    }

    pub fn set_slashes(&mut self, slashes: Option<bool>) {
        self.components.slashes = slashes;
        if self.components.has_slashes() {
            let pathname = std::mem::take(&mut self.components.pathname);
            self.set_pathname(&pathname);
        }
    }

    /// `username[:password]`
    pub fn auth(&self) -> String {
        self.components.auth()
    }

    /// Set both credentials from `username[:password]`
    pub fn set_auth(&mut self, auth: &str) {
        let (username, password) = split_auth(auth);
        self.set_username(username);
        self.set_password(password);
    }

    pub fn username(&self) -> &str {
        &self.components.username
    }

    pub fn set_username(&mut self, username: &str) {
        self.components.username = percent_encode_userinfo(username);
    }

    pub fn password(&self) -> &str {
        &self.components.password
    }

    pub fn set_password(&mut self, password: &str) {
        self.components.password = percent_encode_userinfo(password);
    }

    /// `hostname[:port]`
    pub fn host(&self) -> &str {
        &self.components.host
    }

    /// Set hostname and port together.
    ///
    /// An embedded `scheme://` prefix also sets the protocol and a bare `//`
    /// is skipped. Anything from the next `/` on is ignored. Only a trailing `:digits` counts as a
    /// port, so `[::1]:8080` splits into `[::1]` and `8080`.
    pub fn set_host(&mut self, host: &str) {
        let host = host.to_lowercase();
        let extracted = extract_protocol(&host);
        let host = if extracted.slashes {
            if !extracted.protocol.is_empty() {
                self.components.protocol = extracted.protocol;
            }
            self.components.slashes = Some(true);
            extracted.rest
        } else {
            host.as_str()
        };
        let host = host.split('/').next().unwrap_or_default();

        match split_port_suffix(host) {
            Some((hostname, port)) => {
                self.components.hostname = hostname.to_owned();
                self.components.port = port.to_owned();
            }
            None => {
                self.components.hostname = host.to_owned();
                self.components.port.clear();
            }
        }
        self.components.fold_port();
    }

    pub fn hostname(&self) -> &str {
        &self.components.hostname
    }

    pub fn set_hostname(&mut self, hostname: &str) {
        self.components.hostname = hostname.to_lowercase();
        self.components.rebuild_host();
    }

    /// The port, empty when absent or the scheme default
    pub fn port(&self) -> &str {
        &self.components.port
    }

    /// Set the port. A port the protocol doesn't need (its default, zero,
    /// or anything non-numeric) clears it.
    pub fn set_port(&mut self, port: &str) {
        self.components.port = port.trim().to_owned();
        self.components.fold_port();
    }

    /// The path, `/` when empty on an address with `//`
    pub fn pathname(&self) -> &str {
        if self.components.pathname.is_empty() && self.components.has_slashes() {
            "/"
        } else {
            &self.components.pathname
        }
    }

    /// Set the path. Literal `#` and `?` are escaped, and a leading `/` is
    /// added when the record has slashes.
    pub fn set_pathname(&mut self, pathname: &str) {
        let escaped = escape_pathname(pathname);
        self.components.pathname = if self.components.has_slashes() && !escaped.is_empty() && !escaped.starts_with('/') {
            format!("/{escaped}")
        } else {
            escaped.into_owned()
        };
        self.segments = OnceCell::new();
    }

    /// The non-empty `/`-separated pieces of the pathname
    pub fn segments(&self) -> &[String] {
        self.segments.get_or_init(|| {
            self.components
                .pathname
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned)
                .collect()
        })
    }

    /// Replace the pathname with `segments` joined by `/`. Empty segments are
    /// dropped and the rest are written as given.
    pub fn set_segments<I, S>(&mut self, segments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments
            .into_iter()
            .map(Into::<String>::into)
            .filter(|segment| !segment.is_empty())
            .collect();
        self.components.pathname = format!("/{}", segments.join("/"));
        self.segments = OnceCell::from(segments);
    }

    /// One segment by position
    ///
    /// ```
    /// use rurl::{SegmentIndex, Url};
    ///
    /// let url = Url::parse("http://example.com/a/b/c", None);
    /// assert_eq!(url.segment(SegmentIndex::First), Some("a"));
    /// assert_eq!(url.segment(SegmentIndex::Last), Some("c"));
    /// assert_eq!(url.segment(SegmentIndex::At(1)), Some("b"));
    /// assert_eq!(url.segment(2_usize), Some("c"));
    /// ```
    pub fn segment(&self, index: impl Into<SegmentIndex>) -> Option<&str> {
        let segments = self.segments();
        let position = index.into().position(segments.len())?;
        Some(&segments[position])
    }

    /// Replace one segment, or append `value` when nothing is at `index`
    pub fn set_segment(&mut self, index: impl Into<SegmentIndex>, value: &str) {
        let mut segments = self.segments().to_vec();
        match index.into().position(segments.len()) {
            Some(position) => segments[position] = value.to_owned(),
            None => segments.push(value.to_owned()),
        }
        self.set_segments(segments);
    }

    /// The text after the last `.` of the last segment
    pub fn extension(&self) -> Option<&str> {
        let last = self.segment(SegmentIndex::Last)?;
        last.rsplit_once('.').map(|(_, extension)| extension)
    }

    /// Replace the extension of the last segment. An empty `extension`
    /// removes it. Does nothing without segments.
    pub fn set_extension(&mut self, extension: &str) {
        let Some(last) = self.segment(SegmentIndex::Last) else {
            return;
        };
        let stem = last.rsplit_once('.').map_or(last, |(stem, _)| stem);
        let extension = extension.trim_start_matches('.');
        let renamed = if extension.is_empty() {
            stem.to_owned()
        } else {
            format!("{stem}.{extension}")
        };
        self.set_segment(SegmentIndex::Last, &renamed);
    }

    /// `?`-prefixed query string, or empty
    pub fn search(&self) -> &str {
        self.query.search()
    }

    /// Set the query string. A missing `?` is added, a lone `?` clears it and
    /// a literal `#` is escaped.
    pub fn set_search(&mut self, search: &str) {
        let search = search.strip_prefix('?').unwrap_or(search);
        let search = if search.is_empty() {
            String::new()
        } else {
            format!("?{}", search.replace('#', "%23"))
        };
        self.query = QuerySlot::from_search(search);
    }

    /// The query string decoded into a nested mapping
    pub fn query(&self) -> &Map<String, Value> {
        self.query.query()
    }

    pub fn set_query(&mut self, query: Map<String, Value>) {
        self.query = QuerySlot::from_query(query);
    }

    /// Mutable access to the query mapping; the search string follows it
    pub fn query_mut(&mut self) -> &mut Map<String, Value> {
        self.query.query_mut()
    }

    /// `#`-prefixed fragment, or empty
    pub fn hash(&self) -> &str {
        &self.components.hash
    }

    pub fn set_hash(&mut self, hash: &str) {
        self.components.hash = if hash.is_empty() || hash.starts_with('#') {
            hash.to_owned()
        } else {
            format!("#{hash}")
        };
    }

    /// Pathname and search
    pub fn path(&self) -> String {
        format!("{}{}", self.pathname(), self.search())
    }

    /// Pathname, search and hash, always starting with `/`
    pub fn resource(&self) -> String {
        let pathname = self.pathname();
        let slash = if pathname.starts_with('/') { "" } else { "/" };
        format!("{slash}{pathname}{}{}", self.search(), self.hash())
    }

    /// `protocol//host`, or `"null"` when there is no protocol or host, or
    /// for `file:`
    pub fn origin(&self) -> String {
        let components = &self.components;
        if components.protocol.is_empty() || components.protocol == "file:" || components.host.is_empty() {
            return "null".to_owned();
        }
        format!("{}//{}", components.protocol, components.host)
    }

    pub fn has_credentials(&self) -> bool {
        !self.components.username.is_empty() || !self.components.password.is_empty()
    }

    pub fn has_port(&self) -> bool {
        !self.components.port.is_empty()
    }

    pub fn has_search(&self) -> bool {
        !self.search().is_empty()
    }

    pub fn has_hash(&self) -> bool {
        !self.components.hash.is_empty()
    }

    /// Whether this record lives at or below `other`: same hostname, and
    /// `other`'s segments are a prefix of this record's
    pub fn is_descendant(&self, other: &Self) -> bool {
        self.hostname() == other.hostname() && self.segments().starts_with(other.segments())
    }

    /// Whether parsing copied `component` from the base record
    pub fn used_base_property(&self, component: Component) -> bool {
        self.from_base.contains(&component)
    }

    /// Components copied from the base record, in the order they were taken
    pub fn from_base(&self) -> &[Component] {
        &self.from_base
    }

    /// Whether the record has a host or protocol, or at least an absolute path
    pub fn seems_valid(&self) -> bool {
        !self.components.host.is_empty()
            || !self.components.protocol.is_empty()
            || self.components.pathname.starts_with('/')
    }

    /// Plain snapshot of the record
    pub fn to_json(&self) -> UrlJson {
        UrlJson {
            protocol: self.components.protocol.clone(),
            username: self.components.username.clone(),
            password: self.components.password.clone(),
            hostname: self.components.hostname.clone(),
            port: self.components.port.clone(),
            pathname: self.pathname().to_owned(),
            search: self.search().to_owned(),
            hash: self.components.hash.clone(),
            slashes: self.components.slashes,
            from_base: self.from_base.clone(),
        }
    }

    /// The dried form, `{"value": <to_json>}`
    pub fn to_dry(&self) -> Value {
        serde_json::json!({ "value": self.to_json() })
    }

    /// Rebuild a record from [`to_dry`](Self::to_dry) output, or from the
    /// inner `value` object alone.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDryValue`] when `dried` holds no object, and
    /// [`Error::Json`] when its fields have the wrong types.
    pub fn un_dry(dried: &Value) -> Result<Self> {
        let value = dried.get("value").unwrap_or(dried);
        if !value.is_object() {
            return Err(Error::InvalidDryValue(format!("expected an object, found {value}")));
        }
        let json = UrlJson::deserialize(value)?;
        Ok(Self::from(json))
    }
}

impl Clone for UrlRecord {
    /// Copies the authoritative fields; derived caches start empty
    fn clone(&self) -> Self {
        Self {
            components: self.components.clone(),
            query: self.query.authoritative(),
            segments: OnceCell::new(),
            from_base: self.from_base.clone(),
        }
    }
}

impl fmt::Display for UrlRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

impl FromStr for UrlRecord {
    type Err = Infallible;

    fn from_str(address: &str) -> core::result::Result<Self, Self::Err> {
        Ok(Self::parse(address, None))
    }
}

impl From<&str> for UrlRecord {
    fn from(address: &str) -> Self {
        Self::parse(address, None)
    }
}

impl PartialEq for UrlRecord {
    fn eq(&self, other: &Self) -> bool {
        self.href() == other.href()
    }
}

impl Eq for UrlRecord {}

impl AsAddress for UrlRecord {
    fn to_address(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Owned(self.href())
    }
}

/// Serialized form of a [`UrlRecord`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlJson {
    pub protocol: String,
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: String,
    pub pathname: String,
    pub search: String,
    pub hash: String,
    pub slashes: Option<bool>,
    pub from_base: Vec<Component>,
}

impl From<UrlJson> for UrlRecord {
    /// Parses the fields again, then restores `from_base`
    fn from(json: UrlJson) -> Self {
        let parts = UrlParts {
            protocol: json.protocol,
            slashes: json.slashes,
            username: json.username,
            password: json.password,
            hostname: json.hostname,
            port: json.port,
            pathname: json.pathname,
            search: json.search,
            hash: json.hash,
            ..UrlParts::default()
        };
        let mut record = Self::parse_with(&parts, None);
        record.from_base = json.from_base;
        record
    }
}

impl Serialize for UrlRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UrlRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        UrlJson::deserialize(deserializer).map(Self::from)
    }
}
