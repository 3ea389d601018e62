use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::object_path::{flatten, flatten_map, set_path};
use crate::unicode::percent_encode::{encode_query_component, percent_decode_strict};

/// Query codec configuration.
///
/// Deserializable so it can live in a caller's config file; the `decoder`
/// can only be set from code.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    /// Separator between pairs, used both when parsing and when encoding
    pub delimiter: String,
    /// Separator between key and value when encoding
    pub assignment: String,
    /// Pieces past this count are ignored when parsing
    pub parameter_limit: usize,
    /// Bracket groups honoured per key; deeper groups fold into one literal segment
    pub depth: usize,
    /// Value given to a key that has no `=`
    pub empty_value: String,
    /// Encode spaces as `%20` instead of `+`
    pub pct_encode_spaces: bool,
    #[serde(skip)]
    pub decoder: fn(&str) -> String,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            delimiter: "&".to_owned(),
            assignment: "=".to_owned(),
            parameter_limit: 1000,
            depth: 5,
            empty_value: String::new(),
            pct_encode_spaces: false,
            decoder: decode_uri_segment,
        }
    }
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: &str) -> Self {
        self.delimiter = delimiter.to_owned();
        self
    }

    #[must_use]
    pub fn with_assignment(mut self, assignment: &str) -> Self {
        self.assignment = assignment.to_owned();
        self
    }

    #[must_use]
    pub fn with_parameter_limit(mut self, limit: usize) -> Self {
        self.parameter_limit = limit;
        self
    }

    #[must_use]
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    #[must_use]
    pub fn with_empty_value(mut self, value: &str) -> Self {
        self.empty_value = value.to_owned();
        self
    }

    #[must_use]
    pub fn with_pct_encode_spaces(mut self, enabled: bool) -> Self {
        self.pct_encode_spaces = enabled;
        self
    }

    #[must_use]
    pub fn with_decoder(mut self, decoder: fn(&str) -> String) -> Self {
        self.decoder = decoder;
        self
    }

    fn delimiter(&self) -> &str {
        if self.delimiter.is_empty() { "&" } else { &self.delimiter }
    }
}

/// Percent-decode one query component, reading `+` as a space.
/// Malformed escapes or invalid UTF-8 give back the input untouched.
///
/// # Examples
///
/// ```
/// use rurl::decode_uri_segment;
///
/// assert_eq!(decode_uri_segment("a+b%20c"), "a b c");
/// assert_eq!(decode_uri_segment("100%"), "100%");
/// ```
pub fn decode_uri_segment(input: &str) -> String {
    if memchr::memchr2(b'%', b'+', input.as_bytes()).is_none() {
        return input.to_owned();
    }

    let spaced = input.replace('+', " ");
    percent_decode_strict(&spaced).unwrap_or_else(|| {
        debug!(input, "malformed percent-encoding, keeping raw text");
        input.to_owned()
    })
}

/// Split a query string into decoded `(key, value)` pairs, in order.
///
/// A leading `?` is ignored, empty pieces are skipped, and nothing past
/// `parameter_limit` pieces is read. The key ends at `]=` when present so a
/// `=` inside brackets stays part of the key.
pub fn parse_query_values(input: &str, options: &QueryOptions) -> Vec<(String, String)> {
    let input = input.strip_prefix('?').unwrap_or(input);
    if input.is_empty() {
        return Vec::new();
    }

    let mut pairs = Vec::new();
    for (count, piece) in input.split(options.delimiter()).enumerate() {
        if count >= options.parameter_limit {
            debug!(limit = options.parameter_limit, "query parameter limit reached");
            break;
        }
        if piece.is_empty() {
            continue;
        }

        let split_at = piece.find("]=").map(|pos| pos + 1).or_else(|| piece.find('='));
        let pair = match split_at {
            Some(pos) => (
                (options.decoder)(&piece[..pos]),
                (options.decoder)(&piece[pos + 1..]),
            ),
            None => ((options.decoder)(piece), options.empty_value.clone()),
        };
        pairs.push(pair);
    }
    pairs
}

/// Decompose a bracketed key into its path: `a[b][c]` is `["a", "b", "c"]`.
///
/// The root is everything before the first `[...]` group. Each later group
/// becomes a segment and text between groups is dropped. `limit` caps how
/// many groups are split off; everything from the first group past the
/// limit becomes one literal trailing segment. A key without a closed group
/// is returned whole.
///
/// # Examples
///
/// ```
/// use rurl::parse_form_path;
///
/// assert_eq!(parse_form_path("a[b][c]", None), ["a", "b", "c"]);
/// assert_eq!(parse_form_path("a[b]x[c]", None), ["a", "b", "c"]);
/// assert_eq!(parse_form_path("a[b][c]", Some(1)), ["a", "b", "[c]"]);
/// ```
pub fn parse_form_path(input: &str, limit: Option<usize>) -> Vec<String> {
    let mut next = next_group(input, 0);
    let root_end = next.map_or(input.len(), |(open, _)| open);
    let mut path = Vec::new();
    if root_end > 0 {
        path.push(input[..root_end].to_owned());
    }

    let mut groups = 0;
    while let Some((open, close)) = next {
        if limit.is_some_and(|limit| groups >= limit) {
            path.push(input[open..].to_owned());
            break;
        }
        path.push(input[open + 1..close].to_owned());
        groups += 1;
        next = next_group(input, close + 1);
    }
    path
}

/// Bounds of the next `[...]` group at or after `from` that has no `[` or
/// `]` inside it, as the indices of its brackets.
fn next_group(input: &str, from: usize) -> Option<(usize, usize)> {
    let bytes = input.as_bytes();
    let mut start = from;
    loop {
        let open = start + memchr::memchr(b'[', bytes.get(start..)?)?;
        let offset = memchr::memchr2(b'[', b']', &bytes[open + 1..])?;
        let end = open + 1 + offset;
        if bytes[end] == b']' {
            return Some((open, end));
        }
        start = end;
    }
}

/// Parse a query string into a nested mapping, honouring bracket notation.
///
/// Each key is decomposed with [`parse_form_path`] (up to `options.depth`
/// groups) and assigned with [`set_path`](crate::set_path). Assignments
/// through `__proto__`, `constructor` or `prototype` are dropped.
///
/// # Examples
///
/// ```
/// use rurl::{QueryOptions, parse_query};
/// use serde_json::json;
///
/// let query = parse_query("a[b][]=c&a[b][]=d&e=f", &QueryOptions::default());
/// assert_eq!(serde_json::Value::Object(query), json!({"a": {"b": ["c", "d"]}, "e": "f"}));
/// ```
pub fn parse_query(input: &str, options: &QueryOptions) -> Map<String, Value> {
    let mut result = Value::Object(Map::new());
    for (key, value) in parse_query_values(input, options) {
        let path = parse_form_path(&key, Some(options.depth));
        if path.is_empty() {
            continue;
        }
        set_path(&mut result, &path, Value::String(value), false, false);
    }

    match result {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Encode a mapping or sequence as a query string (without a leading `?`).
///
/// Nested values are flattened into bracketed keys, `{a: {b: "c"}}` becomes
/// `a%5Bb%5D=c`. Nulls and empty containers are left out.
///
/// # Errors
///
/// [`Error::UnsupportedQueryShape`] when `value` is neither an object nor an
/// array.
pub fn encode_query(value: &Value, options: &QueryOptions) -> Result<String> {
    let found = match value {
        Value::Object(_) | Value::Array(_) => {
            return Ok(join_pairs(flatten(value, ("[", "]")), options));
        }
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
    };
    Err(Error::UnsupportedQueryShape { found })
}

/// Infallible form of [`encode_query`] for a mapping.
pub(crate) fn encode_map(map: &Map<String, Value>, options: &QueryOptions) -> String {
    join_pairs(flatten_map(map, ("[", "]")), options)
}

fn join_pairs(pairs: Vec<(String, &Value)>, options: &QueryOptions) -> String {
    let mut buffer = String::new();
    for (key, leaf) in pairs {
        let text = match leaf {
            Value::String(text) => encode_query_component(text, options.pct_encode_spaces),
            other => encode_query_component(&other.to_string(), options.pct_encode_spaces),
        };
        if !buffer.is_empty() {
            buffer.push_str(options.delimiter());
        }
        buffer.push_str(&encode_query_component(&key, options.pct_encode_spaces));
        buffer.push_str(&options.assignment);
        buffer.push_str(&text);
    }
    buffer
}
