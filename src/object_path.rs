//! Reading and writing nested query values by key path.
//!
//! Paths are the bracket decompositions produced by
//! [`parse_form_path`](crate::parse_form_path): `a[b][0]` is `["a", "b", "0"]`.
//! Mappings are `serde_json` objects, sequences are arrays. A numeric key
//! (or an empty key, meaning "append") addresses a sequence as long as the
//! index stays at or below [`MAX_ARRAY_INDEX`]; larger indices fall back to a
//! mapping so a single `a[99999]=x` can't allocate a huge array.

use serde_json::{Map, Value};
use tracing::debug;

/// Largest index that still builds a sequence
pub const MAX_ARRAY_INDEX: usize = 20;

/// Keys that are never written through [`set_path`] unless explicitly allowed.
/// Query strings end up in JavaScript consumers, where these would reach the
/// object prototype.
const UNSAFE_KEYS: [&str; 3] = ["__proto__", "constructor", "prototype"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayIndex {
    Append,
    At(usize),
}

/// Whether `key` may be written by [`set_path`] with unsafe keys disallowed
pub fn is_safe_key(key: &str) -> bool {
    !UNSAFE_KEYS.contains(&key)
}

/// Read the value at `keys`, or `None` as soon as a hop is missing or lands
/// on something that isn't a mapping or sequence.
///
/// # Examples
///
/// ```
/// use serde_json::json;
///
/// let value = json!({"a": {"b": ["x", "y"]}});
/// assert_eq!(rurl::path(&value, &["a", "b", "1"]), Some(&json!("y")));
/// assert_eq!(rurl::path(&value, &["a", "c", "1"]), None);
/// ```
pub fn path<'a, S: AsRef<str>>(value: &'a Value, keys: &[S]) -> Option<&'a Value> {
    keys.iter()
        .try_fold(value, |current, key| match current {
            Value::Object(map) => map.get(key.as_ref()),
            Value::Array(items) => key.as_ref().parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Assign `value` at `keys` inside `target`, creating intermediate
/// containers as needed.
///
/// With `skip_last` the final key is ignored and the value lands on its
/// parent path. Unless `allow_unsafe_keys` is set, a path containing any of
/// `__proto__`, `constructor` or `prototype` is dropped without touching
/// `target`. Returns whether the assignment happened.
pub fn set_path<S: AsRef<str>>(
    target: &mut Value,
    keys: &[S],
    value: Value,
    skip_last: bool,
    allow_unsafe_keys: bool,
) -> bool {
    let keys = if skip_last {
        &keys[..keys.len().saturating_sub(1)]
    } else {
        keys
    };

    if !allow_unsafe_keys {
        if let Some(key) = keys.iter().map(|key| key.as_ref()).find(|key| !is_safe_key(key)) {
            debug!(key, "dropping assignment through unsafe key");
            return false;
        }
    }

    let Some((last, parents)) = keys.split_last() else {
        *target = value;
        return true;
    };

    let mut current = target;
    for (depth, key) in parents.iter().enumerate() {
        current = child_container(current, key.as_ref(), keys[depth + 1].as_ref());
    }
    *slot_mut(current, last.as_ref()) = value;
    true
}

/// Flatten nested mappings and sequences into `(key, leaf)` pairs, joining
/// path segments with the `divider` pair: `{a: {b: "c"}}` with `("[", "]")`
/// becomes `a[b] = "c"`. Nulls and empty containers produce nothing.
pub fn flatten<'a>(value: &'a Value, divider: (&str, &str)) -> Vec<(String, &'a Value)> {
    let mut pairs = Vec::new();
    flatten_into(&mut pairs, None, value, divider);
    pairs
}

/// [`flatten`] for a mapping that isn't wrapped in a [`Value`]
pub fn flatten_map<'a>(map: &'a Map<String, Value>, divider: (&str, &str)) -> Vec<(String, &'a Value)> {
    let mut pairs = Vec::new();
    for (key, child) in map {
        flatten_into(&mut pairs, Some(key.clone()), child, divider);
    }
    pairs
}

/// `prefix` is `None` only at the top level, where keys take no divider
fn flatten_into<'a>(
    pairs: &mut Vec<(String, &'a Value)>,
    prefix: Option<String>,
    value: &'a Value,
    divider: (&str, &str),
) {
    let nest = |key: &str| match &prefix {
        Some(prefix) => format!("{prefix}{}{key}{}", divider.0, divider.1),
        None => key.to_owned(),
    };

    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(pairs, Some(nest(key)), child, divider);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(pairs, Some(nest(&index.to_string())), child, divider);
            }
        }
        leaf => pairs.push((prefix.unwrap_or_default(), leaf)),
    }
}

fn array_index(key: &str) -> Option<ArrayIndex> {
    if key.is_empty() {
        return Some(ArrayIndex::Append);
    }
    let index = key.parse::<usize>().ok()?;
    // "01" and "+1" stay mapping keys
    (index <= MAX_ARRAY_INDEX && index.to_string() == key).then_some(ArrayIndex::At(index))
}

fn empty_container_for(next_key: &str) -> Value {
    if array_index(next_key).is_some() {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

/// Descend into `key`, replacing whatever scalar sits there with a container
/// suited to `next_key`.
fn child_container<'a>(current: &'a mut Value, key: &str, next_key: &str) -> &'a mut Value {
    let slot = slot_mut(current, key);
    if !matches!(slot, Value::Object(_) | Value::Array(_)) {
        *slot = empty_container_for(next_key);
    }
    slot
}

fn slot_mut<'a>(current: &'a mut Value, key: &str) -> &'a mut Value {
    let index = array_index(key);
    if !(current.is_array() && index.is_some()) {
        into_object(current);
    }

    match (current, index) {
        (Value::Array(items), Some(index)) => {
            let position = match index {
                ArrayIndex::Append => items.len(),
                ArrayIndex::At(position) => position,
            };
            if items.len() <= position {
                items.resize(position + 1, Value::Null);
            }
            &mut items[position]
        }
        (Value::Object(map), _) => map.entry(key.to_owned()).or_insert(Value::Null),
        (other, _) => {
            *other = Value::Object(Map::new());
            slot_mut(other, key)
        }
    }
}

/// Turn `current` into a mapping, keeping sequence items under their index.
fn into_object(current: &mut Value) {
    match current {
        Value::Object(_) => {}
        Value::Array(items) => {
            let map = std::mem::take(items)
                .into_iter()
                .enumerate()
                .filter(|(_, item)| !item.is_null())
                .map(|(index, item)| (index.to_string(), item))
                .collect();
            *current = Value::Object(map);
        }
        _ => *current = Value::Object(Map::new()),
    }
}
