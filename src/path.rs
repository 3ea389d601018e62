/// Resolve `to` against `from`, collapsing `.` and `..` segments.
///
/// An absolute `to` replaces `from` entirely; otherwise the last segment of
/// `from` (the "file name") is dropped and `to` is appended to what is left.
/// `must_end_absolute` defaults to whether either input is absolute. A
/// relative result keeps any `..` that climbs above its root.
///
/// # Examples
///
/// ```
/// use rurl::resolve_path;
///
/// assert_eq!(resolve_path("/foo/bar/baz", "../quux/baz", None), "/foo/quux/baz");
/// assert_eq!(resolve_path("foo/bar", "../../../baz", None), "../../baz");
/// ```
pub fn resolve_path(from: &str, to: &str, must_end_absolute: Option<bool>) -> String {
    let to_absolute = to.starts_with('/');
    let must_end_absolute = must_end_absolute.unwrap_or(from.starts_with('/') || to_absolute);

    let mut segments: Vec<&str> = if to_absolute {
        Vec::new()
    } else {
        let mut base: Vec<&str> = from.split('/').collect();
        base.pop();
        base
    };
    segments.extend(to.split('/'));

    let trailing_slash = segments
        .last()
        .is_some_and(|last| matches!(*last, "" | "." | ".."));

    // Walk backwards so every `..` eats the nearest real segment before it
    let mut up = 0usize;
    let mut index = segments.len();
    while index > 0 {
        index -= 1;
        match segments[index] {
            "." => {
                segments.remove(index);
            }
            ".." => {
                segments.remove(index);
                up += 1;
            }
            _ if up > 0 => {
                segments.remove(index);
                up -= 1;
            }
            _ => {}
        }
    }

    if !must_end_absolute {
        segments.splice(0..0, std::iter::repeat_n("..", up));
    }

    if must_end_absolute && segments.first().is_none_or(|first| !first.is_empty()) {
        segments.insert(0, "");
    }

    let mut resolved = segments.join("/");
    if trailing_slash && !resolved.ends_with('/') {
        resolved.push('/');
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling() {
        assert_eq!(resolve_path("/foo/bar/baz", "quux", None), "/foo/bar/quux");
    }

    #[test]
    fn test_parent() {
        assert_eq!(resolve_path("/foo/bar/baz", "../quux/baz", None), "/foo/quux/baz");
        assert_eq!(resolve_path("/foo/bar/baz", "../../a", None), "/a");
    }

    #[test]
    fn test_dot_to_root() {
        assert_eq!(resolve_path("/foo", ".", None), "/");
        assert_eq!(resolve_path("/foo/bar", ".", None), "/foo/");
        assert_eq!(resolve_path("/foo/bar", "..", None), "/");
    }

    #[test]
    fn test_relative_climbs_above_root() {
        assert_eq!(resolve_path("foo/bar", "../../../baz", None), "../../baz");
        assert_eq!(resolve_path("a/b", "c", None), "a/c");
    }

    #[test]
    fn test_absolute_target_replaces_base() {
        assert_eq!(resolve_path("/foo/bar", "/baz/./qux", None), "/baz/qux");
    }

    #[test]
    fn test_absolute_swallows_excess_parents() {
        assert_eq!(resolve_path("/a", "../../../b", None), "/b");
    }

    #[test]
    fn test_forced_absolute() {
        assert_eq!(resolve_path("a/b", "c", Some(true)), "/a/c");
        assert_eq!(resolve_path("/a/b", "c", Some(false)), "/a/c");
    }

    #[test]
    fn test_trailing_slash() {
        assert_eq!(resolve_path("/a/b", "c/", None), "/a/c/");
        assert_eq!(resolve_path("/a/b", "", None), "/a/");
        assert_eq!(resolve_path("/a/b/c", "d/..", None), "/a/b/");
    }
}
