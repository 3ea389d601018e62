#![allow(clippy::unwrap_used, clippy::panic, clippy::expect_used)]

/// Relative resolution tests: path resolution vectors, base inheritance
/// and the components recorded as taken from the base
use rurl::{Component, Url, resolve, resolve_path};
use serde_json::json;

fn parse(input: &str, base: Option<&str>) -> Url {
    Url::parse(input, base)
}

#[test]
fn test_resolve_path_vectors() {
    let cases = [
        ("/foo/bar/baz", "quux", "/foo/bar/quux"),
        ("/foo/bar/baz", "../quux/baz", "/foo/quux/baz"),
        ("/foo/bar/baz", "/bar", "/bar"),
        ("/foo/bar/baz/", "quux", "/foo/bar/baz/quux"),
        ("/foo", ".", "/"),
        ("/foo", "..", "/"),
        ("foo/bar", "../../../baz", "../../baz"),
        ("foo/bar/", "../../../baz", "../baz"),
        ("/a/b/c/d", "../../../../../g", "/g"),
        ("/a/b/c", "./g/", "/a/b/g/"),
    ];
    for (from, to, expected) in cases {
        assert_eq!(resolve_path(from, to, None), expected, "resolve_path({from:?}, {to:?})");
    }
}

#[test]
fn test_inherited_port() {
    let url = parse("/foo", Some("http://sub.example.com:808/"));
    assert_eq!(url.href(), "http://sub.example.com:808/foo");
    assert_eq!(url.port(), "808");
    assert!(url.used_base_property(Component::Port));
}

#[test]
fn test_base_never_donates_query_or_hash() {
    let url = parse("other", Some("http://example.com/dir/page?x=1#top"));
    assert_eq!(url.href(), "http://example.com/dir/other");
}

#[test]
fn test_query_only_reference() {
    let url = parse("?y=2", Some("http://example.com/dir/page"));
    assert_eq!(url.pathname(), "/dir/");
    assert_eq!(url.search(), "?y=2");
}

#[test]
fn test_hash_only_reference() {
    let url = parse("#part", Some("http://example.com/dir/page"));
    assert_eq!(url.hash(), "#part");
    assert_eq!(url.hostname(), "example.com");
}

#[test]
fn test_absolute_reference_ignores_base() {
    let url = parse("https://other.org/x", Some("http://example.com:8080/a"));
    assert_eq!(url.href(), "https://other.org/x");
    assert!(url.from_base().is_empty());
}

#[test]
fn test_protocol_relative_reference() {
    let url = parse("//cdn.example.net/lib.js", Some("https://example.com:8443/"));
    assert_eq!(url.href(), "https://cdn.example.net/lib.js");
    assert_eq!(url.from_base(), [Component::Protocol]);
    assert!(!url.used_base_property(Component::Port));
}

#[test]
fn test_dot_segments_against_base() {
    assert_eq!(resolve("http://a/b/c/d;p?q", "g"), "http://a/b/c/g");
    assert_eq!(resolve("http://a/b/c/d;p?q", "./g"), "http://a/b/c/g");
    assert_eq!(resolve("http://a/b/c/d;p?q", "g/"), "http://a/b/c/g/");
    assert_eq!(resolve("http://a/b/c/d;p?q", "/g"), "http://a/g");
    assert_eq!(resolve("http://a/b/c/d;p?q", ".."), "http://a/b/");
    assert_eq!(resolve("http://a/b/c/d;p?q", "../g"), "http://a/b/g");
    assert_eq!(resolve("http://a/b/c/d;p?q", "../.."), "http://a/");
    assert_eq!(resolve("http://a/b/c/d;p?q", "../../../g"), "http://a/g");
}

#[test]
fn test_resolve_against_record() {
    let base = parse("https://example.com/docs/v1/index.html", None);
    let next = base.resolve("../v2/");
    assert_eq!(next.href(), "https://example.com/docs/v2/");
    assert!(next.is_descendant(&parse("https://example.com/docs", None)));
    assert!(!next.is_descendant(&parse("https://example.com/blog", None)));
    assert!(!next.is_descendant(&parse("https://other.com/docs", None)));
}

#[test]
fn test_parse_with_objects() {
    let base = parse("https://example.com/app/", None);
    let legacy = json!({"pathname": "settings", "query": {"tab": "profile"}});
    let url = Url::parse_with(&legacy, Some(&base));
    assert_eq!(url.href(), "https://example.com/app/settings?tab=profile");

    let other = parse("http://mirror.example.org/x", None);
    assert_eq!(Url::parse_with(&other, Some(&base)), other);
}

#[test]
fn test_relative_must_end_absolute() {
    let url = parse("a/b", Some("http://example.com"));
    assert_eq!(url.pathname(), "/a/b");
}

#[cfg(feature = "url")]
#[test]
fn test_url_crate_interop() {
    let other = url::Url::parse("https://Example.com:443/a/b?c=1#d").unwrap();
    assert!(rurl::is_url(&other));

    let base = parse("http://mirror.example.org/x/", None);
    let url = Url::parse_with(&other, Some(&base));
    assert_eq!(url.href(), "https://example.com/a/b?c=1#d");
    assert!(url.from_base().is_empty());

    let relative = url::Url::parse("https://example.com/a/b").unwrap();
    assert_eq!(base.resolve(&relative).hostname(), "example.com");
}
