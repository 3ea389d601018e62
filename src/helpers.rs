use std::borrow::Cow;

use crate::character_sets::is_ascii_tab_or_newline;

/// Fast check if string contains tabs or newlines
pub fn has_tabs_or_newline(input: &str) -> bool {
    memchr::memchr3(b'\t', b'\n', b'\r', input.as_bytes()).is_some()
}

/// Trim leading/trailing C0 controls and spaces, and drop internal
/// tabs/newlines, in a single pass.
/// Returns a Cow to avoid allocation when possible.
pub fn clean_input(input: &str) -> Cow<'_, str> {
    let trimmed = input.trim_matches(|c: char| c <= ' ');
    if !has_tabs_or_newline(trimmed) {
        return Cow::Borrowed(trimmed);
    }

    Cow::Owned(
        trimmed
            .chars()
            .filter(|&c| !is_ascii_tab_or_newline(c))
            .collect(),
    )
}

/// Split `user:pass` on the first `:`
pub fn split_auth(auth: &str) -> (&str, &str) {
    auth.split_once(':').unwrap_or((auth, ""))
}

/// Split a trailing `:digits` port off `host`.
/// Colons inside an IPv6 literal never match since `]` isn't a digit.
pub fn split_port_suffix(host: &str) -> Option<(&str, &str)> {
    let (hostname, port) = host.rsplit_once(':')?;
    (!port.is_empty() && port.bytes().all(|b| b.is_ascii_digit())).then_some((hostname, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_input() {
        assert_eq!(clean_input("\t\nhello\r\n"), "hello");
        assert_eq!(clean_input("hello"), "hello");
        assert_eq!(clean_input("\t\n\r"), "");
        assert_eq!(clean_input("hel\tlo\nworld"), "helloworld");
        assert_eq!(clean_input("  foo.com  "), "foo.com");
        assert!(matches!(clean_input("  foo.com  "), Cow::Borrowed(_)));
    }

    #[test]
    fn test_split_auth() {
        assert_eq!(split_auth("user:pass"), ("user", "pass"));
        assert_eq!(split_auth("user:pa:ss"), ("user", "pa:ss"));
        assert_eq!(split_auth("user"), ("user", ""));
        assert_eq!(split_auth(":pass"), ("", "pass"));
    }

    #[test]
    fn test_split_port_suffix() {
        assert_eq!(split_port_suffix("example.com:8080"), Some(("example.com", "8080")));
        assert_eq!(split_port_suffix("[::1]:8080"), Some(("[::1]", "8080")));
        assert_eq!(split_port_suffix("[::1]"), None);
        assert_eq!(split_port_suffix("example.com:"), None);
        assert_eq!(split_port_suffix("example.com"), None);
    }
}
