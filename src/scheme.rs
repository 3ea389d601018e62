use crate::types::SchemeType;

/// Get the scheme type from a scheme string, with or without the trailing `:`.
/// Filters by length + first byte before the full comparison.
pub fn get_scheme_type(scheme: &str) -> SchemeType {
    let scheme = scheme.strip_suffix(':').unwrap_or(scheme);
    let bytes = scheme.as_bytes();

    match (bytes.len(), bytes.first()) {
        (2, Some(b'w')) if bytes == b"ws" => SchemeType::Ws,
        (3, Some(b'w')) if bytes == b"wss" => SchemeType::Wss,
        (3, Some(b'f')) if bytes == b"ftp" => SchemeType::Ftp,
        (3, Some(b's')) if bytes == b"sip" => SchemeType::Opaque,
        (3, Some(b't')) if bytes == b"tel" => SchemeType::Opaque,
        (3, Some(b'u')) if bytes == b"urn" => SchemeType::Opaque,
        (4, Some(b'h')) if bytes == b"http" => SchemeType::Http,
        (4, Some(b'f')) if bytes == b"file" => SchemeType::File,
        (4, Some(b's')) if bytes == b"sips" => SchemeType::Opaque,
        (4, Some(b'd')) if bytes == b"data" => SchemeType::Opaque,
        (4, Some(b'n')) if bytes == b"news" => SchemeType::Opaque,
        (5, Some(b'h')) if bytes == b"https" => SchemeType::Https,
        (6, Some(b'g')) if bytes == b"gopher" => SchemeType::Gopher,
        (6, Some(b'm')) if bytes == b"mailto" => SchemeType::Opaque,
        (10, Some(b'j')) if bytes == b"javascript" => SchemeType::Opaque,
        _ => SchemeType::Unknown,
    }
}

/// Whether `port` has to be kept for `protocol`.
///
/// Empty, non-numeric and zero ports are never required. A port equal to the
/// scheme's default is dropped, `file:` never keeps one, and any other scheme
/// keeps whatever non-zero port it was given.
///
/// # Examples
///
/// ```
/// use rurl::requires_port;
///
/// assert!(!requires_port("80", "http:"));
/// assert!(requires_port("8080", "http:"));
/// assert!(!requires_port("8080", "file:"));
/// assert!(requires_port("1234", "custom:"));
/// ```
pub fn requires_port(port: &str, protocol: &str) -> bool {
    let Some(port) = numeric_port(port) else {
        return false;
    };
    if port == 0 {
        return false;
    }

    let scheme = protocol.split(':').next().unwrap_or_default();
    let scheme_type = get_scheme_type(scheme);
    match scheme_type {
        SchemeType::File => false,
        _ => match scheme_type.default_port() {
            Some(default) => port != u64::from(default),
            None => true,
        },
    }
}

/// Whether `protocol` requires `//` after the scheme.
/// Returns `None` for schemes the table doesn't know about.
pub fn requires_slashes(protocol: &str) -> Option<bool> {
    get_scheme_type(protocol).slashes()
}

fn numeric_port(port: &str) -> Option<u64> {
    let port = port.trim();
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Overlong digit runs are still "some non-zero port"
    Some(port.parse::<u64>().unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_type() {
        assert_eq!(get_scheme_type("http"), SchemeType::Http);
        assert_eq!(get_scheme_type("https:"), SchemeType::Https);
        assert_eq!(get_scheme_type("gopher"), SchemeType::Gopher);
        assert_eq!(get_scheme_type("mailto:"), SchemeType::Opaque);
        assert_eq!(get_scheme_type("custom"), SchemeType::Unknown);
    }

    #[test]
    fn test_requires_port_defaults() {
        assert!(!requires_port("80", "http:"));
        assert!(!requires_port("80", "ws:"));
        assert!(!requires_port("443", "https:"));
        assert!(!requires_port("443", "wss:"));
        assert!(!requires_port("21", "ftp:"));
        assert!(!requires_port("70", "gopher:"));
        assert!(requires_port("81", "http:"));
        assert!(requires_port("80", "https:"));
    }

    #[test]
    fn test_requires_port_edge_cases() {
        assert!(!requires_port("", "http:"));
        assert!(!requires_port("0", "custom:"));
        assert!(!requires_port("abc", "http:"));
        assert!(!requires_port("22", "file:"));
        assert!(!requires_port("0080", "http:"));
        assert!(requires_port("22", "ssh:"));
        assert!(requires_port("22", ""));
    }

    #[test]
    fn test_requires_slashes() {
        assert_eq!(requires_slashes("http:"), Some(true));
        assert_eq!(requires_slashes("file"), Some(true));
        assert_eq!(requires_slashes("sip:"), Some(false));
        assert_eq!(requires_slashes("mailto:"), Some(false));
        assert_eq!(requires_slashes("custom:"), None);
        assert_eq!(requires_slashes(""), None);
    }
}
