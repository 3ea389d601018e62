use std::borrow::Cow;

use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters a pathname may not carry literally: they would start the
/// search or hash on the next parse.
pub const PATHNAME_SET: &AsciiSet = &AsciiSet::EMPTY.add(b'#').add(b'?');

/// Userinfo percent-encode set
/// C0 control + the characters that would end or split the auth part
pub const USERINFO_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'|');

/// Query component set: everything except the URI-component unreserved marks,
/// with `@ : $ ,` additionally left readable.
pub const QUERY_COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'@')
    .remove(b':')
    .remove(b'$')
    .remove(b',');

/// Escape literal `#` and `?` in a pathname (zero-copy when neither occurs)
pub fn escape_pathname(input: &str) -> Cow<'_, str> {
    if memchr::memchr2(b'#', b'?', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::from(utf8_percent_encode(input, PATHNAME_SET))
}

/// Percent-encode for userinfo
pub fn percent_encode_userinfo(input: &str) -> String {
    utf8_percent_encode(input, USERINFO_SET).to_string()
}

/// Encode one query key or value. Spaces become `+` unless
/// `pct_encode_spaces` asks for `%20`.
pub fn encode_query_component(input: &str, pct_encode_spaces: bool) -> String {
    let mut buffer = String::with_capacity(input.len());
    for chunk in utf8_percent_encode(input, QUERY_COMPONENT_SET) {
        if chunk == "%20" && !pct_encode_spaces {
            buffer.push('+');
        } else {
            buffer.push_str(chunk);
        }
    }
    buffer
}

/// Strict percent-decoding: every `%` must start a valid `%XX` escape and
/// the decoded bytes must be UTF-8, otherwise `None`.
pub fn percent_decode_strict(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut pos = 0;
    while let Some(offset) = memchr::memchr(b'%', &bytes[pos..]) {
        let at = pos + offset;
        let escape = bytes.get(at + 1..at + 3)?;
        if !escape.iter().all(u8::is_ascii_hexdigit) {
            return None;
        }
        pos = at + 3;
    }

    percent_encoding::percent_decode_str(input)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}
