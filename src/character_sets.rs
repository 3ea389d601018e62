/// Check if a character is an ASCII tab or newline
pub fn is_ascii_tab_or_newline(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
}

/// Check if a byte may follow the first letter of a scheme (`a-z0-9.+-`)
pub fn is_scheme_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'+' | b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_bytes() {
        for b in b"abcXYZ019.+-" {
            assert!(is_scheme_byte(*b));
        }
        for b in b":/?#@ _" {
            assert!(!is_scheme_byte(*b));
        }
    }
}
