//! Rendering of opaque byte payloads for logs and alarms.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Truncates `s` to at most `max_bytes`, backing off to a char boundary.
#[must_use]
pub fn cut_string(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Renders a payload for logging, bounded to `max_bytes` of output.
///
/// UTF-8 payloads are shown as text. Anything else is shown as
/// `base64:<encoded>`.
#[must_use]
pub fn describe_payload(bytes: &[u8], max_bytes: usize) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => cut_string(text, max_bytes).to_string(),
        Err(_) => {
            let encoded = format!("base64:{}", STANDARD.encode(bytes));
            cut_string(&encoded, max_bytes).to_string()
        }
    }
}

/// Hex SHA-256 of a payload, used to correlate alarms with stored bytes.
#[must_use]
pub fn payload_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cut_string_short_input_untouched() {
        assert_eq!(cut_string("offset", 1024), "offset");
    }

    #[test]
    fn test_cut_string_truncates() {
        assert_eq!(cut_string("abcdef", 3), "abc");
        assert_eq!(cut_string("abc", 0), "");
    }

    #[test]
    fn test_cut_string_respects_char_boundary() {
        // "é" is two bytes
        assert_eq!(cut_string("aé", 2), "a");
        assert_eq!(cut_string("aé", 3), "aé");
    }

    #[test]
    fn test_describe_payload_text() {
        assert_eq!(describe_payload(b"{\"offset\":1", 1024), "{\"offset\":1");
        assert_eq!(describe_payload(b"0123456789", 4), "0123");
    }

    #[test]
    fn test_describe_payload_binary() {
        let described = describe_payload(&[0xff, 0xfe, 0x00], 1024);
        assert_eq!(described, "base64://4A");
    }

    #[test]
    fn test_payload_digest() {
        assert_eq!(
            payload_digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
