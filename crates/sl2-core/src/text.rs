//! UTF-16 text helpers for entry and character names.

use encoding_rs::UTF_16LE;

/// Decode UTF-16LE bytes, stopping at the first NUL code unit.
///
/// A trailing odd byte is ignored. Unpaired surrogates are replaced with U+FFFD.
pub fn decode_utf16_until_nul(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(2)
        .position(|unit| unit == [0, 0])
        .unwrap_or(bytes.len() / 2);
    let (decoded, _) = UTF_16LE.decode_without_bom_handling(&bytes[..units * 2]);
    decoded.into_owned()
}

/// Encode a character name the way it appears inside decrypted slot data.
///
/// For ASCII names this is the null-interleaved byte sequence (`H\0e\0r\0o\0`).
pub fn encode_utf16_le(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(|unit| unit.to_le_bytes()).collect()
}

/// Check whether a name only contains printable ASCII characters
pub fn is_printable_ascii(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii() && !c.is_ascii_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_stops_at_nul_unit() {
        let bytes = [b'A', 0, b'B', 0, 0, 0, b'C', 0];
        assert_eq!(decode_utf16_until_nul(&bytes), "AB");
    }

    #[test]
    fn test_decode_without_nul_uses_whole_field() {
        let bytes = encode_utf16_le("USER_DATA010");
        assert_eq!(bytes.len(), 24);
        assert_eq!(decode_utf16_until_nul(&bytes), "USER_DATA010");
    }

    #[test]
    fn test_decode_keeps_zero_high_byte_of_last_char() {
        // "AAA" followed by NUL: the pair at bytes 5..7 straddles two units
        let bytes = [0x41, 0, 0x41, 0, 0x41, 0, 0, 0];
        assert_eq!(decode_utf16_until_nul(&bytes), "AAA");
    }

    #[test]
    fn test_decode_non_ascii() {
        let bytes = encode_utf16_le("Ärger");
        assert_eq!(decode_utf16_until_nul(&bytes), "Ärger");
    }

    #[test]
    fn test_encode_ascii_is_null_interleaved() {
        assert_eq!(
            encode_utf16_le("Hero"),
            vec![b'H', 0, b'e', 0, b'r', 0, b'o', 0]
        );
    }

    #[test]
    fn test_is_printable_ascii() {
        assert!(is_printable_ascii("Solaire of Astora"));
        assert!(!is_printable_ascii("Ärger"));
        assert!(!is_printable_ascii("tab\there"));
    }
}
