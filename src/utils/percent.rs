//! Percent-escape decoding and encoding
//!
//! Values in an encoded locator carry bytes as `%XX` escapes. Decoding is a
//! two-cursor scan over an owned buffer: the write cursor trails the read
//! cursor, so the result is never longer than the input.
//!
//! A `%` without two following characters is kept as a literal `%`. Escapes
//! whose digits are not hex are either decoded with the legacy digit
//! arithmetic ([`decode`]) or rejected ([`decode_strict`]).

use crate::core::error::{MetaError, MetaResult};
use std::convert::Infallible;

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Decode percent-escapes, tolerating malformed digits
///
/// # Example
///
/// ```rust
/// use mediameta::utils::percent::decode;
///
/// assert_eq!(decode(b"hello%20world"), b"hello world");
/// assert_eq!(decode(b"100%"), b"100%");
/// ```
pub fn decode(input: &[u8]) -> Vec<u8> {
    let mut buf = input.to_vec();
    decode_in_place(&mut buf);
    buf
}

/// Decode percent-escapes, failing on non-hex digits after `%`
pub fn decode_strict(input: &[u8]) -> MetaResult<Vec<u8>> {
    let mut buf = input.to_vec();
    scan(&mut buf, |offset, _, _| Err(MetaError::MalformedEscape { offset }))?;
    Ok(buf)
}

/// Decode percent-escapes inside `buf`, shrinking it to the decoded length
pub fn decode_in_place(buf: &mut Vec<u8>) {
    let lenient = scan(buf, |offset, hi, lo| {
        tracing::trace!(offset, "lenient decode of malformed escape");
        let h = hex_digit(hi).unwrap_or_else(|| legacy_digit(hi));
        let l = hex_digit(lo).unwrap_or_else(|| legacy_digit(lo));
        Ok::<u8, Infallible>((h << 4) | l)
    });
    match lenient {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// Two-cursor decode; `malformed` resolves an escape whose digits are not hex
fn scan<E>(
    buf: &mut Vec<u8>,
    mut malformed: impl FnMut(usize, u8, u8) -> Result<u8, E>,
) -> Result<(), E> {
    let len = buf.len();
    let mut read = 0;
    let mut write = 0;

    while read < len {
        let byte = buf[read];
        if byte == b'%' && read + 2 < len {
            let (hi, lo) = (buf[read + 1], buf[read + 2]);
            let decoded = match (hex_digit(hi), hex_digit(lo)) {
                (Some(h), Some(l)) => (h << 4) | l,
                _ => malformed(read, hi, lo)?,
            };
            buf[write] = decoded;
            read += 3;
        } else {
            buf[write] = byte;
            read += 1;
        }
        write += 1;
    }

    buf.truncate(write);
    Ok(())
}

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Digit mapping used by older encoders for characters outside `0-9A-Fa-f`
fn legacy_digit(c: u8) -> u8 {
    let d = c.wrapping_sub(b'0');
    if d > 49 {
        d.wrapping_sub(39)
    } else if d > 9 {
        d.wrapping_sub(7)
    } else {
        d
    }
}

/// Percent-encode a property value
///
/// Every byte outside `A-Z a-z 0-9 - _ . ~` becomes an uppercase `%XX`.
pub fn encode(input: &[u8]) -> String {
    encode_with(input, is_unreserved)
}

/// Percent-encode a locator
///
/// Path punctuation stays literal; `?`, `%` and `#` are always escaped so
/// the result splits back at the right place.
pub fn encode_locator(input: &[u8]) -> String {
    encode_with(input, |b| is_unreserved(b) || b"/:@!$'()*+,;=&".contains(&b))
}

fn encode_with(input: &[u8], keep: impl Fn(u8) -> bool) -> String {
    let mut out = String::with_capacity(input.len());
    for &b in input {
        if keep(b) {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX_UPPER[usize::from(b >> 4)] as char);
            out.push(HEX_UPPER[usize::from(b & 0x0f)] as char);
        }
    }
    out
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        let input = b"rtmp://live.example.com/app/stream-01";
        assert_eq!(decode(input), input.to_vec());
    }

    #[test]
    fn test_every_byte_escape() {
        for x in 0..=255u8 {
            let escaped = format!("%{:02X}", x);
            assert_eq!(decode(escaped.as_bytes()), vec![x], "byte {}", x);
        }
    }

    #[test]
    fn test_lowercase_hex() {
        assert_eq!(decode(b"%af%0a%Fa"), vec![0xaf, 0x0a, 0xfa]);
    }

    #[test]
    fn test_truncated_escape_is_literal() {
        assert_eq!(decode(b"abc%"), b"abc%".to_vec());
        assert_eq!(decode(b"abc%4"), b"abc%4".to_vec());
        assert_eq!(decode(b"%"), b"%".to_vec());
        assert_eq!(decode_strict(b"50%").unwrap(), b"50%".to_vec());
    }

    #[test]
    fn test_escape_at_exact_end() {
        assert_eq!(decode(b"a%41"), b"aA".to_vec());
    }

    #[test]
    fn test_malformed_lenient() {
        // 'G' maps to 16 and 'z' to 35 through the legacy arithmetic
        assert_eq!(legacy_digit(b'G'), 16);
        assert_eq!(legacy_digit(b'z'), 35);
        let out = decode(b"x%zzy");
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], b'x');
        assert_eq!(out[2], b'y');
    }

    #[test]
    fn test_malformed_strict() {
        assert_eq!(
            decode_strict(b"ab%4G"),
            Err(MetaError::MalformedEscape { offset: 2 })
        );
        assert_eq!(decode_strict(b"%4a").unwrap(), vec![0x4a]);
    }

    #[test]
    fn test_in_place_shrinks() {
        let mut buf = b"a%20b%20c".to_vec();
        decode_in_place(&mut buf);
        assert_eq!(buf, b"a b c".to_vec());

        let mut buf = b"%G0-%".to_vec();
        decode_in_place(&mut buf);
        assert_eq!(buf, vec![0x00, b'-', b'%']);
    }

    #[test]
    fn test_encode_round_trip() {
        let value: Vec<u8> = (0..=255u8).collect();
        let encoded = encode(&value);
        assert!(!encoded.contains('&'));
        assert!(!encoded.contains('='));
        assert_eq!(decode(encoded.as_bytes()), value);
    }

    #[test]
    fn test_encode_locator_keeps_path() {
        assert_eq!(
            encode_locator(b"rtmp://host:1935/live/a b?x"),
            "rtmp://host:1935/live/a%20b%3Fx"
        );
    }
}
