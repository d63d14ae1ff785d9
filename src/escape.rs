//! Format-specific string emission.
//!
//! JSON strings escape `"`, `\`, `\n`, `\r`, `\t`, `\f` and `\b` to their
//! two-character forms and every other character outside printable ASCII
//! (32..=126) to `\u` plus four uppercase hex digits. Characters beyond the
//! Basic Multilingual Plane are written unescaped. Strings with nothing to
//! escape are written as a single span.
//!
//! JSV strings are written raw unless they contain a structural character,
//! in which case they are wrapped in `"` with inner quotes doubled.

use crate::format::{Format, QUOTE};
use std::fmt::{self, Write};

const JSV_ESCAPE_CHARS: [char; 9] = ['"', ',', ':', '{', '}', '[', ']', '\r', '\n'];

#[inline]
fn needs_json_escape(ch: char) -> bool {
    match ch {
        '"' | '\\' => true,
        ' '..='~' => false,
        _ => (ch as u32) <= 0xFFFF,
    }
}

/// Returns `true` if any character of `s` must be escaped in a JSON string.
#[inline]
#[must_use]
pub fn has_any_escape_chars(s: &str) -> bool {
    s.chars().any(needs_json_escape)
}

/// Writes `s` as a quoted JSON string.
///
/// # Examples
///
/// ```rust
/// let mut out = String::new();
/// typetext::escape::write_json_string(&mut out, "he said \"hi\"\n").unwrap();
/// assert_eq!(out, r#""he said \"hi\"\n""#);
/// ```
pub fn write_json_string(out: &mut dyn Write, s: &str) -> fmt::Result {
    write_json_string_with(out, s, true)
}

/// Writes `s` as JSON string content, optionally without the surrounding quotes.
pub fn write_json_string_with(out: &mut dyn Write, s: &str, quoted: bool) -> fmt::Result {
    if quoted {
        out.write_char(QUOTE)?;
    }
    if has_any_escape_chars(s) {
        let mut start = 0;
        for (i, ch) in s.char_indices() {
            if !needs_json_escape(ch) {
                continue;
            }
            out.write_str(&s[start..i])?;
            match ch {
                '"' => out.write_str("\\\"")?,
                '\\' => out.write_str("\\\\")?,
                '\n' => out.write_str("\\n")?,
                '\r' => out.write_str("\\r")?,
                '\t' => out.write_str("\\t")?,
                '\u{000C}' => out.write_str("\\f")?,
                '\u{0008}' => out.write_str("\\b")?,
                _ => write!(out, "\\u{:04X}", ch as u32)?,
            }
            start = i + ch.len_utf8();
        }
        out.write_str(&s[start..])?;
    } else {
        out.write_str(s)?;
    }
    if quoted {
        out.write_char(QUOTE)?;
    }
    Ok(())
}

/// Returns `true` if `s` must be quoted to survive as a JSV value.
#[inline]
#[must_use]
pub fn needs_jsv_quotes(s: &str) -> bool {
    s.contains(JSV_ESCAPE_CHARS) || s.starts_with(' ') || s.ends_with(' ')
}

/// Writes `s` as a JSV value. Empty strings produce no output.
///
/// # Examples
///
/// ```rust
/// let mut out = String::new();
/// typetext::escape::write_jsv_string(&mut out, "a,\"b\"").unwrap();
/// assert_eq!(out, r#""a,""b""""#);
/// ```
pub fn write_jsv_string(out: &mut dyn Write, s: &str) -> fmt::Result {
    if !needs_jsv_quotes(s) {
        return out.write_str(s);
    }
    out.write_char(QUOTE)?;
    let mut parts = s.split(QUOTE);
    if let Some(first) = parts.next() {
        out.write_str(first)?;
    }
    for part in parts {
        out.write_str("\"\"")?;
        out.write_str(part)?;
    }
    out.write_char(QUOTE)
}

/// Writes a string value in the given format.
pub fn write_string(out: &mut dyn Write, s: &str, format: Format) -> fmt::Result {
    match format {
        Format::Json => write_json_string(out, s),
        Format::Jsv => write_jsv_string(out, s),
    }
}

/// Writes canonical text that JSV carries unquoted, such as dates and identifiers.
pub fn write_canonical(out: &mut dyn Write, s: &str, format: Format) -> fmt::Result {
    match format {
        Format::Json => write_json_string(out, s),
        Format::Jsv => out.write_str(s),
    }
}

/// Writes a member or discriminator name followed by nothing else.
pub fn write_property_name(out: &mut dyn Write, name: &str, format: Format) -> fmt::Result {
    match format {
        Format::Json => write_json_string(out, name),
        Format::Jsv => write_jsv_string(out, name),
    }
}

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Percent-encodes `s` for a URL query component. Spaces become `+`.
///
/// # Examples
///
/// ```rust
/// assert_eq!(typetext::escape::url_encode("a b&c"), "a+b%26c");
/// ```
#[must_use]
pub fn url_encode(s: &str) -> String {
    let mut encoded = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            b' ' => encoded.push('+'),
            _ => {
                encoded.push('%');
                encoded.push(char::from(HEX_UPPER[usize::from(byte >> 4)]));
                encoded.push(char::from(HEX_UPPER[usize::from(byte & 0x0F)]));
            }
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(s: &str) -> String {
        let mut out = String::new();
        write_json_string(&mut out, s).unwrap();
        out
    }

    fn jsv(s: &str) -> String {
        let mut out = String::new();
        write_jsv_string(&mut out, s).unwrap();
        out
    }

    #[test]
    fn test_fast_path_is_single_span() {
        assert!(!has_any_escape_chars("plain ascii text ~"));
        assert_eq!(json("plain"), "\"plain\"");
        assert_eq!(json(""), "\"\"");
    }

    #[test]
    fn test_two_character_escapes() {
        assert_eq!(
            json("\"\\\n\r\t\u{000C}\u{0008}"),
            r#""\"\\\n\r\t\f\b""#
        );
    }

    #[test]
    fn test_unicode_escapes_are_uppercase() {
        assert_eq!(json("\u{0001}"), "\"\\u0001\"");
        assert_eq!(json("\u{007F}"), "\"\\u007F\"");
        assert_eq!(json("caf\u{00e9}"), "\"caf\\u00E9\"");
        assert_eq!(json("\u{4e2d}"), "\"\\u4E2D\"");
    }

    #[test]
    fn test_astral_characters_pass_through() {
        assert!(!has_any_escape_chars("\u{1F600}"));
        assert_eq!(json("a\u{1F600}b"), "\"a\u{1F600}b\"");
    }

    #[test]
    fn test_unquoted_json_content() {
        let mut out = String::new();
        write_json_string_with(&mut out, "a\"b", false).unwrap();
        assert_eq!(out, "a\\\"b");
    }

    #[test]
    fn test_jsv_quoting() {
        assert_eq!(jsv("Bob"), "Bob");
        assert_eq!(jsv(""), "");
        assert_eq!(jsv("a,b"), "\"a,b\"");
        assert_eq!(jsv("k:v"), "\"k:v\"");
        assert_eq!(jsv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(jsv(" padded"), "\" padded\"");
        assert_eq!(jsv("[x]"), "\"[x]\"");
    }

    #[test]
    fn test_url_encode() {
        assert_eq!(url_encode("abc-_.~"), "abc-_.~");
        assert_eq!(url_encode("a b"), "a+b");
        assert_eq!(url_encode("x=1&y"), "x%3D1%26y");
        assert_eq!(url_encode("\u{00e9}"), "%C3%A9");
    }

    #[test]
    fn test_url_encode_pads_low_bytes() {
        assert_eq!(url_encode("\n/\u{7f}"), "%0A%2F%7F");
        assert_eq!(url_encode("\u{0}"), "%00");
    }
}
