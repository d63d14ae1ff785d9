//! The two text encodings and their literal tokens.
//!
//! Both formats share the write-procedure machinery and differ only in the
//! tokens below and in how strings are quoted (see [`crate::escape`]).
//!
//! | Token | JSON | JSV |
//! |-------|------|-----|
//! | null | `null` | *(nothing)* |
//! | true / false | `true` / `false` | `True` / `False` |
//! | map | `{"Key":value}` | `{Key:value}` |
//! | list | `[a,b]` | `[a,b]` |
//! | string | `"text"` with backslash escapes | `text`, or `"te""xt"` when it holds a delimiter |
//!
//! JSV keeps strings unquoted unless they contain one of the structural
//! characters, so `{Name:Bob,Tags:[a,b]}` is a complete document.

use std::fmt;

pub const MAP_START: char = '{';
pub const MAP_END: char = '}';
pub const LIST_START: char = '[';
pub const LIST_END: char = ']';
pub const ITEM_SEPARATOR: char = ',';
pub const MAP_KEY_SEPARATOR: char = ':';
pub const QUOTE: char = '"';

/// Target text encoding of a write procedure.
///
/// # Examples
///
/// ```rust
/// use typetext::Format;
///
/// assert_eq!(Format::Json.null_token(), "null");
/// assert_eq!(Format::Jsv.null_token(), "");
/// assert_eq!(Format::Jsv.bool_token(true), "True");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Format {
    #[default]
    Json,
    Jsv,
}

impl Format {
    pub const ALL: [Format; 2] = [Format::Json, Format::Jsv];

    /// Text emitted for an absent value.
    #[must_use]
    pub const fn null_token(self) -> &'static str {
        match self {
            Format::Json => "null",
            Format::Jsv => "",
        }
    }

    #[must_use]
    pub const fn bool_token(self, value: bool) -> &'static str {
        match (self, value) {
            (Format::Json, true) => "true",
            (Format::Json, false) => "false",
            (Format::Jsv, true) => "True",
            (Format::Jsv, false) => "False",
        }
    }

    /// Whether map keys are quoted in this format.
    #[must_use]
    pub const fn quotes_keys(self) -> bool {
        matches!(self, Format::Json)
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Format::Json => 0,
            Format::Jsv => 1,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => f.write_str("JSON"),
            Format::Jsv => f.write_str("JSV"),
        }
    }
}
