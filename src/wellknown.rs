//! Canonical text of the well-known types.
//!
//! | Type | Text |
//! |------|------|
//! | `DateTime<Utc>` | RFC 3339, `Z` suffix, fractional seconds only when present |
//! | `DateTime<FixedOffset>` | RFC 3339 with the numeric offset |
//! | `Uuid` | 32 lowercase hex digits, no dashes |
//! | `chrono::Duration` | XSD duration, e.g. `P1DT2H30M`, `PT0.5S` |
//! | errors | the error's `Display` text |
//! | type descriptors | the type's name |
//! | [`Blob`](crate::reflect::Blob) and byte arrays | standard base64 |
//!
//! JSON writes every one of them as a string. JSV writes dates, identifiers,
//! durations and base64 unquoted, since none of them can contain a JSV
//! delimiter; error messages follow the ordinary JSV string rules.

use crate::escape;
use crate::format::Format;
use crate::reflect::WellKnown;
use crate::Result;
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, TimeZone};
use std::fmt;

/// Writes the canonical text of a well-known value.
pub fn write(out: &mut dyn fmt::Write, value: WellKnown<'_>, format: Format) -> Result<()> {
    match value {
        WellKnown::Date(date) => escape::write_canonical(out, &rfc3339(date, true), format)?,
        WellKnown::DateOffset(date) => {
            escape::write_canonical(out, &rfc3339(date, false), format)?;
        }
        WellKnown::Guid(id) => {
            let mut buf = uuid::Uuid::encode_buffer();
            escape::write_canonical(out, id.simple().encode_lower(&mut buf), format)?;
        }
        WellKnown::TimeSpan(duration) => {
            escape::write_canonical(out, &xsd_duration(duration), format)?;
        }
        WellKnown::Exception(error) => escape::write_string(out, &error.to_string(), format)?,
        WellKnown::Type(ty) => escape::write_string(out, ty.name(), format)?,
        WellKnown::Blob(bytes) => escape::write_canonical(out, &base64(bytes), format)?,
    }
    Ok(())
}

fn rfc3339<Tz>(date: &DateTime<Tz>, use_z: bool) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    date.to_rfc3339_opts(SecondsFormat::AutoSi, use_z)
}

/// Standard base64 with padding.
#[must_use]
pub fn base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Formats a duration as an XSD `duration` lexical value.
///
/// # Examples
///
/// ```rust
/// use chrono::Duration;
/// use typetext::wellknown::xsd_duration;
///
/// assert_eq!(xsd_duration(&Duration::zero()), "PT0S");
/// assert_eq!(xsd_duration(&Duration::minutes(90)), "PT1H30M");
/// assert_eq!(xsd_duration(&-Duration::days(2)), "-P2D");
/// assert_eq!(xsd_duration(&Duration::milliseconds(1500)), "PT1.5S");
/// ```
#[must_use]
pub fn xsd_duration(duration: &chrono::Duration) -> String {
    let negative = *duration < chrono::Duration::zero();
    let magnitude = if negative { -*duration } else { *duration };

    let total_seconds = magnitude.num_seconds();
    let nanos = (magnitude - chrono::Duration::seconds(total_seconds))
        .num_nanoseconds()
        .unwrap_or(0);
    let days = total_seconds / 86_400;
    let hours = total_seconds % 86_400 / 3_600;
    let minutes = total_seconds % 3_600 / 60;
    let seconds = total_seconds % 60;

    let mut text = String::with_capacity(16);
    if negative {
        text.push('-');
    }
    text.push('P');
    if days > 0 {
        text.push_str(&days.to_string());
        text.push('D');
    }
    if hours > 0 || minutes > 0 || seconds > 0 || nanos > 0 {
        text.push('T');
        if hours > 0 {
            text.push_str(&hours.to_string());
            text.push('H');
        }
        if minutes > 0 {
            text.push_str(&minutes.to_string());
            text.push('M');
        }
        if seconds > 0 || nanos > 0 {
            text.push_str(&seconds.to_string());
            if nanos > 0 {
                let fraction = format!("{:09}", nanos);
                text.push('.');
                text.push_str(fraction.trim_end_matches('0'));
            }
            text.push('S');
        }
    }
    if text.ends_with('P') {
        text.push_str("T0S");
    }
    text
}
