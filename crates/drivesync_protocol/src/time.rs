//! Timestamp conversion.

use crate::error::{ProtocolError, ProtocolResult};
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

/// Format of converted timestamps, e.g. `2020-01-01 09:30:00`.
pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Converts an API timestamp (`2020-01-01T00:00:00Z`) into a display string
/// in the given time zone.
///
/// Fractional seconds and explicit offsets are accepted.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidTimestamp`] if `raw` is not RFC 3339.
pub fn utc_to_display_time<Tz>(raw: &str, tz: &Tz) -> ProtocolResult<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|_| ProtocolError::InvalidTimestamp(raw.to_string()))?;
    Ok(parsed
        .with_timezone(tz)
        .format(DISPLAY_TIME_FORMAT)
        .to_string())
}

/// Converts an API timestamp into a display string in the local time zone.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidTimestamp`] if `raw` is not RFC 3339.
pub fn local_time_from_utc(raw: &str) -> ProtocolResult<String> {
    utc_to_display_time(raw, &Local)
}
