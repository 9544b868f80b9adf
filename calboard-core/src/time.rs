//! Wire timestamp codec.
//!
//! Events travel as ISO-8601 text with millisecond precision and a `Z`
//! suffix (`2024-01-01T06:00:00.000Z`). In memory they are `DateTime<Utc>`.
//! Parsing is lenient on input: any RFC 3339 offset, any sub-second precision,
//! and the naive `YYYY-MM-DDTHH:MM` form produced by `datetime-local` inputs
//! (read as UTC).

use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};

use crate::error::{EventError, EventResult};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Format for `datetime-local` form inputs.
pub const LOCAL_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Render a timestamp in wire form.
pub fn to_wire(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a timestamp from wire (or form) text.
///
/// The result is truncated to the wire precision so that a parsed value
/// always survives a further round-trip unchanged.
pub fn parse(s: &str) -> EventResult<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc).trunc_subsecs(3));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc().trunc_subsecs(3))
        .ok_or_else(|| EventError::validation(format!("`{}` is not a valid timestamp", s)))
}

/// Render a timestamp the way a `datetime-local` input shows it.
pub fn to_local_input(dt: &DateTime<Utc>) -> String {
    dt.format(LOCAL_INPUT_FORMAT).to_string()
}

/// Serde adapter: `#[serde(with = "calboard_core::time::wire")]`.
pub mod wire {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_wire(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse(&s).map_err(de::Error::custom)
    }
}
