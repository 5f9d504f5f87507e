//! Parsing of the `time` attribute carried by `status` and `message` elements.
//!
//! Adium writes `yyyy-MM-ddTHH:mm:ss` followed by a numeric UTC offset. Depending
//! on the version that wrote the log the offset has a colon (`+02:00`), no colon
//! (`+0200`), or is the literal `Z` for UTC.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

const WITH_COLON: &str = "%Y-%m-%dT%H:%M:%S%:z";
const WITHOUT_COLON: &str = "%Y-%m-%dT%H:%M:%S%z";
const ZULU: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse a log timestamp, keeping the offset written in the file.
///
/// Returns `None` for anything outside the fixed format, including fractional
/// seconds, surrounding whitespace and timestamps with no offset at all.
pub fn parse_log_time(value: &str) -> Option<DateTime<FixedOffset>> {
    if value.trim() != value {
        return None;
    }

    if value.ends_with('Z') {
        return NaiveDateTime::parse_from_str(value, ZULU)
            .ok()
            .map(|naive| naive.and_utc().fixed_offset());
    }

    DateTime::parse_from_str(value, WITH_COLON)
        .or_else(|_| DateTime::parse_from_str(value, WITHOUT_COLON))
        .ok()
}
