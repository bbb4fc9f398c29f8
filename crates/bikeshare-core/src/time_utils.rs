use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

/// Patterns seen in the published trip exports, most common first.
const FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Parse a trip timestamp into a naive local date-time.
///
/// Trip exports carry wall-clock times of the operating city with no offset,
/// so no timezone conversion is applied. Date-only strings resolve to
/// midnight. Returns `None` for empty or unrecognised input.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    warn!("could not parse timestamp \"{}\"", s);
    None
}

/// Like [`parse_timestamp`] but treats a missing or blank field as `None`
/// without logging.
pub fn parse_optional_timestamp(s: Option<&str>) -> Option<NaiveDateTime> {
    match s.map(str::trim) {
        None | Some("") => None,
        Some(value) => parse_timestamp(value),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
