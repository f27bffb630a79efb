//! Recency decay ("query deserves freshness").
//!
//! `freshness = exp(−age_days / 30)`: 1.0 at publication, ≈0.37 after
//! 30 days, ≈0.05 after 90.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Decay constant in days.
pub const DECAY_DAYS: f64 = 30.0;

/// Score when the publication date is missing or unparsable.
pub const UNKNOWN_FRESHNESS: f64 = 0.5;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a backend timestamp. Naive values are taken as UTC.
///
/// Accepts RFC 3339, RFC 2822, `YYYY-MM-DDTHH:MM:SS[.f]`,
/// `YYYY-MM-DD HH:MM:SS[.f]` and `YYYY-MM-DD`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Freshness score in `[0, 1]` relative to `now`.
///
/// Dates in the future score 1.0.
pub fn freshness(published_at: Option<&str>, now: DateTime<Utc>) -> f64 {
    let Some(published) = published_at.and_then(parse_timestamp) else {
        return UNKNOWN_FRESHNESS;
    };

    let age_days = (now - published).num_milliseconds() as f64 / MILLIS_PER_DAY;
    (-age_days / DECAY_DAYS).exp().clamp(0.0, 1.0)
}
