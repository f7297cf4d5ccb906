//! Posting-date normalization: absolute strings and relative phrases
//! ("3 days ago") to calendar dates.

use std::sync::LazyLock;

use chrono::{DateTime, Days, NaiveDate};
use regex::Regex;

/// Matches relative phrases like "3 days ago", "2 weeks ago", "30+ days ago".
static RELATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\+?\s*(day|week|month)s?\s+ago").expect("relative date regex")
});

/// Normalize raw posting-date text to an absolute date.
///
/// Accepts RFC 3339 datetimes, `YYYY-MM-DD` dates, and relative phrases.
/// `reference` is the date the fetch occurred, so a page cached and
/// processed later still resolves against when it was actually fetched.
/// Unit lengths are approximate: day=1, week=7, month=30. Anything
/// unparseable yields `None` rather than an error.
pub fn normalize_posted_date(raw: Option<&str>, reference: NaiveDate) -> Option<NaiveDate> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }

    let caps = RELATIVE_RE.captures(text)?;
    let n: u64 = caps[1].parse().ok()?;
    let unit_days: u64 = match caps[2].to_ascii_lowercase().as_str() {
        "day" => 1,
        "week" => 7,
        "month" => 30,
        _ => return None,
    };
    reference.checked_sub_days(Days::new(n.checked_mul(unit_days)?))
}
