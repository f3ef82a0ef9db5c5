//! Per-entry classification: novelty against the prior report and
//! whether the entry was published on the reference date.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use tracing::warn;

use crate::error::DateParseError;

/// Calendar date format compared by [`is_today`], e.g. `Mon, 02 Jan 2006`.
pub const DATE_FORMAT: &str = "%a, %d %b %Y";

/// An entry is new unless its identifier occurs anywhere in the prior report text.
///
/// This is a plain substring test, so an identifier embedded in unrelated text
/// also counts as already reported.
pub fn is_new(guid: &str, prior_report: &str) -> bool {
    !prior_report.contains(guid)
}

/// Parse an RFC 1123 / RFC 2822 publication date such as `Mon, 02 Jan 2006 15:04:05 MST`.
///
/// Zone abbreviations unknown to RFC 2822 (`UTC`, `CET`, ...) are accepted with
/// a zero offset, and the weekday token is not checked against the date.
pub fn parse_pub_date(value: &str) -> Result<DateTime<FixedOffset>, DateParseError> {
    let value = value.trim();
    DateTime::parse_from_rfc2822(value)
        .or_else(|e| parse_named_zone(value).ok_or(e))
        .map_err(|source| DateParseError {
            value: value.to_string(),
            source,
        })
}

fn parse_named_zone(value: &str) -> Option<DateTime<FixedOffset>> {
    let (rest, zone) = value.rsplit_once(' ')?;
    if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let (_weekday, rest) = rest.split_once(", ")?;
    let naive = NaiveDateTime::parse_from_str(rest.trim(), "%d %b %Y %H:%M:%S").ok()?;
    Some(naive.and_utc().fixed_offset())
}

/// Format `now` in the reference timezone the way [`is_today`] compares dates.
pub fn reference_date<Tz: TimeZone>(now: &DateTime<Tz>, offset: FixedOffset) -> String {
    now.with_timezone(&offset).format(DATE_FORMAT).to_string()
}

/// Whether `pub_date` falls on `reference_date`. The calendar date is taken in
/// the timestamp's own offset. Unparseable dates are logged and count as not today.
pub fn is_today(pub_date: &str, reference_date: &str) -> bool {
    match parse_pub_date(pub_date) {
        Ok(published) => published.format(DATE_FORMAT).to_string() == reference_date,
        Err(e) => {
            warn!("{}", e);
            false
        }
    }
}
