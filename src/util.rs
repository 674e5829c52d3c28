use crate::error::{GitbackError, Result};
use crate::model::Granularity;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use std::fmt;
use std::time::Duration;

/// Time bucket identity. Ordering follows the numeric components, so
/// `2024-W9` sorts before `2024-W10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BucketKey {
    Day(NaiveDate),
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
}

impl BucketKey {
    pub fn for_timestamp(timestamp: &DateTime<Utc>, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Daily => BucketKey::Day(timestamp.date_naive()),
            Granularity::Weekly => week_key(timestamp, 1),
            Granularity::BiWeekly => week_key(timestamp, 2),
            Granularity::Monthly => BucketKey::Month {
                year: timestamp.year(),
                month: timestamp.month(),
            },
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKey::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            BucketKey::Week { year, week } => write!(f, "{year}-W{week}"),
            BucketKey::Month { year, month } => write!(f, "{year}-{month:02}"),
        }
    }
}

/// Week numbering restarts every January 1: the key is the first week index
/// of the `interval_weeks`-wide block the day falls in.
pub fn week_key(timestamp: &DateTime<Utc>, interval_weeks: u32) -> BucketKey {
    let days_since_jan1 = timestamp.ordinal0();
    let block = days_since_jan1 / (7 * interval_weeks);
    BucketKey::Week {
        year: timestamp.year(),
        week: block * interval_weeks,
    }
}

pub fn days_in_year(year: i32) -> u32 {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366
    } else {
        365
    }
}

/// Parse a user-supplied date: RFC 3339, `YYYY-MM-DD`, or a relative
/// duration such as `30days ago` measured back from `now`.
pub fn parse_date(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if let Some(dt) = parse_timestamp_text(input) {
        return Ok(dt);
    }

    if let Some(duration) = parse_relative(input) {
        let delta = chrono::Duration::from_std(duration)
            .map_err(|_| GitbackError::InvalidDate(format!("Duration overflow for '{input}'")))?;
        return now
            .checked_sub_signed(delta)
            .ok_or_else(|| GitbackError::InvalidDate(format!("Duration overflow for '{input}'")));
    }

    Err(GitbackError::InvalidDate(format!(
        "'{input}' is not RFC3339, YYYY-MM-DD or a relative duration"
    )))
}

/// Absolute timestamp forms accepted in commit data.
pub fn parse_timestamp_text(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    // RFC3339
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    // YYYY-MM-DD
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| Utc.from_utc_datetime(&datetime))
}

fn parse_relative(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();
    let input = input.strip_suffix("ago").unwrap_or(&input).trim();
    let input = input.strip_prefix('-').unwrap_or(input);
    humantime::parse_duration(input).ok()
}
