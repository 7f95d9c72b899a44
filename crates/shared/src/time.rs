//! Day labels and date-range parsing for statistics queries.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use thiserror::Error;

/// Format used for chart day labels.
pub const DAY_LABEL_FORMAT: &str = "%Y-%m-%d";

/// Format accepted for full date-time bounds.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Error type for date-range parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS")]
    InvalidFormat(String),
    #[error("Start date must not be after end date")]
    Inverted,
}

/// Which side of a range a bare date is being parsed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Start,
    End,
}

/// Formats an instant as its UTC calendar day.
pub fn day_label(instant: DateTime<Utc>) -> String {
    day_label_for(instant.date_naive())
}

pub fn day_label_for(date: NaiveDate) -> String {
    date.format(DAY_LABEL_FORMAT).to_string()
}

/// Parses one bound of a date range.
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, RFC 3339, or a bare `YYYY-MM-DD`. A bare
/// date expands to the first instant of the day for a start bound and the
/// last microsecond of the day for an end bound.
pub fn parse_bound(input: &str, bound: RangeBound) -> Result<DateTime<Utc>, DateRangeError> {
    let trimmed = input.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, DATE_TIME_FORMAT) {
        return Ok(dt.and_utc());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(trimmed, DAY_LABEL_FORMAT)
        .map_err(|_| DateRangeError::InvalidFormat(input.to_string()))?;

    let time = match bound {
        RangeBound::Start => NaiveTime::MIN,
        RangeBound::End => NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
            .ok_or_else(|| DateRangeError::InvalidFormat(input.to_string()))?,
    };

    Ok(date.and_time(time).and_utc())
}

/// Parses an inclusive `[start, end]` range.
pub fn parse_range(
    start: &str,
    end: &str,
) -> Result<(DateTime<Utc>, DateTime<Utc>), DateRangeError> {
    let start = parse_bound(start, RangeBound::Start)?;
    let end = parse_bound(end, RangeBound::End)?;
    if start > end {
        return Err(DateRangeError::Inverted);
    }
    Ok((start, end))
}

/// Returns `count` consecutive days ending with `today`, oldest first.
pub fn trailing_days(today: NaiveDate, count: u32) -> Vec<NaiveDate> {
    (0..count)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back as u64)))
        .collect()
}
