//! Calendar-day normalization for schedule keys and meal dates.
//!
//! Every date that enters a schedule goes through [`parse_date`], which maps it
//! to its calendar day in UTC. Week arithmetic lives here and nowhere else.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::{error::AppError, models::lunch_schedule::DAYS_PER_WEEK};

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a date or timestamp and returns its UTC calendar day.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps with any offset, and timestamps
/// without an offset (read as UTC).
pub fn parse_date(input: &str) -> Result<NaiveDate, AppError> {
    let s = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc).date_naive());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(ts.date());
        }
    }

    Err(AppError::InvalidDate(input.to_string()))
}

/// Like [`parse_date`] but for a required request field.
pub fn required_date(input: Option<&str>, field: &str) -> Result<NaiveDate, AppError> {
    match input.map(str::trim) {
        Some(s) if !s.is_empty() => parse_date(s),
        _ => Err(AppError::Validation(format!("{field} is required"))),
    }
}

/// Last day of the week that starts on `week_start`.
pub fn week_end(week_start: NaiveDate) -> NaiveDate {
    week_start + Duration::days(DAYS_PER_WEEK - 1)
}

/// The seven consecutive days starting at `week_start`.
pub fn week_days(week_start: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (0..DAYS_PER_WEEK).map(move |offset| week_start + Duration::days(offset))
}

/// Midnight UTC of `date`, the wire representation of every stored date.
pub fn to_utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
