use time::{Date, Duration};

use crate::db::ISO_DATE;

/// Length of the trailing window used by the precipitation and tobs routes.
pub const WINDOW_DAYS: i64 = 365;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DateInputError {
    #[error("expected 8 digits (YYYYMMDD), found {0}")]
    DigitCount(usize),
    #[error("not a calendar date: {0}")]
    Calendar(String),
}

/// Parses a caller supplied date. Separators are ignored, the remaining digits
/// must be exactly `YYYYMMDD`: `2017-01-01`, `2017/01/01` and `20170101` all
/// agree while `2017-1-1` is rejected.
pub fn normalize_date_input(input: &str) -> Result<Date, DateInputError> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 8 {
        return Err(DateInputError::DigitCount(digits.len()));
    }

    let canonical = format!("{}-{}-{}", &digits[..4], &digits[4..6], &digits[6..]);
    let date = Date::parse(&canonical, ISO_DATE)
        .map_err(|e| DateInputError::Calendar(format!("{}: {}", canonical, e)))?;

    // calendar years start at 1
    if date.year() < 1 {
        return Err(DateInputError::Calendar(format!(
            "{}: year out of range",
            canonical
        )));
    }
    Ok(date)
}

/// Start of the trailing window: a fixed 365 day step back, leap days included.
pub fn year_ago(date: Date) -> Date {
    date.saturating_sub(Duration::days(WINDOW_DAYS))
}
