//! Date and week identity.
//!
//! # Responsibility
//! - Map arbitrary calendar dates onto Monday-start weeks.
//! - Encode/decode week identifiers (`week-YYYY-MM-DD`).
//!
//! # Invariants
//! - `week_dates(&week_id(d)?)` contains `d` whenever `week_id(d)` succeeds.
//! - Week identifiers only ever embed a Monday.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed prefix for every week identifier.
pub const WEEK_ID_PREFIX: &str = "week-";
/// Number of days in one planner week.
pub const DAYS_PER_WEEK: usize = 7;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
const MAX_ID_YEAR: i32 = 9999;

static WEEK_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^week-(\d{4}-\d{2}-\d{2})$").expect("valid week id regex"));

/// Stable key of one Monday-Sunday period.
pub type WeekId = String;

/// Errors raised while decoding week identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// Identifier does not match `week-YYYY-MM-DD` or embeds an invalid date.
    MalformedWeekId(String),
    /// Identifier embeds a valid date that is not a Monday.
    NotMonday { week_id: String, date: NaiveDate },
    /// The week around this date does not fit in the supported date range.
    OutOfRange(NaiveDate),
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedWeekId(value) => write!(f, "malformed week id: `{value}`"),
            Self::NotMonday { week_id, date } => {
                write!(f, "week id `{week_id}` starts on {date}, which is not a Monday")
            }
            Self::OutOfRange(date) => {
                write!(f, "week of {date} falls outside the supported date range")
            }
        }
    }
}

impl Error for CalendarError {}

/// Direction used when stepping between adjacent weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekDirection {
    Prev,
    Next,
}

impl WeekDirection {
    /// Parses `prev|next` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "prev" | "previous" => Some(Self::Prev),
            "next" => Some(Self::Next),
            _ => None,
        }
    }
}

/// Returns the Monday of the week containing `date`.
///
/// Sunday belongs to the week that started six days earlier, so weeks run
/// Monday through Sunday regardless of locale.
///
/// # Errors
/// `OutOfRange` when that Monday precedes the earliest representable date.
pub fn week_start(date: NaiveDate) -> Result<NaiveDate, CalendarError> {
    let from_sunday = date.weekday().num_days_from_sunday();
    let back = if from_sunday == 0 { 6 } else { from_sunday - 1 };
    date.checked_sub_days(Days::new(u64::from(back))).ok_or(CalendarError::OutOfRange(date))
}

/// Returns the 0-indexed Monday-start position of `date` (Mon=0 .. Sun=6).
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

/// Derives the week identifier for a date.
///
/// # Errors
/// `OutOfRange` when the week's Monday has no four-digit year, since such
/// an id could not be parsed back.
pub fn week_id(date: NaiveDate) -> Result<WeekId, CalendarError> {
    let monday = week_start(date)?;
    if !(0..=MAX_ID_YEAR).contains(&monday.year()) {
        return Err(CalendarError::OutOfRange(date));
    }
    Ok(format!("{WEEK_ID_PREFIX}{}", monday.format(ISO_DATE_FORMAT)))
}

/// Decodes a week identifier into its Monday.
///
/// # Errors
/// - `MalformedWeekId` when the shape or embedded date is invalid.
/// - `NotMonday` when the embedded date is not a week start.
pub fn parse_week_id(week_id: &str) -> Result<NaiveDate, CalendarError> {
    let raw_date = WEEK_ID_RE
        .captures(week_id)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| CalendarError::MalformedWeekId(week_id.to_string()))?;

    let date = NaiveDate::parse_from_str(raw_date, ISO_DATE_FORMAT)
        .map_err(|_| CalendarError::MalformedWeekId(week_id.to_string()))?;

    if date.weekday() != Weekday::Mon {
        return Err(CalendarError::NotMonday {
            week_id: week_id.to_string(),
            date,
        });
    }

    Ok(date)
}

/// Expands a week identifier into its seven dates, Monday first.
pub fn week_dates(week_id: &str) -> Result<[NaiveDate; DAYS_PER_WEEK], CalendarError> {
    let monday = parse_week_id(week_id)?;
    let mut dates = [monday; DAYS_PER_WEEK];
    let mut filled = 0;
    for (slot, date) in dates.iter_mut().zip(monday.iter_days()) {
        *slot = date;
        filled += 1;
    }
    if filled < DAYS_PER_WEEK {
        return Err(CalendarError::OutOfRange(monday));
    }
    Ok(dates)
}

/// Returns the identifier of the week adjacent to `week_id`.
pub fn shift_week(week_id: &str, direction: WeekDirection) -> Result<WeekId, CalendarError> {
    let monday = parse_week_id(week_id)?;
    let step = Days::new(DAYS_PER_WEEK as u64);
    let target = match direction {
        WeekDirection::Prev => monday.checked_sub_days(step),
        WeekDirection::Next => monday.checked_add_days(step),
    }
    .ok_or(CalendarError::OutOfRange(monday))?;
    self::week_id(target)
}

#[cfg(test)]
mod tests {
    use super::{
        parse_week_id, shift_week, week_dates, week_id, week_start, weekday_index, CalendarError,
        WeekDirection,
    };
    use chrono::{Datelike, NaiveDate, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn sunday_maps_to_previous_monday() {
        assert_eq!(week_start(date(2024, 1, 7)).unwrap(), date(2024, 1, 1));
        assert_eq!(weekday_index(date(2024, 1, 7)), 6);
    }

    #[test]
    fn monday_is_its_own_week_start() {
        assert_eq!(week_start(date(2024, 1, 1)).unwrap(), date(2024, 1, 1));
        assert_eq!(weekday_index(date(2024, 1, 1)), 0);
    }

    #[test]
    fn parse_week_id_rejects_non_monday() {
        let err = parse_week_id("week-2024-01-03").unwrap_err();
        assert!(matches!(err, CalendarError::NotMonday { .. }));
    }

    #[test]
    fn parse_week_id_rejects_garbage() {
        for raw in ["", "2024-01-01", "week-2024-13-01", "week-2024-1-1 "] {
            let err = parse_week_id(raw).unwrap_err();
            assert_eq!(err, CalendarError::MalformedWeekId(raw.to_string()));
        }
    }

    #[test]
    fn range_edges_return_errors() {
        let first = NaiveDate::MIN;
        if first.weekday() != Weekday::Mon {
            assert_eq!(week_start(first), Err(CalendarError::OutOfRange(first)));
        }
        assert!(week_id(first).is_err());
        assert!(week_id(NaiveDate::MAX).is_err());

        let last = date(10000, 1, 5);
        assert_eq!(week_id(last), Err(CalendarError::OutOfRange(last)));
        assert_eq!(
            shift_week("week-9999-12-27", WeekDirection::Next),
            Err(CalendarError::OutOfRange(date(10000, 1, 3)))
        );
        assert_eq!(week_dates("week-9999-12-27").unwrap()[6], date(10000, 1, 2));
    }

    #[test]
    fn direction_parse_accepts_aliases() {
        assert_eq!(WeekDirection::parse(" Prev "), Some(WeekDirection::Prev));
        assert_eq!(WeekDirection::parse("previous"), Some(WeekDirection::Prev));
        assert_eq!(WeekDirection::parse("NEXT"), Some(WeekDirection::Next));
        assert_eq!(WeekDirection::parse("sideways"), None);
    }
}
