use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Earliest accepted trade year.
pub const MIN_YEAR: i32 = 1950;
/// Latest accepted trade year.
pub const MAX_YEAR: i32 = 2050;

const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Minute-resolution trade time.
///
/// Held as raw calendar fields so that callers can hand over whatever they
/// parsed and let the ledger report it as invalid. [`Timestamp::is_valid`]
/// checks month-aware day limits (leap years included), the 24h clock,
/// and the `MIN_YEAR..=MAX_YEAR` bound.
///
/// Ordering: `year` → `month` → `day` → `hour` → `minute`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl Timestamp {
    /// Create a timestamp from raw fields. No validation is performed.
    pub fn new(day: u32, month: u32, year: i32, hour: u32, minute: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
        }
    }

    /// Create a timestamp, rejecting it if it is not a real calendar
    /// minute inside the accepted year range.
    pub fn checked(day: u32, month: u32, year: i32, hour: u32, minute: u32) -> Result<Self, TypeError> {
        let ts = Self::new(day, month, year, hour, minute);
        if ts.is_valid() {
            Ok(ts)
        } else {
            Err(TypeError::InvalidTimestamp(ts.to_string()))
        }
    }

    /// Returns `true` if the fields name a real minute in `MIN_YEAR..=MAX_YEAR`.
    pub fn is_valid(&self) -> bool {
        (MIN_YEAR..=MAX_YEAR).contains(&self.year) && self.to_naive().is_some()
    }

    /// Convert to a chrono value, if the fields form a real date and time.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_opt(self.hour, self.minute, 0)
    }

    /// Returns `true` if `self` lies in the closed interval `[start, end]`.
    pub fn is_within(&self, start: &Self, end: &Self) -> bool {
        start <= self && self <= end
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self::new(value.day(), value.month(), value.year(), value.hour(), value.minute())
    }
}

impl FromStr for Timestamp {
    type Err = TypeError;

    /// Parse `YYYY-MM-DDTHH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = NaiveDateTime::parse_from_str(s.trim(), PARSE_FORMAT)
            .map_err(|e| TypeError::Parse(format!("{s:?}: {e}")))?;
        let ts = Self::from(parsed);
        if ts.is_valid() {
            Ok(ts)
        } else {
            Err(TypeError::InvalidTimestamp(ts.to_string()))
        }
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({self})")
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}-{:02}-{:04} {:02}:{:02}",
            self.day, self.month, self.year, self.hour, self.minute
        )
    }
}
