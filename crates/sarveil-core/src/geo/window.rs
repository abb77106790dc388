use std::fmt;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};

use crate::error::{Result, SarveilError};

/// Half-open acquisition window `[from, to)` aligned to UTC day boundaries.
///
/// `to` is midnight of the day after the last included day, so a scene acquired
/// at any time on the last day falls inside the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateWindow {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl DateWindow {
    /// Window covering every day from `first_day` through `last_day` inclusive.
    pub fn from_dates(first_day: NaiveDate, last_day: NaiveDate) -> Result<Self> {
        let invalid = || SarveilError::InvalidDateWindow {
            from: first_day.to_string(),
            to: last_day.to_string(),
        };
        if first_day > last_day {
            return Err(invalid());
        }
        let end_day = last_day.succ_opt().ok_or_else(invalid)?;
        Ok(Self {
            from: midnight(first_day),
            to: midnight(end_day),
        })
    }

    /// Window ending with `today` (inclusive) and reaching `days` days back.
    pub fn recent(today: NaiveDate, days: i64) -> Result<Self> {
        let invalid = || SarveilError::InvalidDateWindow {
            from: format!("{today} - {days} days"),
            to: today.to_string(),
        };
        if days < 0 {
            return Err(invalid());
        }
        let first_day = today
            .checked_sub_days(Days::new(days as u64))
            .ok_or_else(invalid)?;
        Self::from_dates(first_day, today)
    }

    pub fn from(&self) -> DateTime<Utc> {
        self.from
    }

    pub fn to(&self) -> DateTime<Utc> {
        self.to
    }

    pub fn from_millis(&self) -> i64 {
        self.from.timestamp_millis()
    }

    pub fn to_millis(&self) -> i64 {
        self.to.timestamp_millis()
    }

    /// Number of whole days covered.
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days()
    }

    pub fn contains_millis(&self, timestamp_millis: i64) -> bool {
        timestamp_millis >= self.from_millis() && timestamp_millis < self.to_millis()
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} and {}",
            self.from.format("%Y-%m-%dT%H:%M:%S"),
            self.to.format("%Y-%m-%dT%H:%M:%S")
        )
    }
}

fn midnight(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}
