//! Clock seam for creation stamps.
//!
//! Record constructors never read the wall clock directly; they ask a
//! `Clock`, so tests can pin the stamp.

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Date format of the `creation_date` column (day/month/year).
pub const DATE_FORMAT: &str = "%d/%m/%Y";
/// Time format of the `creation_time` column (hour:minute:second).
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Source of the local timestamp used when a record is created.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the current local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Builds a fixed clock from calendar parts.
    ///
    /// Returns `None` when the parts do not form a valid date/time.
    pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, min, sec))
            .map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Formats a timestamp into the stored `(creation_date, creation_time)` pair.
pub fn stamp(at: NaiveDateTime) -> (String, String) {
    (
        at.format(DATE_FORMAT).to_string(),
        at.format(TIME_FORMAT).to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::{stamp, Clock, FixedClock};

    #[test]
    fn stamp_uses_day_month_year_and_24h_time() {
        let clock = FixedClock::at(2024, 3, 7, 14, 5, 9).unwrap();
        let (date, time) = stamp(clock.now());
        assert_eq!(date, "07/03/2024");
        assert_eq!(time, "14:05:09");
    }

    #[test]
    fn fixed_clock_rejects_impossible_dates() {
        assert!(FixedClock::at(2024, 2, 30, 0, 0, 0).is_none());
    }
}
