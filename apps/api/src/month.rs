//! Calendar month value type used for report windows.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

use crate::errors::AppError;

/// One calendar month, written `YYYY-MM` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Parses a `YYYY-MM` string. Anything else is a validation error.
    pub fn parse(s: &str) -> Result<Self, AppError> {
        let invalid = || AppError::Validation(format!("'{s}' is not a valid YYYY-MM month"));

        let (y, m) = s.split_once('-').ok_or_else(invalid)?;
        if y.len() != 4 || m.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The previous calendar month.
    pub fn pred(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    fn succ(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The `[start, end)` UTC window covering this month: a review belongs
    /// to the month iff its timestamp is >= start and < end.
    pub fn bounds(self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start(), self.succ().start())
    }

    fn start(self) -> DateTime<Utc> {
        // Day 1 of a validated month always exists
        let date = NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("valid month");
        Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("valid midnight"))
    }

    /// The `n` most recent fully completed months before `today`, most
    /// recent first. The month containing `today` is never included.
    pub fn latest_completed(n: usize, today: NaiveDate) -> Vec<Self> {
        let mut months = Vec::with_capacity(n);
        let mut month = Self::containing(today).pred();
        for _ in 0..n {
            months.push(month);
            month = month.pred();
        }
        months
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
