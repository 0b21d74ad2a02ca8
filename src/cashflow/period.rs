//! Calendar months used to select which records count towards a summary.

use std::{fmt::Display, str::FromStr};

use time::{Date, Duration, Month, OffsetDateTime, UtcOffset};

use crate::Error;

/// The earliest year a [Period] may fall in.
pub const MIN_YEAR: i32 = 1;
/// The latest year a [Period] may fall in.
///
/// The first day of the following month must also be a valid date.
pub const MAX_YEAR: i32 = 9998;

/// A calendar month, covering the dates `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    start: Date,
}

impl Period {
    /// Create the period for `month` (1-12) of `year`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidPeriod] if `month` is not between 1 and 12 or
    /// `year` is outside [MIN_YEAR] and [MAX_YEAR].
    pub fn new(year: i32, month: u8) -> Result<Self, Error> {
        let month = Month::try_from(month)
            .map_err(|_| Error::InvalidPeriod(format!("{year:04}-{month:02}")))?;

        Self::from_year_month(year, month)
    }

    fn from_year_month(year: i32, month: Month) -> Result<Self, Error> {
        let invalid_period = || Error::InvalidPeriod(format!("{year:04}-{:02}", month as u8));

        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(invalid_period());
        }

        let start = Date::from_calendar_date(year, month, 1).map_err(|_| invalid_period())?;

        Ok(Self { start })
    }

    /// The period that `date` falls in.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidPeriod] if `date` falls outside the supported years.
    pub fn containing(date: Date) -> Result<Self, Error> {
        Self::from_year_month(date.year(), date.month())
    }

    /// The current calendar month in the timezone given by `local_offset`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidPeriod] if the clock is outside the supported years.
    pub fn current(local_offset: UtcOffset) -> Result<Self, Error> {
        Self::containing(OffsetDateTime::now_utc().to_offset(local_offset).date())
    }

    /// The calendar year of the period.
    pub fn year(&self) -> i32 {
        self.start.year()
    }

    /// The calendar month of the period.
    pub fn month(&self) -> Month {
        self.start.month()
    }

    /// The first day of the period.
    pub fn start(&self) -> Date {
        self.start
    }

    /// The first day of the following month, which is not part of the period.
    pub fn end(&self) -> Date {
        let days_in_month = self.month().length(self.year());

        self.start + Duration::days(i64::from(days_in_month))
    }

    /// Whether `date` falls within the period.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date < self.end()
    }

    /// The month before this one, if it is within the supported years.
    pub fn previous(&self) -> Option<Period> {
        let (year, month) = match self.month() {
            Month::January => (self.year() - 1, Month::December),
            month => (self.year(), month.previous()),
        };

        Self::from_year_month(year, month).ok()
    }

    /// The month after this one, if it is within the supported years.
    pub fn next(&self) -> Option<Period> {
        let (year, month) = match self.month() {
            Month::December => (self.year() + 1, Month::January),
            month => (self.year(), month.next()),
        };

        Self::from_year_month(year, month).ok()
    }

    /// A human readable name for the period, e.g. "January 2026".
    pub fn label(&self) -> String {
        format!("{} {}", self.month(), self.year())
    }
}

impl FromStr for Period {
    type Err = Error;

    /// Parse a period written as "YYYY-MM".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid_period = || Error::InvalidPeriod(s.to_owned());

        let (year, month) = s.split_once('-').ok_or_else(invalid_period)?;

        let is_digits = |text: &str, len: usize| {
            text.len() == len && text.bytes().all(|byte| byte.is_ascii_digit())
        };

        if !is_digits(year, 4) || !is_digits(month, 2) {
            return Err(invalid_period());
        }

        let year = year.parse::<i32>().map_err(|_| invalid_period())?;
        let month = month.parse::<u8>().map_err(|_| invalid_period())?;

        Period::new(year, month).map_err(|_| invalid_period())
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month() as u8)
    }
}
