//! Inclusive date windows.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use super::error::PeriodError;

/// An inclusive `[start, end]` range of calendar days.
///
/// Always satisfies `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Creates a window from two dates.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidRange` if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A window covering a single day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// The full calendar month `year-month`.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidMonth` if the month does not exist.
    pub fn month(year: i32, month: u32) -> Result<Self, PeriodError> {
        let invalid = || PeriodError::InvalidMonth(format!("{year:04}-{month:02}"));

        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(invalid)?;

        Ok(Self { start, end })
    }

    /// Parses a `YYYY-MM` month specifier into the full calendar month.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidMonth` if the specifier is malformed.
    pub fn parse_month(raw: &str) -> Result<Self, PeriodError> {
        let invalid = || PeriodError::InvalidMonth(raw.to_string());

        let bytes = raw.as_bytes();
        let well_formed = bytes.len() == 7
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| if i == 4 { *b == b'-' } else { b.is_ascii_digit() });
        if !well_formed {
            return Err(invalid());
        }

        let year: i32 = raw[..4].parse().map_err(|_| invalid())?;
        let month: u32 = raw[5..].parse().map_err(|_| invalid())?;

        Self::month(year, month).map_err(|_| invalid())
    }

    /// Parses two `YYYY-MM-DD` dates into a window.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidDate` for a malformed date, or
    /// `PeriodError::InvalidRange` if start is after end.
    pub fn parse_range(start: &str, end: &str) -> Result<Self, PeriodError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// The calendar month containing `date`.
    #[must_use]
    pub fn month_of(date: NaiveDate) -> Self {
        let start = first_of_month(date);
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(date);
        Self { start, end }
    }

    /// From the first day of `today`'s month through `today`.
    #[must_use]
    pub fn month_to_date(today: NaiveDate) -> Self {
        Self {
            start: first_of_month(today),
            end: today,
        }
    }

    /// First day of the window.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the window.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns true if `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days in the window.
    #[must_use]
    pub fn len_days(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_days() + 1
    }

    /// Every calendar day in the window, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

/// The calendar day `instant` falls on in the organization's timezone.
#[must_use]
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

fn parse_date(value: &str) -> Result<NaiveDate, PeriodError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| PeriodError::InvalidDate(value.to_string()))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}
