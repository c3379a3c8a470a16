//! Period error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while building a date window.
#[derive(Debug, Error)]
pub enum PeriodError {
    /// Start date is after end date.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Month specifier is not `YYYY-MM` or names no real month.
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),

    /// Date is not a valid `YYYY-MM-DD` calendar date.
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}
