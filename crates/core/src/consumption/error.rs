//! Consumption input error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised when validating equipment inputs before a calculation.
#[derive(Debug, Error)]
pub enum ConsumptionError {
    /// Atomizer hours outside the 0..=24 range.
    #[error("Atomizer hours must be between 0 and 24, got {0}")]
    InvalidHours(Decimal),

    /// Consumption rate below zero.
    #[error("Consumption rate cannot be negative, got {0}")]
    NegativeRate(Decimal),

    /// A volume, percentage or limit does not fit a `Decimal`.
    #[error("Consumption figure is out of range")]
    Overflow,
}
