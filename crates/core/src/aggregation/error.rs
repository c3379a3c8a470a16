//! Aggregation error types.

use thiserror::Error;

use crate::consumption::ConsumptionError;
use crate::contract::ContractError;
use crate::period::PeriodError;

/// Errors that can occur while aggregating a period.
#[derive(Debug, Error)]
pub enum AggregationError {
    /// No contract tolerances were supplied; deviations cannot be computed.
    #[error("No active contract for the requested window")]
    NoActiveContract,

    /// Contract lookup or validation failed.
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// The date window is invalid.
    #[error(transparent)]
    Period(#[from] PeriodError),

    /// A daily or period total is out of range.
    #[error(transparent)]
    Consumption(#[from] ConsumptionError),
}
