//! Period aggregation of daily consumption against the active contract.
//!
//! This module joins daily entries, daily plans (QDP) and real-consumption
//! records (QDR) into one summary per calendar day and derives:
//! - the consolidated dashboard view (days with entries only)
//! - the regulatory consumption report (every day of the window)
//! - per-unit totals over a window

pub mod aggregator;
pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use aggregator::PeriodAggregator;
pub use error::AggregationError;
pub use types::*;
