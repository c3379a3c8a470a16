//! Contract error types.

use chrono::NaiveDate;
use gascon_shared::types::OrganizationId;
use thiserror::Error;

/// Contract-related errors.
#[derive(Debug, Error)]
pub enum ContractError {
    /// No active contract covers the requested window.
    #[error("No active contract for organization {organization_id} between {start} and {end}")]
    NotFound {
        /// Organization ID.
        organization_id: OrganizationId,
        /// Window start.
        start: NaiveDate,
        /// Window end.
        end: NaiveDate,
    },

    /// More than one active contract covers the requested window.
    #[error("{count} active contracts overlap the requested window for organization {organization_id}")]
    Ambiguous {
        /// Organization ID.
        organization_id: OrganizationId,
        /// Number of matching contracts.
        count: usize,
    },

    /// Tolerance parameters are out of range.
    #[error("Invalid contract tolerances: {0}")]
    InvalidTolerances(String),
}
