//! Contract data types.

use chrono::NaiveDate;
use gascon_shared::types::{ContractId, OrganizationId};
use serde::{Deserialize, Serialize};

use crate::consumption::ContractTolerances;
use crate::period::DateWindow;

/// A gas supply contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyContract {
    /// Contract ID.
    pub id: ContractId,
    /// Organization ID.
    pub organization_id: OrganizationId,
    /// Contract name.
    pub name: String,
    /// First day the contract is valid.
    pub start_date: NaiveDate,
    /// Last day the contract is valid.
    pub end_date: NaiveDate,
    /// Whether the contract is active.
    pub is_active: bool,
    /// Contracted volume and tolerance bands.
    pub tolerances: ContractTolerances,
}

impl SupplyContract {
    /// Returns true if the contract is active and valid on any day of `window`.
    #[must_use]
    pub fn covers(&self, window: &DateWindow) -> bool {
        self.is_active && self.start_date <= window.end() && self.end_date >= window.start()
    }
}
