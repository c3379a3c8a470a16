//! Record store seam.
//!
//! Entries, plans, real-consumption records and contracts live in an external
//! relational store. Handlers only see the `ConsumptionStore` trait;
//! `InMemoryStore` serves a JSON snapshot of those tables.

use std::path::Path;

use async_trait::async_trait;
use gascon_core::aggregation::{ConsumerUnit, DailyEntry, DailyPlan, RealConsumption};
use gascon_core::contract::SupplyContract;
use gascon_core::period::DateWindow;
use gascon_shared::types::{OrganizationId, UnitId};
use serde::{Deserialize, Serialize};

/// Errors raised by a record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Dataset could not be read.
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset is not valid JSON for the expected records.
    #[error("Failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),

    /// Backend query failure.
    #[error("Store query failed: {0}")]
    Query(String),
}

/// Read access to the records the consumption engine needs.
///
/// Every method returns records of one organization only; window-scoped
/// methods return records dated inside the inclusive window.
#[async_trait]
pub trait ConsumptionStore: Send + Sync {
    /// Consumer units of an organization.
    async fn units(&self, organization_id: OrganizationId)
    -> Result<Vec<ConsumerUnit>, StoreError>;

    /// Daily entries of an organization's units inside `window`.
    async fn entries(
        &self,
        organization_id: OrganizationId,
        window: &DateWindow,
    ) -> Result<Vec<DailyEntry>, StoreError>;

    /// Daily plans of an organization's units inside `window`.
    async fn plans(
        &self,
        organization_id: OrganizationId,
        window: &DateWindow,
    ) -> Result<Vec<DailyPlan>, StoreError>;

    /// Real-consumption records of an organization's units inside `window`.
    async fn real_consumptions(
        &self,
        organization_id: OrganizationId,
        window: &DateWindow,
    ) -> Result<Vec<RealConsumption>, StoreError>;

    /// Supply contracts of an organization.
    async fn contracts(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<SupplyContract>, StoreError>;
}

/// Snapshot of all tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Consumer units.
    #[serde(default)]
    pub units: Vec<ConsumerUnit>,
    /// Daily entries.
    #[serde(default)]
    pub entries: Vec<DailyEntry>,
    /// Daily plans.
    #[serde(default)]
    pub plans: Vec<DailyPlan>,
    /// Real-consumption records.
    #[serde(default)]
    pub real_consumptions: Vec<RealConsumption>,
    /// Supply contracts.
    #[serde(default)]
    pub contracts: Vec<SupplyContract>,
}

/// In-memory store over a `Dataset`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    dataset: Dataset,
}

impl InMemoryStore {
    /// Creates a store from a dataset.
    #[must_use]
    pub const fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    /// Loads a dataset from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file cannot be read, or
    /// `StoreError::Parse` if it is not a valid dataset.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let dataset: Dataset = serde_json::from_str(&raw)?;
        Ok(Self::new(dataset))
    }

    fn unit_ids(&self, organization_id: OrganizationId) -> Vec<UnitId> {
        self.dataset
            .units
            .iter()
            .filter(|u| u.organization_id == organization_id)
            .map(|u| u.id)
            .collect()
    }
}

#[async_trait]
impl ConsumptionStore for InMemoryStore {
    async fn units(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<ConsumerUnit>, StoreError> {
        Ok(self
            .dataset
            .units
            .iter()
            .filter(|u| u.organization_id == organization_id)
            .cloned()
            .collect())
    }

    async fn entries(
        &self,
        organization_id: OrganizationId,
        window: &DateWindow,
    ) -> Result<Vec<DailyEntry>, StoreError> {
        let unit_ids = self.unit_ids(organization_id);
        Ok(self
            .dataset
            .entries
            .iter()
            .filter(|e| unit_ids.contains(&e.unit_id) && window.contains(e.date))
            .cloned()
            .collect())
    }

    async fn plans(
        &self,
        organization_id: OrganizationId,
        window: &DateWindow,
    ) -> Result<Vec<DailyPlan>, StoreError> {
        let unit_ids = self.unit_ids(organization_id);
        Ok(self
            .dataset
            .plans
            .iter()
            .filter(|p| unit_ids.contains(&p.unit_id) && window.contains(p.date))
            .cloned()
            .collect())
    }

    async fn real_consumptions(
        &self,
        organization_id: OrganizationId,
        window: &DateWindow,
    ) -> Result<Vec<RealConsumption>, StoreError> {
        let unit_ids = self.unit_ids(organization_id);
        Ok(self
            .dataset
            .real_consumptions
            .iter()
            .filter(|r| unit_ids.contains(&r.unit_id) && window.contains(r.date))
            .cloned()
            .collect())
    }

    async fn contracts(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<SupplyContract>, StoreError> {
        Ok(self
            .dataset
            .contracts
            .iter()
            .filter(|c| c.organization_id == organization_id)
            .cloned()
            .collect())
    }
}

/// Owned records of one organization for one window.
#[derive(Debug, Clone, Default)]
pub struct PeriodRecords {
    /// Consumer units.
    pub units: Vec<ConsumerUnit>,
    /// Daily entries.
    pub entries: Vec<DailyEntry>,
    /// Daily plans.
    pub plans: Vec<DailyPlan>,
    /// Real-consumption records.
    pub real_consumptions: Vec<RealConsumption>,
    /// Supply contracts.
    pub contracts: Vec<SupplyContract>,
}

impl PeriodRecords {
    /// Fetches every record of an organization needed for `window`.
    ///
    /// # Errors
    ///
    /// Returns the first store error encountered.
    pub async fn fetch(
        store: &dyn ConsumptionStore,
        organization_id: OrganizationId,
        window: &DateWindow,
    ) -> Result<Self, StoreError> {
        let (units, entries, plans, real_consumptions, contracts) = tokio::try_join!(
            store.units(organization_id),
            store.entries(organization_id, window),
            store.plans(organization_id, window),
            store.real_consumptions(organization_id, window),
            store.contracts(organization_id),
        )?;

        Ok(Self {
            units,
            entries,
            plans,
            real_consumptions,
            contracts,
        })
    }

    /// Keeps only the listed units. An empty list keeps every unit.
    pub fn retain_units(&mut self, unit_ids: &[UnitId]) {
        if !unit_ids.is_empty() {
            self.units.retain(|u| unit_ids.contains(&u.id));
        }
    }
}
