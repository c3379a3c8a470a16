//! Aggregation data types.

use chrono::NaiveDate;
use gascon_shared::types::{ContractId, EntryId, OrganizationId, UnitId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::consumption::{ConsumptionError, DeviationResult};

/// A consumer unit (plant site) of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerUnit {
    /// Unit ID.
    pub id: UnitId,
    /// Organization ID.
    pub organization_id: OrganizationId,
    /// Unit name.
    pub name: String,
}

/// A stored daily consumption entry for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEntry {
    /// Entry ID.
    pub id: EntryId,
    /// Unit ID.
    pub unit_id: UnitId,
    /// Consumption day.
    pub date: NaiveDate,
    /// Atomizer volume (m³).
    pub qdc_atomizer: Decimal,
    /// Production line volume (m³).
    pub qdc_lines: Decimal,
    /// Calculated QDS (m³).
    pub qds_calculated: Decimal,
    /// Operator-corrected QDS (m³).
    #[serde(default)]
    pub qds_manual: Option<Decimal>,
}

impl DailyEntry {
    /// Consumed volume of the entry.
    ///
    /// # Errors
    ///
    /// Returns `ConsumptionError::Overflow` if the sum is out of range.
    pub fn qdc(&self) -> Result<Decimal, ConsumptionError> {
        self.qdc_atomizer
            .checked_add(self.qdc_lines)
            .ok_or(ConsumptionError::Overflow)
    }

    /// Effective requested volume; the manual value wins.
    #[must_use]
    pub fn qds(&self) -> Decimal {
        self.qds_manual.unwrap_or(self.qds_calculated)
    }
}

/// Planned daily volume (QDP) for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPlan {
    /// Unit ID.
    pub unit_id: UnitId,
    /// Planned day.
    pub date: NaiveDate,
    /// Planned volume (m³).
    pub qdp_value: Decimal,
}

/// Realized daily volume (QDR) for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealConsumption {
    /// Unit ID.
    pub unit_id: UnitId,
    /// Consumption day.
    pub date: NaiveDate,
    /// Realized volume (m³).
    pub qdr_value: Decimal,
}

/// Records of one organization, already fetched for a window.
#[derive(Debug, Clone, Copy)]
pub struct PeriodData<'a> {
    /// Units to aggregate; records of other units are ignored.
    pub units: &'a [ConsumerUnit],
    /// Daily entries.
    pub entries: &'a [DailyEntry],
    /// Daily plans.
    pub plans: &'a [DailyPlan],
    /// Real-consumption records.
    pub real_consumptions: &'a [RealConsumption],
}

/// Overall compliance of one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    /// Both axes within tolerance.
    Ok,
    /// At least one axis out of tolerance.
    Nok,
}

/// One unit's figures on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitBreakdown {
    /// Unit ID.
    pub unit_id: UnitId,
    /// Unit name.
    pub unit_name: String,
    /// Consumed volume; zero without an entry.
    pub qdc: Decimal,
    /// Requested volume; zero without an entry.
    pub qds: Decimal,
    /// Planned volume; `None` when no plan was recorded.
    pub qdp: Option<Decimal>,
    /// Realized volume; `None` when no record exists.
    pub qdr: Option<Decimal>,
    /// Whether the unit had at least one entry that day.
    pub has_entry: bool,
}

/// Organization-level summary of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Calendar day.
    pub date: NaiveDate,
    /// Total consumed volume.
    pub qdc_total: Decimal,
    /// Total requested volume.
    pub qds_total: Decimal,
    /// Total planned volume.
    pub qdp_total: Decimal,
    /// Total realized volume.
    pub qdr_total: Decimal,
    /// Deviation of `qds_total` from the contracted volume.
    pub deviation: DeviationResult,
    /// Overall status.
    pub status: DayStatus,
    /// Per-unit breakdown.
    pub units: Vec<UnitBreakdown>,
}

/// One unit's totals over a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPeriodSummary {
    /// Unit ID.
    pub unit_id: UnitId,
    /// Unit name.
    pub unit_name: String,
    /// Total consumed volume.
    pub total_qdc: Decimal,
    /// Total requested volume.
    pub total_qds: Decimal,
    /// Total planned volume.
    pub total_qdp: Decimal,
    /// Total realized volume.
    pub total_qdr: Decimal,
    /// Days with at least one entry.
    pub days_with_entries: u32,
}

/// Summary statistics of a report window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStatistics {
    /// Calendar days in the window.
    pub total_days: u32,
    /// Days with requested volume above zero.
    pub days_with_consumption: u32,
    /// Days within tolerance.
    pub ok_days: u32,
    /// Days out of tolerance.
    pub nok_days: u32,
    /// Mean requested volume over all days of the window.
    pub average_qds: Decimal,
    /// Total consumed volume.
    pub total_qdc: Decimal,
    /// Total requested volume.
    pub total_qds: Decimal,
    /// Total planned volume.
    pub total_qdp: Decimal,
    /// Total realized volume.
    pub total_qdr: Decimal,
    /// Highest daily requested volume.
    pub peak_qds: Decimal,
    /// Day of the highest requested volume.
    pub peak_date: Option<NaiveDate>,
}

/// Regulatory consumption report for a window (normally one month).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionReport {
    /// Organization ID.
    pub organization_id: OrganizationId,
    /// Contract the deviations were measured against.
    pub contract_id: ContractId,
    /// Contract name.
    pub contract_name: String,
    /// First day of the report.
    pub start: NaiveDate,
    /// Last day of the report.
    pub end: NaiveDate,
    /// One row per calendar day, ascending.
    pub days: Vec<DailySummary>,
    /// Per-unit totals.
    pub units: Vec<UnitPeriodSummary>,
    /// Summary statistics.
    pub statistics: ReportStatistics,
}
