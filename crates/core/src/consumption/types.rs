//! Consumption data types.

use gascon_shared::types::EquipmentId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unit a consumption rate is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateUnit {
    /// Cubic meters per hour.
    #[serde(rename = "m3_per_hour")]
    CubicMetersPerHour,
    /// Cubic meters per day.
    #[serde(rename = "m3_per_day")]
    CubicMetersPerDay,
}

/// A configured consumption source with its current rate.
///
/// Resolved by the caller from the equipment constant history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentReading {
    /// Atomizer or production line ID.
    pub equipment_id: EquipmentId,
    /// Consumption rate.
    pub consumption_rate: Decimal,
    /// Unit of the consumption rate.
    pub consumption_unit: RateUnit,
}

impl EquipmentReading {
    /// Builds the atomizer input for a day this equipment ran (or not).
    #[must_use]
    pub fn atomizer(&self, scheduled: bool, hours: Decimal) -> AtomizerInput {
        AtomizerInput {
            scheduled,
            hours,
            consumption_rate: self.consumption_rate,
            consumption_unit: self.consumption_unit,
        }
    }

    /// Builds the line status for a day this equipment was on or off.
    #[must_use]
    pub fn line(&self, status: LineState) -> LineStatus {
        LineStatus {
            equipment_id: self.equipment_id,
            status,
            consumption_rate: self.consumption_rate,
            consumption_unit: self.consumption_unit,
        }
    }
}

/// Whether an atomizer ran on a given day and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomizerInput {
    /// Whether the atomizer was scheduled to run.
    pub scheduled: bool,
    /// Hours of operation, 0 to 24.
    pub hours: Decimal,
    /// Consumption rate.
    pub consumption_rate: Decimal,
    /// Unit of the consumption rate.
    pub consumption_unit: RateUnit,
}

impl AtomizerInput {
    /// Returns true if this atomizer contributes volume for the day.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.scheduled && self.hours > Decimal::ZERO
    }
}

/// On/off state of a production line for a whole day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineState {
    /// Running the full day.
    On,
    /// Not running.
    Off,
}

/// Daily status of one production line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStatus {
    /// Production line ID.
    pub equipment_id: EquipmentId,
    /// Line state for the day.
    pub status: LineState,
    /// Consumption rate.
    pub consumption_rate: Decimal,
    /// Unit of the consumption rate.
    pub consumption_unit: RateUnit,
}

/// Daily volumes derived for one unit on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyVolumes {
    /// Volume consumed by atomizers (m³).
    pub qdc_atomizer: Decimal,
    /// Volume consumed by production lines (m³).
    pub qdc_lines: Decimal,
    /// Calculated daily requested volume (m³).
    pub qds_calculated: Decimal,
}

/// Daily requested volume, with an optional operator correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionInput {
    /// Calculated QDS (m³).
    pub qds_calculated: Decimal,
    /// Manual QDS override (m³).
    #[serde(default)]
    pub qds_manual: Option<Decimal>,
}

impl ConsumptionInput {
    /// Creates an input carrying only the calculated value.
    #[must_use]
    pub const fn calculated(qds_calculated: Decimal) -> Self {
        Self {
            qds_calculated,
            qds_manual: None,
        }
    }

    /// Returns the volume deviations are measured on. The manual value wins.
    #[must_use]
    pub fn effective_qds(&self) -> Decimal {
        self.qds_manual.unwrap_or(self.qds_calculated)
    }
}

/// Tolerance parameters of the active supply contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTolerances {
    /// Contracted daily volume (m³).
    pub qdc_contracted: Decimal,
    /// Transport upper tolerance (percent).
    pub transport_tolerance_upper_percent: Decimal,
    /// Transport lower tolerance (percent).
    pub transport_tolerance_lower_percent: Decimal,
    /// Molecule tolerance, applied both ways (percent).
    pub molecule_tolerance_percent: Decimal,
}

/// Transport axis status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportStatus {
    /// Inside the band.
    Within,
    /// Above the upper limit.
    ExceededUpper,
    /// Below the lower limit.
    ExceededLower,
}

/// Molecule axis status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoleculeStatus {
    /// Inside the band.
    Within,
    /// Outside either limit.
    Exceeded,
}

/// Deviation of a daily volume from the contracted volume.
///
/// Both axes measure the same `qds - qdc_contracted`; only the band width
/// differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviationResult {
    /// Effective daily volume that was evaluated.
    pub qds: Decimal,
    /// Contracted daily volume.
    pub qdc_contracted: Decimal,
    /// Transport upper limit.
    pub transport_upper_limit: Decimal,
    /// Transport lower limit.
    pub transport_lower_limit: Decimal,
    /// Transport deviation (qds - qdc).
    pub transport_deviation: Decimal,
    /// Transport deviation as a percentage of qdc.
    pub transport_deviation_percent: Decimal,
    /// Transport status.
    pub transport_status: TransportStatus,
    /// Molecule upper limit.
    pub molecule_upper_limit: Decimal,
    /// Molecule lower limit.
    pub molecule_lower_limit: Decimal,
    /// Molecule deviation (qds - qdc).
    pub molecule_deviation: Decimal,
    /// Molecule deviation as a percentage of qdc.
    pub molecule_deviation_percent: Decimal,
    /// Molecule status.
    pub molecule_status: MoleculeStatus,
}

impl DeviationResult {
    /// Returns true if both axes are within their bands.
    #[must_use]
    pub fn is_within(&self) -> bool {
        self.transport_status == TransportStatus::Within
            && self.molecule_status == MoleculeStatus::Within
    }
}
