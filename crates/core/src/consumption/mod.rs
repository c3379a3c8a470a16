//! Daily consumption calculation and contract-deviation checks.
//!
//! Converts raw equipment readings (atomizers and production lines) into
//! daily volumes and compares a daily volume against a contract's tolerance
//! bands.

pub mod calculator;
pub mod error;
pub mod types;


pub use calculator::{ConsumptionCalculator, HOURS_PER_DAY, checked_sum, round2};
pub use error::ConsumptionError;
pub use types::{
    AtomizerInput, ConsumptionInput, ContractTolerances, DailyVolumes, DeviationResult,
    EquipmentReading, LineState, LineStatus, MoleculeStatus, RateUnit, TransportStatus,
};
