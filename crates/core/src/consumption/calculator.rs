//! Consumption calculator for daily volumes and contract deviations.
//!
//! All arithmetic is checked: a figure too large for `Decimal` yields
//! `ConsumptionError::Overflow` instead of a panic.

use rust_decimal::{Decimal, RoundingStrategy};

use super::error::ConsumptionError;
use super::types::{
    AtomizerInput, ConsumptionInput, ContractTolerances, DailyVolumes, DeviationResult, LineState,
    LineStatus, MoleculeStatus, RateUnit, TransportStatus,
};

/// Hours in a gas day.
pub const HOURS_PER_DAY: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

/// Rounds a volume or percentage to 2 decimal places, midpoint away from zero.
///
/// Every figure is passed through this before being returned or compared.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Sums volumes without overflowing.
///
/// # Errors
///
/// Returns `ConsumptionError::Overflow` if the total does not fit a `Decimal`.
pub fn checked_sum<I>(values: I) -> Result<Decimal, ConsumptionError>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| checked_add(total, value))
}

pub(crate) fn checked_add(a: Decimal, b: Decimal) -> Result<Decimal, ConsumptionError> {
    a.checked_add(b).ok_or(ConsumptionError::Overflow)
}

fn checked_sub(a: Decimal, b: Decimal) -> Result<Decimal, ConsumptionError> {
    a.checked_sub(b).ok_or(ConsumptionError::Overflow)
}

fn checked_mul(a: Decimal, b: Decimal) -> Result<Decimal, ConsumptionError> {
    a.checked_mul(b).ok_or(ConsumptionError::Overflow)
}

fn checked_div(a: Decimal, b: Decimal) -> Result<Decimal, ConsumptionError> {
    a.checked_div(b).ok_or(ConsumptionError::Overflow)
}

/// Stateless calculator for daily consumption figures.
pub struct ConsumptionCalculator;

impl ConsumptionCalculator {
    /// Converts a rate to m³/hour. Per-day rates are divided by 24.
    #[must_use]
    pub fn normalize_to_hourly_rate(rate: Decimal, unit: RateUnit) -> Decimal {
        match unit {
            RateUnit::CubicMetersPerHour => rate,
            RateUnit::CubicMetersPerDay => rate / HOURS_PER_DAY,
        }
    }

    /// Calculates the volume consumed by the atomizers on one day.
    ///
    /// Each atomizer adds `hourly rate * hours` when it is scheduled and ran
    /// for more than zero hours. The secondary atomizer is only present on
    /// dual-atomizer sites.
    ///
    /// # Errors
    ///
    /// Returns `ConsumptionError::Overflow` if the volume is out of range.
    pub fn calculate_qdc_atomizer(
        primary: &AtomizerInput,
        secondary: Option<&AtomizerInput>,
    ) -> Result<Decimal, ConsumptionError> {
        let volumes = std::iter::once(primary)
            .chain(secondary)
            .filter(|atomizer| atomizer.is_running())
            .map(|atomizer| {
                checked_mul(
                    Self::normalize_to_hourly_rate(
                        atomizer.consumption_rate,
                        atomizer.consumption_unit,
                    ),
                    atomizer.hours,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(round2(checked_sum(volumes)?.max(Decimal::ZERO)))
    }

    /// Calculates the volume consumed by production lines on one day.
    ///
    /// A line that is on counts as running 24 hours. Lines that are off, or
    /// missing from `lines`, add nothing.
    ///
    /// # Errors
    ///
    /// Returns `ConsumptionError::Overflow` if the volume is out of range.
    pub fn calculate_qdc_lines(lines: &[LineStatus]) -> Result<Decimal, ConsumptionError> {
        let volumes = lines
            .iter()
            .filter(|line| line.status == LineState::On)
            .map(|line| {
                checked_mul(
                    Self::normalize_to_hourly_rate(line.consumption_rate, line.consumption_unit),
                    HOURS_PER_DAY,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(round2(checked_sum(volumes)?.max(Decimal::ZERO)))
    }

    /// Total daily requested volume (QDS) for one unit.
    ///
    /// # Errors
    ///
    /// Returns `ConsumptionError::Overflow` if the sum is out of range.
    pub fn calculate_qds(
        qdc_atomizer: Decimal,
        qdc_lines: Decimal,
    ) -> Result<Decimal, ConsumptionError> {
        Ok(round2(checked_add(qdc_atomizer, qdc_lines)?))
    }

    /// Calculates all daily volumes for one unit from its equipment inputs.
    ///
    /// # Errors
    ///
    /// Returns `ConsumptionError::Overflow` if any volume is out of range.
    pub fn calculate_daily_volumes(
        primary: &AtomizerInput,
        secondary: Option<&AtomizerInput>,
        lines: &[LineStatus],
    ) -> Result<DailyVolumes, ConsumptionError> {
        let qdc_atomizer = Self::calculate_qdc_atomizer(primary, secondary)?;
        let qdc_lines = Self::calculate_qdc_lines(lines)?;

        Ok(DailyVolumes {
            qdc_atomizer,
            qdc_lines,
            qds_calculated: Self::calculate_qds(qdc_atomizer, qdc_lines)?,
        })
    }

    /// Compares a daily volume against the contract tolerance bands.
    ///
    /// The transport band is asymmetric (separate upper and lower percent),
    /// the molecule band is symmetric. Deviation percentages are zero when
    /// the contracted volume is zero.
    ///
    /// # Errors
    ///
    /// Returns `ConsumptionError::Overflow` if a deviation, percentage or
    /// limit is out of range.
    pub fn calculate_deviations(
        consumption: &ConsumptionInput,
        contract: &ContractTolerances,
    ) -> Result<DeviationResult, ConsumptionError> {
        let qds = round2(consumption.effective_qds());
        let qdc = round2(contract.qdc_contracted);

        let deviation = round2(checked_sub(qds, qdc)?);
        let deviation_percent = if qdc.is_zero() {
            Decimal::ZERO
        } else {
            round2(checked_mul(checked_div(deviation, qdc)?, Decimal::ONE_HUNDRED)?)
        };

        let transport_upper_limit = round2(checked_add(
            qdc,
            Self::percent_of(qdc, contract.transport_tolerance_upper_percent)?,
        )?);
        let transport_lower_limit = round2(checked_sub(
            qdc,
            Self::percent_of(qdc, contract.transport_tolerance_lower_percent)?,
        )?);
        let transport_status = if qds > transport_upper_limit {
            TransportStatus::ExceededUpper
        } else if qds < transport_lower_limit {
            TransportStatus::ExceededLower
        } else {
            TransportStatus::Within
        };

        let molecule_band = Self::percent_of(qdc, contract.molecule_tolerance_percent)?;
        let molecule_upper_limit = round2(checked_add(qdc, molecule_band)?);
        let molecule_lower_limit = round2(checked_sub(qdc, molecule_band)?);
        let molecule_status = if qds > molecule_upper_limit || qds < molecule_lower_limit {
            MoleculeStatus::Exceeded
        } else {
            MoleculeStatus::Within
        };

        Ok(DeviationResult {
            qds,
            qdc_contracted: qdc,
            transport_upper_limit,
            transport_lower_limit,
            transport_deviation: deviation,
            transport_deviation_percent: deviation_percent,
            transport_status,
            molecule_upper_limit,
            molecule_lower_limit,
            molecule_deviation: deviation,
            molecule_deviation_percent: deviation_percent,
            molecule_status,
        })
    }

    /// Validate an atomizer input before calculating.
    ///
    /// # Errors
    ///
    /// Returns `ConsumptionError::InvalidHours` if hours are outside 0..=24.
    /// Returns `ConsumptionError::NegativeRate` if the rate is negative.
    pub fn validate_atomizer(atomizer: &AtomizerInput) -> Result<(), ConsumptionError> {
        if atomizer.hours < Decimal::ZERO || atomizer.hours > HOURS_PER_DAY {
            return Err(ConsumptionError::InvalidHours(atomizer.hours));
        }

        Self::validate_rate(atomizer.consumption_rate)
    }

    /// Validate a line status before calculating.
    ///
    /// # Errors
    ///
    /// Returns `ConsumptionError::NegativeRate` if the rate is negative.
    pub fn validate_line(line: &LineStatus) -> Result<(), ConsumptionError> {
        Self::validate_rate(line.consumption_rate)
    }

    fn validate_rate(rate: Decimal) -> Result<(), ConsumptionError> {
        if rate < Decimal::ZERO {
            return Err(ConsumptionError::NegativeRate(rate));
        }
        Ok(())
    }

    fn percent_of(value: Decimal, percent: Decimal) -> Result<Decimal, ConsumptionError> {
        checked_div(checked_mul(value, percent)?, Decimal::ONE_HUNDRED)
    }
}
