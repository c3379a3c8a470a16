//! Period aggregator for daily summaries and the consumption report.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use gascon_shared::types::UnitId;
use rust_decimal::Decimal;
use tracing::debug;

use super::error::AggregationError;
use super::types::{
    ConsumerUnit, ConsumptionReport, DailySummary, DayStatus, PeriodData, ReportStatistics,
    UnitBreakdown, UnitPeriodSummary,
};
use crate::consumption::{
    ConsumptionCalculator, ConsumptionError, ConsumptionInput, ContractTolerances, checked_sum,
    round2,
};
use crate::consumption::calculator::checked_add;
use crate::contract::{ContractError, ContractService, SupplyContract};
use crate::period::DateWindow;

/// Aggregator turning record collections into per-day summaries.
pub struct PeriodAggregator;

impl PeriodAggregator {
    /// Builds the consolidated view: one summary per day that has at least
    /// one entry of a requested unit, ascending by date.
    ///
    /// # Errors
    ///
    /// Returns `AggregationError::NoActiveContract` when `tolerances` is
    /// `None`, `AggregationError::Contract` when they are out of range, or
    /// `AggregationError::Consumption` when a daily total overflows.
    pub fn build_daily_summaries(
        data: &PeriodData<'_>,
        tolerances: Option<&ContractTolerances>,
        window: &DateWindow,
    ) -> Result<Vec<DailySummary>, AggregationError> {
        let tolerances = tolerances.ok_or(AggregationError::NoActiveContract)?;
        ContractService::validate_tolerances(tolerances)?;

        let index = RecordIndex::build(data, window)?;
        let summaries = index
            .entries
            .keys()
            .map(|date| index.summarize_day(*date, tolerances))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            start = %window.start(),
            end = %window.end(),
            units = index.units.len(),
            days = summaries.len(),
            "Built daily consumption summaries"
        );

        Ok(summaries)
    }

    /// Builds the regulatory report: every calendar day of `window` gets a
    /// row, including days without any data.
    ///
    /// # Errors
    ///
    /// Returns `AggregationError::NoActiveContract` when `contract` is `None`,
    /// `AggregationError::Contract` when it does not cover the window or its
    /// tolerances are out of range, or `AggregationError::Consumption` when a
    /// total overflows.
    pub fn build_report(
        data: &PeriodData<'_>,
        contract: Option<&SupplyContract>,
        window: &DateWindow,
    ) -> Result<ConsumptionReport, AggregationError> {
        let contract = contract.ok_or(AggregationError::NoActiveContract)?;
        if !contract.covers(window) {
            return Err(ContractError::NotFound {
                organization_id: contract.organization_id,
                start: window.start(),
                end: window.end(),
            }
            .into());
        }
        ContractService::validate_tolerances(&contract.tolerances)?;

        let index = RecordIndex::build(data, window)?;
        let days = window
            .days()
            .map(|date| index.summarize_day(date, &contract.tolerances))
            .collect::<Result<Vec<_>, _>>()?;

        let units = Self::summarize_units(&days)?;
        let statistics = Self::compute_statistics(&days)?;

        debug!(
            organization_id = %contract.organization_id,
            contract_id = %contract.id,
            days = statistics.total_days,
            nok_days = statistics.nok_days,
            "Built consumption report"
        );

        Ok(ConsumptionReport {
            organization_id: contract.organization_id,
            contract_id: contract.id,
            contract_name: contract.name.clone(),
            start: window.start(),
            end: window.end(),
            days,
            units,
            statistics,
        })
    }

    /// Totals per unit across `summaries`, in first-seen unit order.
    ///
    /// # Errors
    ///
    /// Returns `AggregationError::Consumption` if a total overflows.
    pub fn summarize_units(
        summaries: &[DailySummary],
    ) -> Result<Vec<UnitPeriodSummary>, AggregationError> {
        let mut totals: Vec<UnitPeriodSummary> = Vec::new();
        let mut positions: HashMap<UnitId, usize> = HashMap::new();

        for unit in summaries.iter().flat_map(|day| &day.units) {
            let position = *positions.entry(unit.unit_id).or_insert_with(|| {
                totals.push(UnitPeriodSummary {
                    unit_id: unit.unit_id,
                    unit_name: unit.unit_name.clone(),
                    total_qdc: Decimal::ZERO,
                    total_qds: Decimal::ZERO,
                    total_qdp: Decimal::ZERO,
                    total_qdr: Decimal::ZERO,
                    days_with_entries: 0,
                });
                totals.len() - 1
            });

            let summary = &mut totals[position];
            summary.total_qdc = checked_add(summary.total_qdc, unit.qdc)?;
            summary.total_qds = checked_add(summary.total_qds, unit.qds)?;
            summary.total_qdp = checked_add(summary.total_qdp, unit.qdp.unwrap_or(Decimal::ZERO))?;
            summary.total_qdr = checked_add(summary.total_qdr, unit.qdr.unwrap_or(Decimal::ZERO))?;
            if unit.has_entry {
                summary.days_with_entries += 1;
            }
        }

        for summary in &mut totals {
            summary.total_qdc = round2(summary.total_qdc);
            summary.total_qds = round2(summary.total_qds);
            summary.total_qdp = round2(summary.total_qdp);
            summary.total_qdr = round2(summary.total_qdr);
        }

        Ok(totals)
    }

    /// Report-level statistics over `days`.
    ///
    /// The average is taken over every day passed in, including days
    /// without consumption.
    ///
    /// # Errors
    ///
    /// Returns `AggregationError::Consumption` if a total overflows.
    pub fn compute_statistics(days: &[DailySummary]) -> Result<ReportStatistics, AggregationError> {
        let mut stats = ReportStatistics {
            total_days: 0,
            days_with_consumption: 0,
            ok_days: 0,
            nok_days: 0,
            average_qds: Decimal::ZERO,
            total_qdc: Decimal::ZERO,
            total_qds: Decimal::ZERO,
            total_qdp: Decimal::ZERO,
            total_qdr: Decimal::ZERO,
            peak_qds: Decimal::ZERO,
            peak_date: None,
        };

        for day in days {
            stats.total_days += 1;
            if day.qds_total > Decimal::ZERO {
                stats.days_with_consumption += 1;
            }
            match day.status {
                DayStatus::Ok => stats.ok_days += 1,
                DayStatus::Nok => stats.nok_days += 1,
            }

            stats.total_qdc = checked_add(stats.total_qdc, day.qdc_total)?;
            stats.total_qds = checked_add(stats.total_qds, day.qds_total)?;
            stats.total_qdp = checked_add(stats.total_qdp, day.qdp_total)?;
            stats.total_qdr = checked_add(stats.total_qdr, day.qdr_total)?;

            if day.qds_total > stats.peak_qds {
                stats.peak_qds = day.qds_total;
                stats.peak_date = Some(day.date);
            }
        }

        stats.total_qdc = round2(stats.total_qdc);
        stats.total_qds = round2(stats.total_qds);
        stats.total_qdp = round2(stats.total_qdp);
        stats.total_qdr = round2(stats.total_qdr);
        if stats.total_days > 0 {
            stats.average_qds = round2(stats.total_qds / Decimal::from(stats.total_days));
        }

        Ok(stats)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct EntryTotals {
    qdc: Decimal,
    qds: Decimal,
}

/// Records of a window keyed by unit and calendar day.
struct RecordIndex<'a> {
    units: Vec<&'a ConsumerUnit>,
    entries: BTreeMap<NaiveDate, HashMap<UnitId, EntryTotals>>,
    plans: HashMap<(UnitId, NaiveDate), Decimal>,
    real_consumptions: HashMap<(UnitId, NaiveDate), Decimal>,
}

impl<'a> RecordIndex<'a> {
    fn build(data: &PeriodData<'a>, window: &DateWindow) -> Result<Self, ConsumptionError> {
        let mut requested: HashSet<UnitId> = HashSet::new();
        let units: Vec<&ConsumerUnit> = data
            .units
            .iter()
            .filter(|unit| requested.insert(unit.id))
            .collect();
        let in_scope =
            |unit_id: UnitId, date: NaiveDate| requested.contains(&unit_id) && window.contains(date);

        let mut entries: BTreeMap<NaiveDate, HashMap<UnitId, EntryTotals>> = BTreeMap::new();
        for entry in data.entries.iter().filter(|e| in_scope(e.unit_id, e.date)) {
            let totals = entries
                .entry(entry.date)
                .or_default()
                .entry(entry.unit_id)
                .or_default();
            totals.qdc = checked_add(totals.qdc, entry.qdc()?)?;
            totals.qds = checked_add(totals.qds, entry.qds())?;
        }

        // First record wins when a unit has duplicates for the same day.
        let mut plans = HashMap::new();
        for plan in data.plans.iter().filter(|p| in_scope(p.unit_id, p.date)) {
            plans.entry((plan.unit_id, plan.date)).or_insert(plan.qdp_value);
        }

        let mut real_consumptions = HashMap::new();
        for real in data
            .real_consumptions
            .iter()
            .filter(|r| in_scope(r.unit_id, r.date))
        {
            real_consumptions
                .entry((real.unit_id, real.date))
                .or_insert(real.qdr_value);
        }

        Ok(Self {
            units,
            entries,
            plans,
            real_consumptions,
        })
    }

    fn summarize_day(
        &self,
        date: NaiveDate,
        tolerances: &ContractTolerances,
    ) -> Result<DailySummary, ConsumptionError> {
        let day_entries = self.entries.get(&date);

        let units: Vec<UnitBreakdown> = self
            .units
            .iter()
            .map(|unit| {
                let totals = day_entries.and_then(|by_unit| by_unit.get(&unit.id));
                UnitBreakdown {
                    unit_id: unit.id,
                    unit_name: unit.name.clone(),
                    qdc: round2(totals.map_or(Decimal::ZERO, |t| t.qdc)),
                    qds: round2(totals.map_or(Decimal::ZERO, |t| t.qds)),
                    qdp: self.plans.get(&(unit.id, date)).copied().map(round2),
                    qdr: self
                        .real_consumptions
                        .get(&(unit.id, date))
                        .copied()
                        .map(round2),
                    has_entry: totals.is_some(),
                }
            })
            .collect();

        let qdc_total = round2(checked_sum(units.iter().map(|u| u.qdc))?);
        let qds_total = round2(checked_sum(units.iter().map(|u| u.qds))?);
        let qdp_total = round2(checked_sum(units.iter().filter_map(|u| u.qdp))?);
        let qdr_total = round2(checked_sum(units.iter().filter_map(|u| u.qdr))?);

        let deviation = ConsumptionCalculator::calculate_deviations(
            &ConsumptionInput::calculated(qds_total),
            tolerances,
        )?;
        let status = if deviation.is_within() {
            DayStatus::Ok
        } else {
            DayStatus::Nok
        };

        Ok(DailySummary {
            date,
            qdc_total,
            qds_total,
            qdp_total,
            qdr_total,
            deviation,
            status,
            units,
        })
    }
}
