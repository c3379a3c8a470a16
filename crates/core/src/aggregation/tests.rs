//! Tests for the period aggregator.

use chrono::NaiveDate;
use gascon_shared::types::{ContractId, EntryId, OrganizationId, UnitId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::aggregator::PeriodAggregator;
use super::error::AggregationError;
use super::types::{
    ConsumerUnit, DailyEntry, DailyPlan, DayStatus, PeriodData, RealConsumption,
};
use crate::consumption::{ConsumptionError, ContractTolerances, MoleculeStatus, TransportStatus};
use crate::contract::{ContractError, SupplyContract};
use crate::period::DateWindow;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn tolerances(qdc: Decimal) -> ContractTolerances {
    ContractTolerances {
        qdc_contracted: qdc,
        transport_tolerance_upper_percent: dec!(10),
        transport_tolerance_lower_percent: dec!(20),
        molecule_tolerance_percent: dec!(5),
    }
}

fn unit(org: OrganizationId, name: &str) -> ConsumerUnit {
    ConsumerUnit {
        id: UnitId::new(),
        organization_id: org,
        name: name.to_string(),
    }
}

fn entry(unit_id: UnitId, day: NaiveDate, qds: Decimal) -> DailyEntry {
    DailyEntry {
        id: EntryId::new(),
        unit_id,
        date: day,
        qdc_atomizer: qds,
        qdc_lines: Decimal::ZERO,
        qds_calculated: qds,
        qds_manual: None,
    }
}

fn contract(org: OrganizationId, qdc: Decimal) -> SupplyContract {
    SupplyContract {
        id: ContractId::new(),
        organization_id: org,
        name: "Main supply".to_string(),
        start_date: date(2026, 1, 1),
        end_date: date(2026, 12, 31),
        is_active: true,
        tolerances: tolerances(qdc),
    }
}

#[test]
fn test_missing_unit_entry_is_zero_and_missing_plan_is_null() {
    let org = OrganizationId::new();
    let units = vec![unit(org, "A"), unit(org, "B")];
    let day = date(2026, 3, 10);
    let entries = vec![entry(units[0].id, day, dec!(500))];
    let window = DateWindow::parse_month("2026-03").unwrap();

    let data = PeriodData {
        units: &units,
        entries: &entries,
        plans: &[],
        real_consumptions: &[],
    };
    let summaries =
        PeriodAggregator::build_daily_summaries(&data, Some(&tolerances(dec!(500))), &window)
            .unwrap();

    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    assert_eq!(summary.date, day);
    assert_eq!(summary.qds_total, dec!(500));
    assert_eq!(summary.qdp_total, dec!(0));

    let unit_b = summary
        .units
        .iter()
        .find(|u| u.unit_id == units[1].id)
        .unwrap();
    assert_eq!(unit_b.qds, dec!(0));
    assert!(!unit_b.has_entry);
    assert_eq!(unit_b.qdp, None);
    assert_eq!(unit_b.qdr, None);
}

#[test]
fn test_planned_zero_is_distinct_from_no_plan() {
    let org = OrganizationId::new();
    let units = vec![unit(org, "A"), unit(org, "B")];
    let day = date(2026, 3, 10);
    let entries = vec![
        entry(units[0].id, day, dec!(400)),
        entry(units[1].id, day, dec!(100)),
    ];
    let plans = vec![
        DailyPlan {
            unit_id: units[0].id,
            date: day,
            qdp_value: dec!(0),
        },
        DailyPlan {
            unit_id: units[1].id,
            date: date(2026, 3, 11),
            qdp_value: dec!(90),
        },
    ];
    let reals = vec![RealConsumption {
        unit_id: units[1].id,
        date: day,
        qdr_value: dec!(98.755),
    }];
    let window = DateWindow::parse_month("2026-03").unwrap();

    let data = PeriodData {
        units: &units,
        entries: &entries,
        plans: &plans,
        real_consumptions: &reals,
    };
    let summaries =
        PeriodAggregator::build_daily_summaries(&data, Some(&tolerances(dec!(500))), &window)
            .unwrap();

    let summary = &summaries[0];
    assert_eq!(summary.units[0].qdp, Some(dec!(0)));
    assert_eq!(summary.units[0].qdr, None);
    assert_eq!(summary.units[1].qdp, None);
    assert_eq!(summary.units[1].qdr, Some(dec!(98.76)));
    assert_eq!(summary.qdr_total, dec!(98.76));
    assert_eq!(summary.status, DayStatus::Ok);
}

#[test]
fn test_deviation_is_evaluated_on_organization_total() {
    let org = OrganizationId::new();
    let units = vec![unit(org, "A"), unit(org, "B")];
    let day = date(2026, 3, 10);
    // Each unit alone is inside the band; together they exceed it.
    let entries = vec![
        entry(units[0].id, day, dec!(600)),
        entry(units[1].id, day, dec!(550)),
    ];
    let window = DateWindow::parse_month("2026-03").unwrap();

    let data = PeriodData {
        units: &units,
        entries: &entries,
        plans: &[],
        real_consumptions: &[],
    };
    let summaries =
        PeriodAggregator::build_daily_summaries(&data, Some(&tolerances(dec!(1000))), &window)
            .unwrap();

    let summary = &summaries[0];
    assert_eq!(summary.qds_total, dec!(1150));
    assert_eq!(
        summary.deviation.transport_status,
        TransportStatus::ExceededUpper
    );
    assert_eq!(summary.deviation.molecule_status, MoleculeStatus::Exceeded);
    assert_eq!(summary.status, DayStatus::Nok);
}

#[test]
fn test_manual_override_and_qdc_sum() {
    let org = OrganizationId::new();
    let units = vec![unit(org, "A")];
    let day = date(2026, 3, 10);
    let entries = vec![DailyEntry {
        id: EntryId::new(),
        unit_id: units[0].id,
        date: day,
        qdc_atomizer: dec!(300),
        qdc_lines: dec!(720),
        qds_calculated: dec!(1020),
        qds_manual: Some(dec!(990)),
    }];
    let window = DateWindow::single_day(day);

    let data = PeriodData {
        units: &units,
        entries: &entries,
        plans: &[],
        real_consumptions: &[],
    };
    let summaries =
        PeriodAggregator::build_daily_summaries(&data, Some(&tolerances(dec!(1000))), &window)
            .unwrap();

    assert_eq!(summaries[0].qdc_total, dec!(1020));
    assert_eq!(summaries[0].qds_total, dec!(990));
    assert_eq!(summaries[0].status, DayStatus::Ok);
}

#[test]
fn test_consolidated_view_only_has_entry_days_sorted() {
    let org = OrganizationId::new();
    let units = vec![unit(org, "A")];
    let entries = vec![
        entry(units[0].id, date(2026, 3, 20), dec!(10)),
        entry(units[0].id, date(2026, 3, 2), dec!(10)),
        entry(units[0].id, date(2026, 3, 20), dec!(5)),
        // Outside the window.
        entry(units[0].id, date(2026, 4, 1), dec!(10)),
    ];
    let window = DateWindow::parse_month("2026-03").unwrap();

    let data = PeriodData {
        units: &units,
        entries: &entries,
        plans: &[],
        real_consumptions: &[],
    };
    let summaries =
        PeriodAggregator::build_daily_summaries(&data, Some(&tolerances(dec!(10))), &window)
            .unwrap();

    let dates: Vec<NaiveDate> = summaries.iter().map(|s| s.date).collect();
    assert_eq!(dates, vec![date(2026, 3, 2), date(2026, 3, 20)]);
    // Two entries on the same day are summed.
    assert_eq!(summaries[1].qds_total, dec!(15));
}

#[test]
fn test_entries_of_unrequested_units_are_ignored() {
    let org = OrganizationId::new();
    let requested = vec![unit(org, "A")];
    let other = unit(org, "Other");
    let day = date(2026, 3, 10);
    let entries = vec![entry(other.id, day, dec!(700))];
    let window = DateWindow::single_day(day);

    let data = PeriodData {
        units: &requested,
        entries: &entries,
        plans: &[],
        real_consumptions: &[],
    };
    let summaries =
        PeriodAggregator::build_daily_summaries(&data, Some(&tolerances(dec!(10))), &window)
            .unwrap();

    assert!(summaries.is_empty());
}

#[test]
fn test_missing_contract_is_refused() {
    let data = PeriodData {
        units: &[],
        entries: &[],
        plans: &[],
        real_consumptions: &[],
    };
    let window = DateWindow::parse_month("2026-03").unwrap();

    assert!(matches!(
        PeriodAggregator::build_daily_summaries(&data, None, &window),
        Err(AggregationError::NoActiveContract)
    ));
    assert!(matches!(
        PeriodAggregator::build_report(&data, None, &window),
        Err(AggregationError::NoActiveContract)
    ));
}

#[test]
fn test_report_rejects_contract_outside_window() {
    let org = OrganizationId::new();
    let data = PeriodData {
        units: &[],
        entries: &[],
        plans: &[],
        real_consumptions: &[],
    };
    let window = DateWindow::parse_month("2027-03").unwrap();

    let result = PeriodAggregator::build_report(&data, Some(&contract(org, dec!(100))), &window);
    assert!(matches!(
        result,
        Err(AggregationError::Contract(ContractError::NotFound { .. }))
    ));
}

#[test]
fn test_report_covers_every_day_and_computes_statistics() {
    let org = OrganizationId::new();
    let units = vec![unit(org, "A"), unit(org, "B")];
    let entries = vec![
        entry(units[0].id, date(2026, 2, 1), dec!(600)),
        entry(units[1].id, date(2026, 2, 1), dec!(400)),
        entry(units[0].id, date(2026, 2, 2), dec!(1200)),
        entry(units[1].id, date(2026, 2, 3), dec!(980)),
    ];
    let plans = vec![DailyPlan {
        unit_id: units[0].id,
        date: date(2026, 2, 5),
        qdp_value: dec!(1000),
    }];
    let window = DateWindow::parse_month("2026-02").unwrap();
    let contract = contract(org, dec!(1000));

    let data = PeriodData {
        units: &units,
        entries: &entries,
        plans: &plans,
        real_consumptions: &[],
    };
    let report = PeriodAggregator::build_report(&data, Some(&contract), &window).unwrap();

    assert_eq!(report.days.len(), 28);
    assert_eq!(report.days[0].date, date(2026, 2, 1));
    assert_eq!(report.days[27].date, date(2026, 2, 28));
    assert_eq!(report.contract_id, contract.id);

    // Days without entries still appear as zero rows.
    let empty_day = &report.days[10];
    assert_eq!(empty_day.qds_total, dec!(0));
    assert!(empty_day.units.iter().all(|u| u.qds == dec!(0) && !u.has_entry));

    // A plan on a day without entries is still reported.
    assert_eq!(report.days[4].units[0].qdp, Some(dec!(1000)));
    assert_eq!(report.days[4].qdp_total, dec!(1000));

    let stats = &report.statistics;
    assert_eq!(stats.total_days, 28);
    assert_eq!(stats.days_with_consumption, 3);
    // Day 1 (1000) and day 3 (980) are within; day 2 (1200) and empty days are not.
    assert_eq!(stats.ok_days, 2);
    assert_eq!(stats.nok_days, 26);
    assert_eq!(stats.total_qds, dec!(3180));
    assert_eq!(stats.average_qds, dec!(113.57));
    assert_eq!(stats.total_qdp, dec!(1000));
    assert_eq!(stats.peak_qds, dec!(1200));
    assert_eq!(stats.peak_date, Some(date(2026, 2, 2)));

    let unit_a = &report.units[0];
    assert_eq!(unit_a.unit_id, units[0].id);
    assert_eq!(unit_a.total_qds, dec!(1800));
    assert_eq!(unit_a.total_qdp, dec!(1000));
    assert_eq!(unit_a.days_with_entries, 2);
    assert_eq!(report.units[1].days_with_entries, 2);
}

#[test]
fn test_statistics_of_empty_window() {
    let stats = PeriodAggregator::compute_statistics(&[]).unwrap();
    assert_eq!(stats.total_days, 0);
    assert_eq!(stats.average_qds, Decimal::ZERO);
    assert_eq!(stats.peak_date, None);
}

#[test]
fn test_duplicate_units_are_reported_once() {
    let org = OrganizationId::new();
    let a = unit(org, "A");
    let units = vec![a.clone(), a];
    let day = date(2026, 3, 10);
    let entries = vec![entry(units[0].id, day, dec!(100))];

    let data = PeriodData {
        units: &units,
        entries: &entries,
        plans: &[],
        real_consumptions: &[],
    };
    let summaries = PeriodAggregator::build_daily_summaries(
        &data,
        Some(&tolerances(dec!(100))),
        &DateWindow::single_day(day),
    )
    .unwrap();

    assert_eq!(summaries[0].units.len(), 1);
    assert_eq!(summaries[0].qds_total, dec!(100));
}

#[test]
fn test_overflowing_day_total_is_an_error() {
    let org = OrganizationId::new();
    let units = vec![unit(org, "A"), unit(org, "B")];
    let day = date(2026, 3, 10);
    let entries = vec![
        entry(units[0].id, day, Decimal::MAX),
        entry(units[1].id, day, Decimal::MAX),
    ];

    let data = PeriodData {
        units: &units,
        entries: &entries,
        plans: &[],
        real_consumptions: &[],
    };
    let result = PeriodAggregator::build_daily_summaries(
        &data,
        Some(&tolerances(dec!(100))),
        &DateWindow::single_day(day),
    );

    assert!(matches!(
        result,
        Err(AggregationError::Consumption(ConsumptionError::Overflow))
    ));
}

#[test]
fn test_overflowing_entry_volume_is_an_error() {
    let org = OrganizationId::new();
    let units = vec![unit(org, "A")];
    let day = date(2026, 3, 10);
    let mut huge = entry(units[0].id, day, dec!(1));
    huge.qdc_atomizer = Decimal::MAX;
    huge.qdc_lines = Decimal::MAX;

    let data = PeriodData {
        units: &units,
        entries: &[huge],
        plans: &[],
        real_consumptions: &[],
    };
    let window = DateWindow::parse_month("2026-03").unwrap();

    assert!(matches!(
        PeriodAggregator::build_report(&data, Some(&contract(org, dec!(100))), &window),
        Err(AggregationError::Consumption(ConsumptionError::Overflow))
    ));
}

proptest! {
    /// Daily totals equal the sum of the per-unit breakdown and every unit
    /// appears exactly once per day.
    #[test]
    fn test_totals_match_breakdown(
        volumes in proptest::collection::vec((0usize..3, 1u32..=28, 0i64..1_000_000), 0..40),
    ) {
        let org = OrganizationId::new();
        let units = vec![unit(org, "A"), unit(org, "B"), unit(org, "C")];
        let entries: Vec<DailyEntry> = volumes
            .iter()
            .map(|(u, d, cents)| entry(units[*u].id, date(2026, 2, *d), Decimal::new(*cents, 2)))
            .collect();
        let window = DateWindow::parse_month("2026-02").unwrap();
        let contract = contract(org, dec!(5000));

        let data = PeriodData {
            units: &units,
            entries: &entries,
            plans: &[],
            real_consumptions: &[],
        };
        let report = PeriodAggregator::build_report(&data, Some(&contract), &window).unwrap();

        prop_assert_eq!(report.days.len(), 28);
        for day in &report.days {
            prop_assert_eq!(day.units.len(), 3);
            let sum: Decimal = day.units.iter().map(|u| u.qds).sum();
            prop_assert_eq!(day.qds_total, sum);
            prop_assert_eq!(day.status == DayStatus::Ok, day.deviation.is_within());
        }

        let expected_total: Decimal = entries.iter().map(DailyEntry::qds).sum();
        prop_assert_eq!(report.statistics.total_qds, expected_total);
        prop_assert_eq!(
            report.statistics.ok_days + report.statistics.nok_days,
            report.statistics.total_days
        );
    }
}
