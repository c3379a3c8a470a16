//! Contract service for active-contract resolution and validation.

use gascon_shared::types::OrganizationId;
use rust_decimal::Decimal;

use super::error::ContractError;
use super::types::SupplyContract;
use crate::consumption::ContractTolerances;
use crate::period::DateWindow;

/// Contract service for business logic.
pub struct ContractService;

impl ContractService {
    /// Finds the single active contract of an organization covering `window`.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::NotFound` if no contract covers the window.
    /// Returns `ContractError::Ambiguous` if more than one does; the caller
    /// must never pick one arbitrarily.
    pub fn resolve_active<'a>(
        contracts: &'a [SupplyContract],
        organization_id: OrganizationId,
        window: &DateWindow,
    ) -> Result<&'a SupplyContract, ContractError> {
        let mut matching = contracts
            .iter()
            .filter(|c| c.organization_id == organization_id && c.covers(window));

        let Some(contract) = matching.next() else {
            return Err(ContractError::NotFound {
                organization_id,
                start: window.start(),
                end: window.end(),
            });
        };

        let extra = matching.count();
        if extra > 0 {
            return Err(ContractError::Ambiguous {
                organization_id,
                count: extra + 1,
            });
        }

        Ok(contract)
    }

    /// Validate tolerance parameters.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::InvalidTolerances` if the contracted volume or
    /// any percentage is negative, or the lower transport tolerance exceeds 100%.
    pub fn validate_tolerances(tolerances: &ContractTolerances) -> Result<(), ContractError> {
        if tolerances.qdc_contracted < Decimal::ZERO {
            return Err(ContractError::InvalidTolerances(
                "contracted volume cannot be negative".to_string(),
            ));
        }

        let percents = [
            ("transport upper", tolerances.transport_tolerance_upper_percent),
            ("transport lower", tolerances.transport_tolerance_lower_percent),
            ("molecule", tolerances.molecule_tolerance_percent),
        ];
        if let Some((name, value)) = percents.iter().find(|(_, v)| *v < Decimal::ZERO) {
            return Err(ContractError::InvalidTolerances(format!(
                "{name} tolerance cannot be negative, got {value}"
            )));
        }

        if tolerances.transport_tolerance_lower_percent > Decimal::ONE_HUNDRED {
            return Err(ContractError::InvalidTolerances(
                "transport lower tolerance cannot exceed 100%".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gascon_shared::types::ContractId;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tolerances() -> ContractTolerances {
        ContractTolerances {
            qdc_contracted: dec!(1000),
            transport_tolerance_upper_percent: dec!(10),
            transport_tolerance_lower_percent: dec!(20),
            molecule_tolerance_percent: dec!(5),
        }
    }

    fn contract(
        org: OrganizationId,
        start: NaiveDate,
        end: NaiveDate,
        is_active: bool,
    ) -> SupplyContract {
        SupplyContract {
            id: ContractId::new(),
            organization_id: org,
            name: "Supply".to_string(),
            start_date: start,
            end_date: end,
            is_active,
            tolerances: tolerances(),
        }
    }

    #[test]
    fn test_resolves_single_active_contract() {
        let org = OrganizationId::new();
        let contracts = vec![
            contract(org, date(2025, 1, 1), date(2025, 12, 31), true),
            contract(org, date(2026, 1, 1), date(2026, 12, 31), true),
            contract(org, date(2026, 1, 1), date(2026, 12, 31), false),
            contract(OrganizationId::new(), date(2026, 1, 1), date(2026, 12, 31), true),
        ];
        let window = DateWindow::parse_month("2026-03").unwrap();

        let resolved = ContractService::resolve_active(&contracts, org, &window).unwrap();
        assert_eq!(resolved.id, contracts[1].id);
    }

    #[test]
    fn test_missing_contract_is_not_found() {
        let org = OrganizationId::new();
        let contracts = vec![contract(org, date(2025, 1, 1), date(2025, 12, 31), true)];
        let window = DateWindow::parse_month("2026-03").unwrap();

        let result = ContractService::resolve_active(&contracts, org, &window);
        assert!(matches!(result, Err(ContractError::NotFound { .. })));
    }

    #[test]
    fn test_overlapping_contracts_are_ambiguous() {
        let org = OrganizationId::new();
        let contracts = vec![
            contract(org, date(2026, 1, 1), date(2026, 3, 15), true),
            contract(org, date(2026, 3, 16), date(2026, 12, 31), true),
        ];
        let window = DateWindow::parse_month("2026-03").unwrap();

        let result = ContractService::resolve_active(&contracts, org, &window);
        assert!(matches!(result, Err(ContractError::Ambiguous { count: 2, .. })));

        // A window inside one contract resolves cleanly.
        let early = DateWindow::parse_range("2026-03-01", "2026-03-10").unwrap();
        assert!(ContractService::resolve_active(&contracts, org, &early).is_ok());
    }

    #[test]
    fn test_validate_tolerances() {
        assert!(ContractService::validate_tolerances(&tolerances()).is_ok());

        let zero_volume = ContractTolerances {
            qdc_contracted: dec!(0),
            ..tolerances()
        };
        assert!(ContractService::validate_tolerances(&zero_volume).is_ok());

        let negative = ContractTolerances {
            molecule_tolerance_percent: dec!(-1),
            ..tolerances()
        };
        assert!(matches!(
            ContractService::validate_tolerances(&negative),
            Err(ContractError::InvalidTolerances(_))
        ));

        let too_low = ContractTolerances {
            transport_tolerance_lower_percent: dec!(101),
            ..tolerances()
        };
        assert!(ContractService::validate_tolerances(&too_low).is_err());
    }
}
