//! Consumption routes.
//!
//! Stateless volume and deviation calculators, plus the consolidated daily
//! view of an organization.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::NaiveDate;
use gascon_core::aggregation::{DailySummary, PeriodAggregator, PeriodData, UnitPeriodSummary};
use gascon_core::consumption::{
    AtomizerInput, ConsumptionCalculator, ConsumptionInput, ContractTolerances, DailyVolumes,
    DeviationResult, LineStatus,
};
use gascon_core::contract::ContractService;
use gascon_core::period::DateWindow;
use gascon_shared::{AppError, AppResult};
use gascon_shared::types::{ContractId, OrganizationId, UnitId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::store::PeriodRecords;
use crate::{ApiError, AppState};

/// Creates the consumption routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/consumption/volumes", post(calculate_volumes))
        .route("/consumption/deviations", post(calculate_deviations))
        .route(
            "/organizations/{org_id}/consumption/daily-summaries",
            get(get_daily_summaries),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for the volume calculator.
#[derive(Debug, Deserialize)]
pub struct VolumesRequest {
    /// Primary atomizer.
    pub primary_atomizer: AtomizerInput,
    /// Secondary atomizer on dual-atomizer sites.
    #[serde(default)]
    pub secondary_atomizer: Option<AtomizerInput>,
    /// Every production line of the unit.
    #[serde(default)]
    pub lines: Vec<LineStatus>,
}

/// Request body for the deviation calculator.
#[derive(Debug, Deserialize)]
pub struct DeviationRequest {
    /// Daily volume to evaluate.
    pub consumption: ConsumptionInput,
    /// Contract tolerance bands.
    pub tolerances: ContractTolerances,
}

/// Query parameters for the consolidated daily view.
#[derive(Debug, Deserialize)]
pub struct DailySummariesQuery {
    /// Window start (YYYY-MM-DD). Defaults to the first day of this month.
    pub start: Option<String>,
    /// Window end (YYYY-MM-DD). Defaults to today.
    pub end: Option<String>,
    /// Unit IDs to include (comma-separated). Defaults to every unit.
    pub unit_ids: Option<String>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for the consolidated daily view.
#[derive(Debug, Serialize)]
pub struct DailySummariesResponse {
    /// Organization ID.
    pub organization_id: OrganizationId,
    /// Contract the deviations were measured against.
    pub contract_id: ContractId,
    /// Window start.
    pub start: NaiveDate,
    /// Window end.
    pub end: NaiveDate,
    /// Days with at least one entry, ascending.
    pub days: Vec<DailySummary>,
    /// Per-unit totals over those days.
    pub units: Vec<UnitPeriodSummary>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST `/consumption/volumes` - Daily volumes from equipment inputs.
async fn calculate_volumes(
    Json(payload): Json<VolumesRequest>,
) -> Result<Json<DailyVolumes>, ApiError> {
    ConsumptionCalculator::validate_atomizer(&payload.primary_atomizer)?;
    if let Some(secondary) = &payload.secondary_atomizer {
        ConsumptionCalculator::validate_atomizer(secondary)?;
    }
    for line in &payload.lines {
        ConsumptionCalculator::validate_line(line)?;
    }

    let volumes = ConsumptionCalculator::calculate_daily_volumes(
        &payload.primary_atomizer,
        payload.secondary_atomizer.as_ref(),
        &payload.lines,
    )?;

    Ok(Json(volumes))
}

/// POST `/consumption/deviations` - Deviation of one volume from a contract.
async fn calculate_deviations(
    Json(payload): Json<DeviationRequest>,
) -> Result<Json<DeviationResult>, ApiError> {
    ContractService::validate_tolerances(&payload.tolerances)?;

    let deviation =
        ConsumptionCalculator::calculate_deviations(&payload.consumption, &payload.tolerances)?;

    Ok(Json(deviation))
}

/// GET `/organizations/{org_id}/consumption/daily-summaries` - Consolidated view.
async fn get_daily_summaries(
    State(state): State<AppState>,
    Path(org_id): Path<OrganizationId>,
    Query(query): Query<DailySummariesQuery>,
) -> Result<Json<DailySummariesResponse>, ApiError> {
    // Validate everything before touching the store.
    let window = match (query.start.as_deref(), query.end.as_deref()) {
        (Some(start), Some(end)) => DateWindow::parse_range(start, end)?,
        (None, None) => DateWindow::month_to_date(state.today()),
        _ => {
            return Err(AppError::Validation(
                "start and end must be given together".to_string(),
            )
            .into());
        }
    };
    let unit_ids = parse_unit_ids(query.unit_ids.as_deref())?;

    let mut records = PeriodRecords::fetch(state.store.as_ref(), org_id, &window).await?;
    records.retain_units(&unit_ids);

    let contract = ContractService::resolve_active(&records.contracts, org_id, &window)?;
    let data = PeriodData {
        units: &records.units,
        entries: &records.entries,
        plans: &records.plans,
        real_consumptions: &records.real_consumptions,
    };
    let days = PeriodAggregator::build_daily_summaries(&data, Some(&contract.tolerances), &window)?;
    let units = PeriodAggregator::summarize_units(&days)?;

    info!(
        org_id = %org_id,
        contract_id = %contract.id,
        days = days.len(),
        "Daily summaries generated"
    );

    Ok(Json(DailySummariesResponse {
        organization_id: org_id,
        contract_id: contract.id,
        start: window.start(),
        end: window.end(),
        days,
        units,
    }))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parses a comma-separated list of unit IDs.
fn parse_unit_ids(raw: Option<&str>) -> AppResult<Vec<UnitId>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<UnitId>()
                .map_err(|_| AppError::Validation(format!("Invalid unit id '{s}'")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unit_ids() {
        assert!(parse_unit_ids(None).unwrap().is_empty());

        let id = UnitId::new();
        let parsed = parse_unit_ids(Some(&format!(" {id}, "))).unwrap();
        assert_eq!(parsed, vec![id]);

        assert!(matches!(
            parse_unit_ids(Some("abc")),
            Err(AppError::Validation(_))
        ));
    }
}
