//! Report routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use gascon_core::aggregation::{ConsumptionReport, PeriodAggregator, PeriodData};
use gascon_core::contract::ContractService;
use gascon_core::period::DateWindow;
use gascon_shared::types::OrganizationId;
use serde::Deserialize;
use tracing::info;

use crate::store::PeriodRecords;
use crate::{ApiError, AppState};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/organizations/{org_id}/reports/consumption",
        get(get_consumption_report),
    )
}

/// Query parameters for the consumption report.
#[derive(Debug, Deserialize)]
pub struct ConsumptionReportQuery {
    /// Report month (YYYY-MM). Defaults to the current month.
    pub month: Option<String>,
}

/// GET `/organizations/{org_id}/reports/consumption` - Monthly regulatory report.
///
/// Every calendar day of the month gets a row so gaps show up as zero rows.
async fn get_consumption_report(
    State(state): State<AppState>,
    Path(org_id): Path<OrganizationId>,
    Query(query): Query<ConsumptionReportQuery>,
) -> Result<Json<ConsumptionReport>, ApiError> {
    let window = match query.month.as_deref() {
        Some(month) => DateWindow::parse_month(month)?,
        None => DateWindow::month_of(state.today()),
    };

    let records = PeriodRecords::fetch(state.store.as_ref(), org_id, &window).await?;
    let contract = ContractService::resolve_active(&records.contracts, org_id, &window)?;

    let data = PeriodData {
        units: &records.units,
        entries: &records.entries,
        plans: &records.plans,
        real_consumptions: &records.real_consumptions,
    };
    let report = PeriodAggregator::build_report(&data, Some(contract), &window)?;

    info!(
        org_id = %org_id,
        contract_id = %report.contract_id,
        month = %window.start().format("%Y-%m"),
        nok_days = report.statistics.nok_days,
        "Consumption report generated"
    );

    Ok(Json(report))
}
