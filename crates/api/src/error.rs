//! Mapping of domain errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gascon_core::aggregation::AggregationError;
use gascon_core::consumption::ConsumptionError;
use gascon_core::contract::ContractError;
use gascon_core::period::PeriodError;
use gascon_shared::AppError;
use serde_json::json;
use tracing::error;

use crate::store::StoreError;

/// Handler error carrying an `AppError`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": self.0.to_string()
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<PeriodError> for ApiError {
    fn from(err: PeriodError) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl From<ConsumptionError> for ApiError {
    fn from(err: ConsumptionError) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl From<ContractError> for ApiError {
    fn from(err: ContractError) -> Self {
        let message = err.to_string();
        Self(match err {
            ContractError::NotFound { .. } => AppError::NotFound(message),
            ContractError::Ambiguous { .. } => AppError::BusinessRule(message),
            ContractError::InvalidTolerances(_) => AppError::Validation(message),
        })
    }
}

impl From<AggregationError> for ApiError {
    fn from(err: AggregationError) -> Self {
        let message = err.to_string();
        match err {
            AggregationError::NoActiveContract => Self(AppError::NotFound(message)),
            AggregationError::Contract(inner) => inner.into(),
            AggregationError::Period(inner) => inner.into(),
            AggregationError::Consumption(_) => Self(AppError::BusinessRule(message)),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(AppError::Storage(err.to_string()))
    }
}
