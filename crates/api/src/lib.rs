//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes over the consumption engine
//! - The record store seam (`ConsumptionStore`)
//! - Mapping of domain errors onto HTTP responses

pub mod error;
pub mod routes;
pub mod store;

use std::sync::Arc;

use axum::Router;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use gascon_core::period::local_date;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use store::{ConsumptionStore, Dataset, InMemoryStore, StoreError};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Record store.
    pub store: Arc<dyn ConsumptionStore>,
    /// Timezone deciding calendar-day boundaries.
    pub timezone: Tz,
}

impl AppState {
    /// Today's date in the organization timezone.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        local_date(Utc::now(), self.timezone)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
