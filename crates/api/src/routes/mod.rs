//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod consumption;
pub mod health;
pub mod reports;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(consumption::routes())
        .merge(reports::routes())
}
