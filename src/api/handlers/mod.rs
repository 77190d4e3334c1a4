//! REST endpoint handlers organized by resource.

pub mod market;
pub mod rates;
pub mod scrape;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(rates::routes())
        .merge(market::routes())
        .merge(scrape::routes())
        .merge(system::api_routes())
}
