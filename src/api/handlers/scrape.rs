//! Aggregation trigger endpoint.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::auth::AuthUser;
use crate::app_state::AppState;
use crate::error::{AggregatorError, ErrorResponse};
use crate::service::RunReport;

/// `POST /scrape/run` — Run one aggregation pass (admin only).
///
/// This is the hook an external scheduler calls. The pass runs to
/// completion before responding; individual source failures are
/// reported in the body, never as an error status.
///
/// # Errors
///
/// Returns [`AggregatorError::Authorization`] for non-admins.
#[utoipa::path(
    post,
    path = "/api/v1/scrape/run",
    tag = "Scraping",
    summary = "Run one aggregation pass",
    description = "Sequentially scrapes every configured source and returns the per-source report.",
    responses(
        (status = 200, description = "Run report", body = RunReport),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
    )
)]
pub async fn run_scrape(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AggregatorError> {
    auth.require_admin()?;
    let report = state.aggregator.run_once().await;
    Ok(Json(report))
}

/// Scrape-trigger routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/scrape/run", post(run_scrape))
}
