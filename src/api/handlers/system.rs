//! System endpoints: health check, source catalog, city directory.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::City;
use crate::scrape::SourceKind;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Configured source info.
#[derive(Debug, Serialize, ToSchema)]
struct SourceInfoDto {
    name: String,
    short_name: String,
    website: String,
    kind: SourceKind,
}

/// `GET /config/sources` — List configured rate sources.
#[utoipa::path(
    get,
    path = "/config/sources",
    tag = "System",
    summary = "List configured sources",
    description = "Returns metadata for every bank source the aggregator scrapes, in run order.",
    responses(
        (status = 200, description = "Source catalog", body = Vec<SourceInfoDto>),
    )
)]
pub async fn sources_handler(State(state): State<AppState>) -> impl IntoResponse {
    let sources: Vec<SourceInfoDto> = state
        .aggregator
        .sources()
        .into_iter()
        .map(|info| SourceInfoDto {
            name: info.name.to_string(),
            short_name: info.short_name.to_string(),
            website: info.website.to_string(),
            kind: info.kind,
        })
        .collect();
    (StatusCode::OK, Json(sources))
}

/// City directory response.
#[derive(Debug, Serialize, ToSchema)]
struct CitiesResponse {
    cities: Vec<City>,
}

/// `GET /api/v1/cities` — List known cities.
#[utoipa::path(
    get,
    path = "/api/v1/cities",
    tag = "System",
    summary = "List cities",
    description = "Returns the city directory used for market-rate validation.",
    responses(
        (status = 200, description = "Cities", body = CitiesResponse),
    )
)]
pub async fn cities_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(CitiesResponse {
            cities: state.cities.cities().to_vec(),
        }),
    )
}

/// System routes mounted at the root level (not under /api/v1).
pub fn root_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/sources", get(sources_handler))
}

/// System routes mounted under /api/v1.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/cities", get(cities_handler))
}
