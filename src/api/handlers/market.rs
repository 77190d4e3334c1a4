//! Market-rate endpoints: worker submissions, listings, activity log.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::auth::AuthUser;
use crate::api::dto::{
    ActivityResponse, CreateMarketRateRequest, MarketListParams, MarketListResponse,
    MarketRateResponse, PaginationParams,
};
use crate::app_state::AppState;
use crate::domain::Role;
use crate::error::{AggregatorError, ErrorResponse};
use crate::service::SubmitRateRequest;

/// `POST /rates/market` — Submit a market rate.
///
/// # Errors
///
/// Returns [`AggregatorError::Authorization`] when the caller may not
/// write for the target city, [`AggregatorError::Validation`] on a bad
/// payload.
#[utoipa::path(
    post,
    path = "/api/v1/rates/market",
    tag = "Market Rates",
    summary = "Submit a market rate",
    description = "City workers write to their assigned city; admins name a city explicitly. Requires 0 < buy < sell.",
    request_body = CreateMarketRateRequest,
    responses(
        (status = 201, description = "Rate stored", body = MarketRateResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not authorized for the city", body = ErrorResponse),
    )
)]
pub async fn create_market_rate(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateMarketRateRequest>,
) -> Result<impl IntoResponse, AggregatorError> {
    let rate = state
        .market
        .submit(
            &auth.0,
            SubmitRateRequest {
                currency: request.currency,
                city_name: request.city_name,
                buy: request.buy,
                sell: request.sell,
                notes: request.notes,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(MarketRateResponse { rate })))
}

/// `GET /rates/market` — Market rates visible to the caller.
///
/// Admins see every city (optionally filtered); workers see their
/// assigned city; other roles see nothing.
///
/// # Errors
///
/// Returns [`AggregatorError`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/rates/market",
    tag = "Market Rates",
    summary = "List market rates",
    description = "Role-scoped listing: admins see all cities, workers their own city only.",
    params(MarketListParams),
    responses(
        (status = 200, description = "Market rates", body = MarketListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn list_market_rates(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<MarketListParams>,
) -> Result<impl IntoResponse, AggregatorError> {
    let pagination = PaginationParams {
        page: params.page,
        per_page: params.per_page,
    }
    .clamped();

    let scope = match auth.0.role {
        Role::Admin => params.city,
        // A worker without an assigned city sees nothing, like any
        // other non-admin role.
        Role::CityWorker if auth.0.city.is_some() => auth.0.city.clone(),
        Role::CityWorker | Role::User => {
            return Ok(Json(MarketListResponse {
                data: Vec::new(),
                pagination: pagination.meta(0),
            }));
        }
    };

    let data = state
        .store
        .market_rates(scope.as_deref(), pagination.limit(), pagination.offset())
        .await?;
    let total = state.store.count_market_rates(scope.as_deref()).await?;

    Ok(Json(MarketListResponse {
        data,
        pagination: pagination.meta(u32::try_from(total).unwrap_or(u32::MAX)),
    }))
}

/// `GET /activity` — Worker activity log (admin only).
///
/// # Errors
///
/// Returns [`AggregatorError::Authorization`] for non-admins.
#[utoipa::path(
    get,
    path = "/api/v1/activity",
    tag = "Market Rates",
    summary = "Worker activity log",
    description = "Append-only audit trail of market-rate actions, newest first.",
    params(crate::api::dto::PaginationParams),
    responses(
        (status = 200, description = "Activity entries", body = ActivityResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
    )
)]
pub async fn list_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, AggregatorError> {
    auth.require_admin()?;
    let pagination = params.clamped();

    let data = state
        .store
        .worker_activity(pagination.limit(), pagination.offset())
        .await?;
    let total = state.store.count_worker_activity().await?;

    Ok(Json(ActivityResponse {
        data,
        pagination: pagination.meta(u32::try_from(total).unwrap_or(u32::MAX)),
    }))
}

/// Market-rate routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/rates/market",
            post(create_market_rate).get(list_market_rates),
        )
        .route("/activity", get(list_activity))
}
