//! Bank-rate read endpoints.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    HistoryParams, HistoryResponse, LatestRatesParams, LatestRatesResponse, PaginationParams,
};
use crate::app_state::AppState;
use crate::domain::CurrencyCode;
use crate::error::{AggregatorError, ErrorResponse};

/// Parses an optional `currency` query value against the allow-list.
fn parse_currency_filter(
    param: Option<&str>,
) -> Result<Option<CurrencyCode>, AggregatorError> {
    match param {
        None => Ok(None),
        Some(raw) => CurrencyCode::resolve(raw)
            .map(Some)
            .ok_or_else(|| AggregatorError::Validation(format!("unknown currency {raw:?}"))),
    }
}

/// `GET /rates/banks` — Latest observation per (bank, currency).
///
/// # Errors
///
/// Returns [`AggregatorError`] on an unknown currency filter or
/// database failure.
#[utoipa::path(
    get,
    path = "/api/v1/rates/banks",
    tag = "Bank Rates",
    summary = "Latest bank rates",
    description = "Returns the most recent observation for every (bank, currency) pair, optionally filtered by currency.",
    params(LatestRatesParams),
    responses(
        (status = 200, description = "Latest rates", body = LatestRatesResponse),
        (status = 400, description = "Unknown currency", body = ErrorResponse),
    )
)]
pub async fn latest_rates(
    State(state): State<AppState>,
    Query(params): Query<LatestRatesParams>,
) -> Result<impl IntoResponse, AggregatorError> {
    let currency = parse_currency_filter(params.currency.as_deref())?;
    let data = state.store.latest_bank_rates(currency).await?;
    Ok(Json(LatestRatesResponse { data }))
}

/// `GET /rates/banks/history` — Paginated observation history.
///
/// # Errors
///
/// Returns [`AggregatorError`] on an unknown currency filter or
/// database failure.
#[utoipa::path(
    get,
    path = "/api/v1/rates/banks/history",
    tag = "Bank Rates",
    summary = "Bank rate history",
    description = "Returns observation history newest first, optionally filtered by bank and currency.",
    params(HistoryParams),
    responses(
        (status = 200, description = "Observation history", body = HistoryResponse),
        (status = 400, description = "Unknown currency", body = ErrorResponse),
    )
)]
pub async fn rate_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, AggregatorError> {
    let currency = parse_currency_filter(params.currency.as_deref())?;
    let pagination = PaginationParams {
        page: params.page,
        per_page: params.per_page,
    }
    .clamped();

    let data = state
        .store
        .bank_rate_history(
            params.bank.as_deref(),
            currency,
            pagination.limit(),
            pagination.offset(),
        )
        .await?;
    let total = state
        .store
        .count_bank_rate_history(params.bank.as_deref(), currency)
        .await?;

    Ok(Json(HistoryResponse {
        data,
        pagination: pagination.meta(u32::try_from(total).unwrap_or(u32::MAX)),
    }))
}

/// Bank-rate routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rates/banks", get(latest_rates))
        .route("/rates/banks/history", get(rate_history))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_filter_accepts_known_codes() {
        assert!(matches!(
            parse_currency_filter(Some("USD")),
            Ok(Some(CurrencyCode::Usd))
        ));
        assert!(matches!(parse_currency_filter(None), Ok(None)));
    }

    #[test]
    fn currency_filter_rejects_unknown_codes() {
        assert!(matches!(
            parse_currency_filter(Some("GBP")),
            Err(AggregatorError::Validation(_))
        ));
    }
}
