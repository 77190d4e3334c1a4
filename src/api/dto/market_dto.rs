//! Market-rate and activity-log DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common_dto::{PaginationMeta, default_page, default_per_page};
use crate::persistence::models::{MarketRateRow, WorkerActivityRow};

/// Request body for `POST /rates/market`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreateMarketRateRequest {
    /// Currency code (`USD`, `EUR`, `RUB`).
    pub currency: String,
    /// Target city. Required for admins; ignored for city workers.
    #[serde(default)]
    pub city_name: Option<String>,
    /// Buy rate; must be positive and lower than `sell`.
    pub buy: Decimal,
    /// Sell rate; must be positive.
    pub sell: Decimal,
    /// Optional free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Response body for `POST /rates/market` (201 Created).
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MarketRateResponse {
    /// The stored rate row.
    pub rate: MarketRateRow,
}

/// Query parameters for `GET /rates/market`.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct MarketListParams {
    /// City filter; admins only, workers are always scoped to their
    /// assigned city.
    #[serde(default)]
    pub city: Option<String>,
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

/// Response body for `GET /rates/market`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MarketListResponse {
    /// Market rates visible to the caller, newest first.
    pub data: Vec<MarketRateRow>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Response body for `GET /activity`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ActivityResponse {
    /// Activity entries, newest first.
    pub data: Vec<WorkerActivityRow>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
