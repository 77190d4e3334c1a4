//! Bank-rate DTOs for the read endpoints.

use serde::{Deserialize, Serialize};

use super::common_dto::{PaginationMeta, default_page, default_per_page};
use crate::persistence::models::BankRateRow;

/// Query parameters for `GET /rates/banks`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
pub struct LatestRatesParams {
    /// Optional currency filter (`USD`, `EUR`, `RUB`).
    #[serde(default)]
    pub currency: Option<String>,
}

/// Response body for `GET /rates/banks`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LatestRatesResponse {
    /// Latest observation per (bank, currency).
    pub data: Vec<BankRateRow>,
}

/// Query parameters for `GET /rates/banks/history`.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct HistoryParams {
    /// Optional bank-name filter.
    #[serde(default)]
    pub bank: Option<String>,
    /// Optional currency filter (`USD`, `EUR`, `RUB`).
    #[serde(default)]
    pub currency: Option<String>,
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

/// Response body for `GET /rates/banks/history`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HistoryResponse {
    /// Observations, newest first.
    pub data: Vec<BankRateRow>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
