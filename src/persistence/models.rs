//! Database row models for rates, reference data, and the audit log.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::CurrencyCode;

/// A bank-rate observation row joined with its reference data.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct BankRateRow {
    /// Auto-increment row ID.
    pub id: i64,
    /// Bank name.
    pub bank: String,
    /// Currency code.
    pub currency: CurrencyCode,
    /// Buy rate.
    pub buy: Decimal,
    /// Sell rate.
    pub sell: Decimal,
    /// Observation date.
    pub rate_date: NaiveDate,
    /// Observation time.
    pub rate_time: NaiveTime,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A market rate row as stored.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct MarketRateRow {
    /// Auto-increment row ID.
    pub id: i64,
    /// Currency code.
    pub currency: CurrencyCode,
    /// City the rate was observed in.
    pub city_name: String,
    /// Buy rate.
    pub buy: Decimal,
    /// Sell rate.
    pub sell: Decimal,
    /// Observation date.
    pub rate_date: NaiveDate,
    /// Observation time.
    pub rate_time: NaiveTime,
    /// Username of the submitting worker or admin.
    pub added_by: String,
    /// Free-text notes.
    pub notes: String,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A new market rate to insert, already authorized and validated.
#[derive(Debug, Clone)]
pub struct NewMarketRate {
    /// Currency code.
    pub currency: CurrencyCode,
    /// Target city.
    pub city_name: String,
    /// Buy rate.
    pub buy: Decimal,
    /// Sell rate.
    pub sell: Decimal,
    /// Username of the submitter.
    pub added_by: String,
    /// Free-text notes.
    pub notes: String,
}

/// A worker-activity audit row.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct WorkerActivityRow {
    /// Auto-increment row ID.
    pub id: i64,
    /// Username of the worker the entry is about.
    pub worker: String,
    /// Action discriminator (e.g. `"add_rate"`).
    pub action: String,
    /// Human-readable description.
    pub description: String,
    /// Market rate the action refers to, if any.
    pub related_rate_id: Option<i64>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A new activity entry to append.
#[derive(Debug, Clone)]
pub struct NewActivity {
    /// Username of the worker the entry is about.
    pub worker: String,
    /// Action discriminator.
    pub action: String,
    /// Human-readable description.
    pub description: String,
    /// Market rate the action refers to, if any.
    pub related_rate_id: Option<i64>,
}
