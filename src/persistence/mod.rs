//! Persistence layer: PostgreSQL reference data and rate observations.
//!
//! Observation tables are append-only. The [`RateSink`] and
//! [`MarketStore`] traits are the seams the services write through;
//! [`postgres::RateStore`] implements both over `sqlx::PgPool`.

pub mod models;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::NormalizedRate;
use crate::error::AggregatorError;
use crate::scrape::SourceInfo;
use self::models::{MarketRateRow, NewActivity, NewMarketRate};

/// Destination for scraped bank-rate observations.
///
/// `save_bank_rate` appends; it never deduplicates. Two identical
/// calls produce two observation rows — rate history is the sequence
/// of appends.
#[async_trait]
pub trait RateSink: Send + Sync {
    /// Resolves/creates the bank and currency reference rows, then
    /// appends one observation row.
    ///
    /// # Errors
    ///
    /// Returns [`AggregatorError::Persistence`] on database failure.
    async fn save_bank_rate(
        &self,
        source: &SourceInfo,
        rate: &NormalizedRate,
    ) -> Result<(), AggregatorError>;
}

/// Destination for worker-submitted market rates and the activity log.
#[async_trait]
pub trait MarketStore: Send + Sync {
    /// Inserts a market rate row and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`AggregatorError::Persistence`] on database failure.
    async fn insert_market_rate(
        &self,
        rate: NewMarketRate,
    ) -> Result<MarketRateRow, AggregatorError>;

    /// Appends one worker-activity row.
    ///
    /// # Errors
    ///
    /// Returns [`AggregatorError::Persistence`] on database failure.
    async fn append_activity(&self, activity: NewActivity) -> Result<(), AggregatorError>;
}
