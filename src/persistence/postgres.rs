//! PostgreSQL implementation of the persistence layer.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::models::{
    BankRateRow, MarketRateRow, NewActivity, NewMarketRate, WorkerActivityRow,
};
use super::{MarketStore, RateSink};
use crate::domain::{CurrencyCode, NormalizedRate};
use crate::error::AggregatorError;
use crate::scrape::SourceInfo;

/// PostgreSQL-backed rate store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct RateStore {
    pool: PgPool,
}

impl RateStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolves a currency reference row, creating it on first sight.
    ///
    /// INSERT … ON CONFLICT DO NOTHING followed by a SELECT, so two
    /// concurrent observers of a new code converge on one row.
    async fn currency_id(&self, code: CurrencyCode) -> Result<i64, AggregatorError> {
        sqlx::query(
            "INSERT INTO currencies (code, name, symbol) VALUES ($1, $2, $3) \
             ON CONFLICT (code) DO NOTHING",
        )
        .bind(code.as_str())
        .bind(code.name())
        .bind(code.symbol())
        .execute(&self.pool)
        .await?;

        let id = sqlx::query_scalar::<_, i64>("SELECT id FROM currencies WHERE code = $1")
            .bind(code.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    /// Resolves a bank reference row, creating it on first successful
    /// scrape.
    async fn bank_id(&self, source: &SourceInfo) -> Result<i64, AggregatorError> {
        sqlx::query(
            "INSERT INTO banks (name, short_name, website) VALUES ($1, $2, $3) \
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(source.name)
        .bind(source.short_name)
        .bind(source.website)
        .execute(&self.pool)
        .await?;

        let id = sqlx::query_scalar::<_, i64>("SELECT id FROM banks WHERE name = $1")
            .bind(source.name)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    /// Latest observation per (bank, currency) using `DISTINCT ON`.
    ///
    /// # Errors
    ///
    /// Returns [`AggregatorError::Persistence`] on database failure.
    pub async fn latest_bank_rates(
        &self,
        currency: Option<CurrencyCode>,
    ) -> Result<Vec<BankRateRow>, AggregatorError> {
        let rows = sqlx::query_as::<_, BankRateTuple>(
            "SELECT DISTINCT ON (r.bank_id, r.currency_id) \
                 r.id, b.name, c.code, r.buy, r.sell, r.rate_date, r.rate_time, r.created_at \
             FROM bank_rates r \
             JOIN banks b ON b.id = r.bank_id \
             JOIN currencies c ON c.id = r.currency_id \
             WHERE r.is_active AND ($1::text IS NULL OR c.code = $1) \
             ORDER BY r.bank_id, r.currency_id, r.created_at DESC",
        )
        .bind(currency.map(|c| c.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(bank_rate_row).collect()
    }

    /// Observation history, newest first, optionally filtered by bank
    /// and currency.
    ///
    /// # Errors
    ///
    /// Returns [`AggregatorError::Persistence`] on database failure.
    pub async fn bank_rate_history(
        &self,
        bank: Option<&str>,
        currency: Option<CurrencyCode>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BankRateRow>, AggregatorError> {
        let rows = sqlx::query_as::<_, BankRateTuple>(
            "SELECT r.id, b.name, c.code, r.buy, r.sell, r.rate_date, r.rate_time, r.created_at \
             FROM bank_rates r \
             JOIN banks b ON b.id = r.bank_id \
             JOIN currencies c ON c.id = r.currency_id \
             WHERE r.is_active \
               AND ($1::text IS NULL OR b.name = $1) \
               AND ($2::text IS NULL OR c.code = $2) \
             ORDER BY r.created_at DESC \
             LIMIT $3 OFFSET $4",
        )
        .bind(bank)
        .bind(currency.map(|c| c.as_str()))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(bank_rate_row).collect()
    }

    /// Total observation count for the same filters as
    /// [`Self::bank_rate_history`].
    ///
    /// # Errors
    ///
    /// Returns [`AggregatorError::Persistence`] on database failure.
    pub async fn count_bank_rate_history(
        &self,
        bank: Option<&str>,
        currency: Option<CurrencyCode>,
    ) -> Result<i64, AggregatorError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) \
             FROM bank_rates r \
             JOIN banks b ON b.id = r.bank_id \
             JOIN currencies c ON c.id = r.currency_id \
             WHERE r.is_active \
               AND ($1::text IS NULL OR b.name = $1) \
               AND ($2::text IS NULL OR c.code = $2)",
        )
        .bind(bank)
        .bind(currency.map(|c| c.as_str()))
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Market rates, newest first, optionally filtered by city.
    ///
    /// # Errors
    ///
    /// Returns [`AggregatorError::Persistence`] on database failure.
    pub async fn market_rates(
        &self,
        city: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MarketRateRow>, AggregatorError> {
        let rows = sqlx::query_as::<_, MarketRateTuple>(
            "SELECT m.id, c.code, m.city_name, m.buy, m.sell, m.rate_date, m.rate_time, \
                    m.added_by, m.notes, m.created_at \
             FROM market_rates m \
             JOIN currencies c ON c.id = m.currency_id \
             WHERE m.is_active AND ($1::text IS NULL OR m.city_name = $1) \
             ORDER BY m.created_at DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(city)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(market_rate_row).collect()
    }

    /// Total market-rate count for the same filter as
    /// [`Self::market_rates`].
    ///
    /// # Errors
    ///
    /// Returns [`AggregatorError::Persistence`] on database failure.
    pub async fn count_market_rates(&self, city: Option<&str>) -> Result<i64, AggregatorError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM market_rates \
             WHERE is_active AND ($1::text IS NULL OR city_name = $1)",
        )
        .bind(city)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Total worker-activity count.
    ///
    /// # Errors
    ///
    /// Returns [`AggregatorError::Persistence`] on database failure.
    pub async fn count_worker_activity(&self) -> Result<i64, AggregatorError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM worker_activity")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Worker activity log, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AggregatorError::Persistence`] on database failure.
    pub async fn worker_activity(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WorkerActivityRow>, AggregatorError> {
        let rows = sqlx::query_as::<_, (i64, String, String, String, Option<i64>, DateTime<Utc>)>(
            "SELECT id, worker, action, description, related_rate_id, created_at \
             FROM worker_activity ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, worker, action, description, related_rate_id, created_at)| {
                    WorkerActivityRow {
                        id,
                        worker,
                        action,
                        description,
                        related_rate_id,
                        created_at,
                    }
                },
            )
            .collect())
    }
}

#[async_trait]
impl RateSink for RateStore {
    async fn save_bank_rate(
        &self,
        source: &SourceInfo,
        rate: &NormalizedRate,
    ) -> Result<(), AggregatorError> {
        let bank_id = self.bank_id(source).await?;
        let currency_id = self.currency_id(rate.currency).await?;

        // Plain INSERT: repeated identical observations append repeated
        // rows, which is the history contract.
        sqlx::query(
            "INSERT INTO bank_rates (bank_id, currency_id, buy, sell) VALUES ($1, $2, $3, $4)",
        )
        .bind(bank_id)
        .bind(currency_id)
        .bind(rate.buy)
        .bind(rate.sell)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl MarketStore for RateStore {
    async fn insert_market_rate(
        &self,
        rate: NewMarketRate,
    ) -> Result<MarketRateRow, AggregatorError> {
        let currency_id = self.currency_id(rate.currency).await?;

        let row = sqlx::query_as::<_, (i64, String, Decimal, Decimal, NaiveDate, NaiveTime, String, String, DateTime<Utc>)>(
            "INSERT INTO market_rates (currency_id, city_name, buy, sell, added_by, notes) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, city_name, buy, sell, rate_date, rate_time, added_by, notes, created_at",
        )
        .bind(currency_id)
        .bind(&rate.city_name)
        .bind(rate.buy)
        .bind(rate.sell)
        .bind(&rate.added_by)
        .bind(&rate.notes)
        .fetch_one(&self.pool)
        .await?;

        let (id, city_name, buy, sell, rate_date, rate_time, added_by, notes, created_at) = row;
        Ok(MarketRateRow {
            id,
            currency: rate.currency,
            city_name,
            buy,
            sell,
            rate_date,
            rate_time,
            added_by,
            notes,
            created_at,
        })
    }

    async fn append_activity(&self, activity: NewActivity) -> Result<(), AggregatorError> {
        sqlx::query(
            "INSERT INTO worker_activity (worker, action, description, related_rate_id) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&activity.worker)
        .bind(&activity.action)
        .bind(&activity.description)
        .bind(activity.related_rate_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

type BankRateTuple = (
    i64,
    String,
    String,
    Decimal,
    Decimal,
    NaiveDate,
    NaiveTime,
    DateTime<Utc>,
);

type MarketRateTuple = (
    i64,
    String,
    String,
    Decimal,
    Decimal,
    NaiveDate,
    NaiveTime,
    String,
    String,
    DateTime<Utc>,
);

fn decode_currency(code: &str) -> Result<CurrencyCode, AggregatorError> {
    CurrencyCode::resolve(code)
        .ok_or_else(|| AggregatorError::Persistence(format!("unknown currency code {code:?}")))
}

fn bank_rate_row(tuple: BankRateTuple) -> Result<BankRateRow, AggregatorError> {
    let (id, bank, code, buy, sell, rate_date, rate_time, created_at) = tuple;
    Ok(BankRateRow {
        id,
        bank,
        currency: decode_currency(&code)?,
        buy,
        sell,
        rate_date,
        rate_time,
        created_at,
    })
}

fn market_rate_row(tuple: MarketRateTuple) -> Result<MarketRateRow, AggregatorError> {
    let (id, code, city_name, buy, sell, rate_date, rate_time, added_by, notes, created_at) =
        tuple;
    Ok(MarketRateRow {
        id,
        currency: decode_currency(&code)?,
        city_name,
        buy,
        sell,
        rate_date,
        rate_time,
        added_by,
        notes,
        created_at,
    })
}
