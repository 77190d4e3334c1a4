//! Raw and normalized rate shapes plus the shared numeric normalizer.
//!
//! Every source adapter produces [`RawRate`]s — whatever strings the
//! bank site exposed. [`normalize`] converts one into a
//! [`NormalizedRate`] with a canonical currency code and decimal
//! values, or fails with a format error the orchestrator records
//! against that source.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use super::CurrencyCode;
use crate::error::AggregatorError;

/// An unnormalized rate observation straight from a source.
///
/// `buy` and `sell` are kept as strings because sources disagree on
/// formatting: comma decimals, embedded symbols, surrounding junk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRate {
    /// Free-text currency label as the source printed it.
    pub label: String,
    /// Buy rate as printed.
    pub buy: String,
    /// Sell rate as printed.
    pub sell: String,
}

impl RawRate {
    /// Creates a raw rate from source strings.
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        buy: impl Into<String>,
        sell: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            buy: buy.into(),
            sell: sell.into(),
        }
    }
}

/// A rate observation with canonical currency code and decimal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NormalizedRate {
    /// Canonical currency code.
    pub currency: CurrencyCode,
    /// Buy rate in TJS.
    pub buy: Decimal,
    /// Sell rate in TJS.
    pub sell: Decimal,
}

/// Parses a locale-formatted rate string into a [`Decimal`].
///
/// Strips every character except digits, comma, and period, then
/// replaces the comma decimal separator with a period. `"12,3456 смт"`
/// parses to `12.3456`.
///
/// # Errors
///
/// Returns [`AggregatorError::Format`] when nothing parseable remains
/// after stripping.
pub fn parse_rate_value(raw: &str) -> Result<Decimal, AggregatorError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return Err(AggregatorError::Format(format!(
            "no numeric content in rate value {raw:?}"
        )));
    }

    Decimal::from_str(&cleaned)
        .map_err(|_| AggregatorError::Format(format!("unparseable rate value {raw:?}")))
}

/// Normalizes a raw source rate into canonical form.
///
/// Bank observations are accepted as published — including `buy >=
/// sell`, which some banks print for illiquid instruments and which
/// the central bank's single official rate produces by construction.
/// Only non-positive values are rejected.
///
/// # Errors
///
/// Returns [`AggregatorError::Format`] when the label is outside the
/// allow-list, a value fails to parse, or a value is not positive.
pub fn normalize(raw: &RawRate) -> Result<NormalizedRate, AggregatorError> {
    let currency = CurrencyCode::resolve(&raw.label).ok_or_else(|| {
        AggregatorError::Format(format!("unrecognized currency label {:?}", raw.label))
    })?;

    let buy = parse_rate_value(&raw.buy)?;
    let sell = parse_rate_value(&raw.sell)?;

    if buy <= Decimal::ZERO || sell <= Decimal::ZERO {
        return Err(AggregatorError::Format(format!(
            "non-positive rate for {currency}: buy={buy} sell={sell}"
        )));
    }

    Ok(NormalizedRate {
        currency,
        buy,
        sell,
    })
}
