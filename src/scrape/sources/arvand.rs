//! Arvand: JSON API listing quotes per rate type.
//!
//! The endpoint returns an array of `{currency_name, buy_rate,
//! sell_rate, type_currency}`; only `CASH_RATE` entries count, and the
//! first entry per currency wins. The site serves a broken certificate
//! chain, so the lenient client is used.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::{CurrencyCode, RawRate};
use crate::error::AggregatorError;
use crate::scrape::{FetchContext, RateField, SourceAdapter, SourceInfo, SourceKind, fetch_json};

/// Arvand source adapter.
#[derive(Debug)]
pub struct Arvand {
    url: String,
}

#[derive(Debug, serde::Deserialize)]
struct ArvandQuote {
    currency_name: String,
    buy_rate: RateField,
    sell_rate: RateField,
    type_currency: String,
}

impl Arvand {
    const URL: &'static str = "https://arvand.tj/api/currencies/";

    /// Adapter pointed at the production endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            url: Self::URL.to_string(),
        }
    }

    /// Adapter pointed at a custom endpoint (tests).
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    fn project(quotes: Vec<ArvandQuote>) -> Result<Vec<RawRate>, AggregatorError> {
        let mut seen = HashSet::new();
        let mut rates = Vec::new();

        for quote in quotes {
            if quote.type_currency != "CASH_RATE" {
                continue;
            }
            let Some(code) = CurrencyCode::resolve(&quote.currency_name) else {
                continue;
            };
            if !seen.insert(code) {
                continue;
            }
            rates.push(RawRate::new(
                quote.currency_name,
                quote.buy_rate.into_raw(),
                quote.sell_rate.into_raw(),
            ));
        }

        if rates.is_empty() {
            return Err(AggregatorError::Format(
                "no CASH_RATE entries for tracked currencies".to_string(),
            ));
        }
        Ok(rates)
    }
}

impl Default for Arvand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for Arvand {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: "Arvand",
            short_name: "Arvand",
            website: "https://arvand.tj",
            kind: SourceKind::JsonApi,
        }
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawRate>, AggregatorError> {
        let quotes: Vec<ArvandQuote> = fetch_json(&ctx.http_insecure, &self.url).await?;
        Self::project(quotes)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn fixture() -> Vec<ArvandQuote> {
        let Ok(quotes) = serde_json::from_str::<Vec<ArvandQuote>>(
            r#"[
                {"currency_name":"USD","buy_rate":"10.40","sell_rate":"10.55","type_currency":"TRANSFER_RATE"},
                {"currency_name":"USD","buy_rate":"10.45","sell_rate":"10.60","type_currency":"CASH_RATE"},
                {"currency_name":"USD","buy_rate":"10.00","sell_rate":"11.00","type_currency":"CASH_RATE"},
                {"currency_name":"EUR","buy_rate":11.95,"sell_rate":12.35,"type_currency":"CASH_RATE"},
                {"currency_name":"GBP","buy_rate":"13.0","sell_rate":"13.5","type_currency":"CASH_RATE"}
            ]"#,
        ) else {
            panic!("fixture should deserialize");
        };
        quotes
    }

    #[test]
    fn keeps_first_cash_rate_per_currency() {
        let Ok(rates) = Arvand::project(fixture()) else {
            panic!("projection should succeed");
        };

        assert_eq!(rates.len(), 2);
        assert_eq!(rates.first(), Some(&RawRate::new("USD", "10.45", "10.60")));
        assert_eq!(rates.get(1), Some(&RawRate::new("EUR", "11.95", "12.35")));
    }

    #[test]
    fn no_cash_rates_is_a_format_error() {
        let Ok(quotes) = serde_json::from_str::<Vec<ArvandQuote>>(
            r#"[{"currency_name":"USD","buy_rate":"10.4","sell_rate":"10.5","type_currency":"TRANSFER_RATE"}]"#,
        ) else {
            panic!("fixture should deserialize");
        };
        assert!(matches!(
            Arvand::project(quotes),
            Err(AggregatorError::Format(_))
        ));
    }
}
