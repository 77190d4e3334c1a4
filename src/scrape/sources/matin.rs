//! Matin: JSON API listing every quoted currency.
//!
//! The endpoint returns an array of `{currency, valuebuy, valuesale}`
//! covering more currencies than the aggregator tracks; entries
//! outside the allow-list are dropped here. The site serves a broken
//! certificate chain, so the lenient client is used.

use async_trait::async_trait;

use crate::domain::{CurrencyCode, RawRate};
use crate::error::AggregatorError;
use crate::scrape::{FetchContext, RateField, SourceAdapter, SourceInfo, SourceKind, fetch_json};

/// Matin source adapter.
#[derive(Debug)]
pub struct Matin {
    url: String,
}

#[derive(Debug, serde::Deserialize)]
struct MatinQuote {
    currency: String,
    valuebuy: RateField,
    valuesale: RateField,
}

impl Matin {
    const URL: &'static str = "https://matin.tj/api/currency";

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

    fn project(quotes: Vec<MatinQuote>) -> Result<Vec<RawRate>, AggregatorError> {
        let rates: Vec<RawRate> = quotes
            .into_iter()
            .filter(|quote| CurrencyCode::resolve(&quote.currency).is_some())
            .map(|quote| {
                RawRate::new(
                    quote.currency,
                    quote.valuebuy.into_raw(),
                    quote.valuesale.into_raw(),
                )
            })
            .collect();

        if rates.is_empty() {
            return Err(AggregatorError::Format(
                "no tracked currencies in response".to_string(),
            ));
        }
        Ok(rates)
    }
}

impl Default for Matin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for Matin {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: "Matin",
            short_name: "Matin",
            website: "https://matin.tj",
            kind: SourceKind::JsonApi,
        }
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawRate>, AggregatorError> {
        let quotes: Vec<MatinQuote> = fetch_json(&ctx.http_insecure, &self.url).await?;
        Self::project(quotes)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn drops_untracked_currencies() {
        let Ok(quotes) = serde_json::from_str::<Vec<MatinQuote>>(
            r#"[
                {"currency":"USD","valuebuy":"10.45","valuesale":"10.60"},
                {"currency":"CNY","valuebuy":"1.45","valuesale":"1.52"},
                {"currency":"RUR","valuebuy":0.115,"valuesale":0.121}
            ]"#,
        ) else {
            panic!("fixture should deserialize");
        };

        let Ok(rates) = Matin::project(quotes) else {
            panic!("projection should succeed");
        };
        assert_eq!(rates.len(), 2);
        // Legacy RUR label is kept raw; the normalizer canonicalizes it.
        assert_eq!(rates.get(1), Some(&RawRate::new("RUR", "0.115", "0.121")));
    }

    #[test]
    fn only_untracked_currencies_is_a_format_error() {
        let Ok(quotes) = serde_json::from_str::<Vec<MatinQuote>>(
            r#"[{"currency":"CNY","valuebuy":"1.45","valuesale":"1.52"}]"#,
        ) else {
            panic!("fixture should deserialize");
        };
        assert!(matches!(
            Matin::project(quotes),
            Err(AggregatorError::Format(_))
        ));
    }
}
