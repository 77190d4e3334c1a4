//! Azizi Moliya: JSON API keyed by lowercase currency code.
//!
//! The endpoint returns `{"usd": {"kassa_buy": .., "kassa_sell": ..},
//! "eur": ..., "rub": ...}`; the kassa (cash desk) pair is the one
//! published on the site.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::RawRate;
use crate::error::AggregatorError;
use crate::scrape::{FetchContext, RateField, SourceAdapter, SourceInfo, SourceKind, fetch_json};

const CODES: [&str; 3] = ["usd", "eur", "rub"];

/// Azizi Moliya source adapter.
#[derive(Debug)]
pub struct AziziMoliya {
    url: String,
}

#[derive(Debug, serde::Deserialize)]
struct AziziQuote {
    kassa_buy: RateField,
    kassa_sell: RateField,
}

impl AziziMoliya {
    const URL: &'static str = "https://azizimoliya.tj/rates-api/";

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

    fn project(mut quotes: HashMap<String, AziziQuote>) -> Result<Vec<RawRate>, AggregatorError> {
        let rates: Vec<RawRate> = CODES
            .iter()
            .filter_map(|code| {
                quotes.remove(*code).map(|quote| {
                    RawRate::new(
                        code.to_uppercase(),
                        quote.kassa_buy.into_raw(),
                        quote.kassa_sell.into_raw(),
                    )
                })
            })
            .collect();

        if rates.is_empty() {
            return Err(AggregatorError::Format(
                "no tracked currencies in rates payload".to_string(),
            ));
        }
        Ok(rates)
    }
}

impl Default for AziziMoliya {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for AziziMoliya {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: "Azizi Moliya",
            short_name: "Azizi",
            website: "https://azizimoliya.tj",
            kind: SourceKind::JsonApi,
        }
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawRate>, AggregatorError> {
        let quotes: HashMap<String, AziziQuote> = fetch_json(&ctx.http, &self.url).await?;
        Self::project(quotes)
    }
}
