//! Oriyonbonk: utility-class grid rows on the homepage.
//!
//! Each rate row is a `div.grid` whose first `p` carries a
//! `"1 USD"`-style label and whose two `p.text-right` children carry
//! buy and sell.

use async_trait::async_trait;
use scraper::Html;

use crate::domain::{CurrencyCode, RawRate};
use crate::error::AggregatorError;
use crate::scrape::html::{child_texts, selector, text_of};
use crate::scrape::{FetchContext, SourceAdapter, SourceInfo, SourceKind, fetch_text};

/// Oriyonbonk source adapter.
#[derive(Debug)]
pub struct Oriyonbonk {
    url: String,
}

impl Oriyonbonk {
    const URL: &'static str = "https://oriyonbonk.tj/ru";

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

    fn parse(html: &str) -> Result<Vec<RawRate>, AggregatorError> {
        let document = Html::parse_document(html);
        let row_sel = selector("div.grid")?;
        let label_sel = selector("p")?;

        let mut rates = Vec::new();

        for row in document.select(&row_sel) {
            let Some(label_el) = row.select(&label_sel).next() else {
                continue;
            };
            let label = text_of(label_el);
            if CurrencyCode::resolve(&label).is_none() {
                continue;
            }

            let values = child_texts(row, "p.text-right")?;
            let (Some(buy), Some(sell)) = (values.first(), values.get(1)) else {
                continue;
            };
            rates.push(RawRate::new(label, buy.clone(), sell.clone()));
        }

        if rates.is_empty() {
            return Err(AggregatorError::Format(
                "no rate rows matched the allow-list".to_string(),
            ));
        }
        Ok(rates)
    }
}

impl Default for Oriyonbonk {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for Oriyonbonk {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: "Oriyonbonk",
            short_name: "Oriyon",
            website: "https://oriyonbonk.tj",
            kind: SourceKind::StaticHtml,
        }
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawRate>, AggregatorError> {
        let html = fetch_text(&ctx.http, &self.url).await?;
        Self::parse(&html)
    }
}
