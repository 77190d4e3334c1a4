//! IBT: cash-rate table inside the `#ibt` section.
//!
//! Rows use a `th` for the currency code and two `td`s for buy and
//! sell. The site serves a broken certificate chain, so the lenient
//! client is used.

use async_trait::async_trait;
use scraper::Html;

use crate::domain::{CurrencyCode, RawRate};
use crate::error::AggregatorError;
use crate::scrape::html::{child_texts, first_match, selector, text_of};
use crate::scrape::{FetchContext, SourceAdapter, SourceInfo, SourceKind, fetch_text};

/// IBT source adapter.
#[derive(Debug)]
pub struct Ibt {
    url: String,
}

impl Ibt {
    const URL: &'static str = "https://www.ibt.tj/";
    const TABLE_SELECTORS: [&'static str; 2] = ["div#ibt table.table", "div#ibt table"];

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
        let table = first_match(&document, &Self::TABLE_SELECTORS)?
            .ok_or_else(|| AggregatorError::Format("ibt rate table not found".to_string()))?;

        let row_sel = selector("tr")?;
        let header_sel = selector("th")?;
        let mut rates = Vec::new();

        for row in table.select(&row_sel) {
            let Some(header) = row.select(&header_sel).next() else {
                continue;
            };
            let label = text_of(header);
            if CurrencyCode::resolve(&label).is_none() {
                continue;
            }

            let cells = child_texts(row, "td")?;
            let (Some(buy), Some(sell)) = (cells.first(), cells.get(1)) else {
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

impl Default for Ibt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for Ibt {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: "IBT",
            short_name: "IBT",
            website: "https://www.ibt.tj",
            kind: SourceKind::StaticHtml,
        }
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawRate>, AggregatorError> {
        let html = fetch_text(&ctx.http_insecure, &self.url).await?;
        Self::parse(&html)
    }
}
