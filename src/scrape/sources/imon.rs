//! Imon International: client-rendered currency cards.
//!
//! The homepage builds its rate cards in JavaScript: each card is a
//! `div.col-12.col-md.mt-3` with a Cyrillic currency word in
//! `h5.title` and buy/sell spans in two `div.col-6` columns.

use async_trait::async_trait;
use scraper::Html;

use crate::domain::{CurrencyCode, RawRate};
use crate::error::AggregatorError;
use crate::scrape::browser::{RenderTarget, fetch_rendered};
use crate::scrape::html::{selector, text_of};
use crate::scrape::{FetchContext, SourceAdapter, SourceInfo, SourceKind};

/// Imon source adapter.
#[derive(Debug)]
pub struct Imon {
    url: String,
}

impl Imon {
    const URL: &'static str = "https://www.imon.tj/";
    const WAIT_SELECTORS: [&'static str; 1] = ["div.col-12.col-md.mt-3"];

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
        let block_sel = selector("div.col-12.col-md.mt-3")?;
        let title_sel = selector("h5.title")?;
        let col_sel = selector("div.col-6")?;
        let span_sel = selector("span")?;

        let mut rates = Vec::new();

        for block in document.select(&block_sel) {
            let Some(title_el) = block.select(&title_sel).next() else {
                continue;
            };
            let label = text_of(title_el);
            if CurrencyCode::resolve(&label).is_none() {
                continue;
            }

            let mut columns = block.select(&col_sel);
            let (Some(buy_col), Some(sell_col)) = (columns.next(), columns.next()) else {
                continue;
            };
            let (Some(buy_el), Some(sell_el)) = (
                buy_col.select(&span_sel).next(),
                sell_col.select(&span_sel).next(),
            ) else {
                continue;
            };

            rates.push(RawRate::new(label, text_of(buy_el), text_of(sell_el)));
        }

        if rates.is_empty() {
            return Err(AggregatorError::Format(
                "no currency cards matched the allow-list".to_string(),
            ));
        }
        Ok(rates)
    }
}

impl Default for Imon {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for Imon {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: "Imon",
            short_name: "Imon",
            website: "https://www.imon.tj",
            kind: SourceKind::RenderedHtml,
        }
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawRate>, AggregatorError> {
        let html = fetch_rendered(
            ctx,
            RenderTarget {
                url: &self.url,
                wait_selectors: &Self::WAIT_SELECTORS,
                wait_timeout: None,
            },
        )
        .await?;
        Self::parse(&html)
    }
}
