//! SSB (Sanoatsodirotbonk): three parallel rendered columns.
//!
//! The rates page renders three `.main_block` columns of `p` elements
//! — currency codes, buy values, sell values — that line up by index.

use async_trait::async_trait;
use scraper::Html;

use crate::domain::{CurrencyCode, RawRate};
use crate::error::AggregatorError;
use crate::scrape::browser::{RenderTarget, fetch_rendered};
use crate::scrape::html::{child_texts, selector};
use crate::scrape::{FetchContext, SourceAdapter, SourceInfo, SourceKind};

/// SSB source adapter.
#[derive(Debug)]
pub struct Ssb {
    url: String,
}

impl Ssb {
    const URL: &'static str = "https://www.ssb.tj/ru/?type=1";
    const WAIT_SELECTORS: [&'static str; 1] = [".main_block"];

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
        let block_sel = selector(".main_block")?;

        let mut blocks = document.select(&block_sel);
        let (Some(codes_block), Some(buys_block), Some(sells_block)) =
            (blocks.next(), blocks.next(), blocks.next())
        else {
            return Err(AggregatorError::Format(
                "expected three rate columns".to_string(),
            ));
        };

        let codes = child_texts(codes_block, "p")?;
        let buys = child_texts(buys_block, "p")?;
        let sells = child_texts(sells_block, "p")?;

        let mut rates = Vec::new();
        for (index, label) in codes.iter().enumerate() {
            if CurrencyCode::resolve(label).is_none() {
                continue;
            }
            let (Some(buy), Some(sell)) = (buys.get(index), sells.get(index)) else {
                continue;
            };
            rates.push(RawRate::new(label.clone(), buy.clone(), sell.clone()));
        }

        if rates.is_empty() {
            return Err(AggregatorError::Format(
                "no tracked currencies in rate columns".to_string(),
            ));
        }
        Ok(rates)
    }
}

impl Default for Ssb {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for Ssb {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: "Sanoatsodirotbonk",
            short_name: "SSB",
            website: "https://www.ssb.tj",
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
