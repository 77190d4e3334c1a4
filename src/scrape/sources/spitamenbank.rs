//! Spitamen Bank: client-rendered currency tab widget.
//!
//! The personal-banking page renders a tabbed widget; the cash tab is
//! `li[c_index="1"]` holding `.currency-values` rows whose values live
//! in `c-val` attributes rather than text.

use async_trait::async_trait;
use scraper::Html;

use crate::domain::{CurrencyCode, RawRate};
use crate::error::AggregatorError;
use crate::scrape::browser::{RenderTarget, fetch_rendered};
use crate::scrape::html::{first_match, selector, text_of};
use crate::scrape::{FetchContext, SourceAdapter, SourceInfo, SourceKind};

/// Spitamen Bank source adapter.
#[derive(Debug)]
pub struct Spitamenbank {
    url: String,
}

impl Spitamenbank {
    const URL: &'static str = "https://www.spitamenbank.tj/tj/personal/";
    const WAIT_SELECTORS: [&'static str; 1] = ["#currency-list"];

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
        let cash_tab = first_match(&document, &[r#"li[c_index="1"]"#])?
            .ok_or_else(|| AggregatorError::Format("cash tab not found".to_string()))?;

        let row_sel = selector(".currency-values")?;
        let value_sel = selector("div[c-val]")?;
        let mut rates = Vec::new();

        for row in cash_tab.select(&row_sel) {
            let mut values = row.select(&value_sel);
            let (Some(label_el), Some(buy_el), Some(sell_el)) =
                (values.next(), values.next(), values.next())
            else {
                continue;
            };

            let label = text_of(label_el);
            if CurrencyCode::resolve(&label).is_none() {
                continue;
            }
            let (Some(buy), Some(sell)) = (
                buy_el.value().attr("c-val"),
                sell_el.value().attr("c-val"),
            ) else {
                continue;
            };
            rates.push(RawRate::new(label, buy, sell));
        }

        if rates.is_empty() {
            return Err(AggregatorError::Format(
                "no rate rows matched the allow-list".to_string(),
            ));
        }
        Ok(rates)
    }
}

impl Default for Spitamenbank {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for Spitamenbank {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: "Spitamenbank",
            short_name: "Spitamen",
            website: "https://www.spitamenbank.tj",
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
