//! Tawhidbank: client-rendered rate rows.
//!
//! The personal-banking page renders `div.rate-row` blocks holding a
//! `div.currency-name` label and two `div.rate` values.

use async_trait::async_trait;
use scraper::Html;

use crate::domain::{CurrencyCode, RawRate};
use crate::error::AggregatorError;
use crate::scrape::browser::{RenderTarget, fetch_rendered};
use crate::scrape::html::{child_texts, selector, text_of};
use crate::scrape::{FetchContext, SourceAdapter, SourceInfo, SourceKind};

/// Tawhidbank source adapter.
#[derive(Debug)]
pub struct Tawhidbank {
    url: String,
}

impl Tawhidbank {
    const URL: &'static str = "https://www.tawhidbank.tj/personal";
    const WAIT_SELECTORS: [&'static str; 1] = [".rate-row"];

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
        let row_sel = selector("div.rate-row")?;
        let name_sel = selector("div.currency-name")?;

        let mut rates = Vec::new();

        for row in document.select(&row_sel) {
            let Some(name_el) = row.select(&name_sel).next() else {
                continue;
            };
            let label = text_of(name_el);
            if CurrencyCode::resolve(&label).is_none() {
                continue;
            }

            let values = child_texts(row, "div.rate")?;
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

impl Default for Tawhidbank {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for Tawhidbank {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: "Tawhidbank",
            short_name: "Tawhid",
            website: "https://www.tawhidbank.tj",
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

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <div class="rate-row">
          <div class="currency-name">USD</div>
          <div class="rate">10,45 с.</div>
          <div class="rate">10,60 с.</div>
        </div>
        <div class="rate-row">
          <div class="currency-name">GBP</div>
          <div class="rate">13,00</div>
          <div class="rate">13,50</div>
        </div>"#;

    #[test]
    fn extracts_allow_listed_rows() {
        let Ok(rates) = Tawhidbank::parse(FIXTURE) else {
            panic!("parse should succeed");
        };

        assert_eq!(rates.len(), 1);
        assert_eq!(
            rates.first(),
            Some(&RawRate::new("USD", "10,45 с.", "10,60 с."))
        );
    }

    #[test]
    fn shell_page_is_a_format_error() {
        assert!(matches!(
            Tawhidbank::parse("<div id='app'></div>"),
            Err(AggregatorError::Format(_))
        ));
    }
}
