//! Eskhata: rate rows somewhere in the homepage markup.
//!
//! The homepage has no stable container for the rate widget, so every
//! `tr` is scanned; a row counts when its first cell resolves to a
//! tracked currency (the site prints the legacy `RUR` code). Multiple
//! widgets repeat the same rows, so the first occurrence per currency
//! wins.

use std::collections::HashSet;

use async_trait::async_trait;
use scraper::Html;

use crate::domain::{CurrencyCode, RawRate};
use crate::error::AggregatorError;
use crate::scrape::html::{child_texts, selector};
use crate::scrape::{FetchContext, SourceAdapter, SourceInfo, SourceKind, fetch_text};

/// Eskhata source adapter.
#[derive(Debug)]
pub struct Eskhata {
    url: String,
}

impl Eskhata {
    const URL: &'static str = "https://eskhata.com/";

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
        let row_sel = selector("tr")?;

        let mut seen: HashSet<CurrencyCode> = HashSet::new();
        let mut rates = Vec::new();

        for row in document.select(&row_sel) {
            let cells = child_texts(row, "td")?;
            if cells.len() < 3 {
                continue;
            }
            let (Some(label), Some(buy), Some(sell)) =
                (cells.first(), cells.get(1), cells.get(2))
            else {
                continue;
            };
            let Some(code) = CurrencyCode::resolve(label) else {
                continue;
            };
            if !seen.insert(code) {
                continue;
            }
            rates.push(RawRate::new(label.clone(), buy.clone(), sell.clone()));
            if seen.len() == CurrencyCode::ALL.len() {
                break;
            }
        }

        if rates.is_empty() {
            return Err(AggregatorError::Format(
                "no rate rows matched the allow-list".to_string(),
            ));
        }
        Ok(rates)
    }
}

impl Default for Eskhata {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for Eskhata {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: "Eskhata",
            short_name: "Eskhata",
            website: "https://eskhata.com",
            kind: SourceKind::StaticHtml,
        }
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawRate>, AggregatorError> {
        let html = fetch_text(&ctx.http, &self.url).await?;
        Self::parse(&html)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <table>
          <tr><th>Валюта</th><th>Покупка</th><th>Продажа</th></tr>
          <tr><td>USD</td><td>10,45</td><td>10,60</td></tr>
          <tr><td>EUR</td><td>11,90</td><td>12,35</td></tr>
          <tr><td>RUR</td><td>0,1150</td><td>0,1210</td></tr>
        </table>
        <table>
          <tr><td>USD</td><td>10,40</td><td>10,65</td></tr>
        </table>"#;

    #[test]
    fn first_occurrence_per_currency_wins() {
        let Ok(rates) = Eskhata::parse(FIXTURE) else {
            panic!("parse should succeed");
        };

        assert_eq!(rates.len(), 3);
        assert_eq!(rates.first(), Some(&RawRate::new("USD", "10,45", "10,60")));
        // Legacy RUR row survives raw; the normalizer maps it to RUB.
        assert_eq!(
            rates.get(2),
            Some(&RawRate::new("RUR", "0,1150", "0,1210"))
        );
    }

    #[test]
    fn page_without_rate_rows_is_a_format_error() {
        assert!(matches!(
            Eskhata::parse("<table><tr><td>News</td><td>a</td><td>b</td></tr></table>"),
            Err(AggregatorError::Format(_))
        ));
    }
}
