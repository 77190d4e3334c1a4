//! CBT (Kommersbank): cash-desk table keyed by currency symbol.
//!
//! The homepage has `table#CASH` whose rows start with a currency
//! symbol cell (`$`, `€`, `₽`) followed by buy and sell.

use async_trait::async_trait;
use scraper::Html;

use crate::domain::{CurrencyCode, RawRate};
use crate::error::AggregatorError;
use crate::scrape::html::{child_texts, first_match, selector};
use crate::scrape::{FetchContext, SourceAdapter, SourceInfo, SourceKind, fetch_text};

/// CBT source adapter.
#[derive(Debug)]
pub struct Cbt {
    url: String,
}

impl Cbt {
    const URL: &'static str = "https://cbt.tj/";

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
        let table = first_match(&document, &["table#CASH tbody", "table#CASH"])?
            .ok_or_else(|| AggregatorError::Format("CASH table not found".to_string()))?;

        let row_sel = selector("tr")?;
        let mut rates = Vec::new();

        for row in table.select(&row_sel) {
            let cells = child_texts(row, "td")?;
            if cells.len() < 3 {
                continue;
            }
            let (Some(symbol_cell), Some(buy), Some(sell)) =
                (cells.first(), cells.get(1), cells.get(2))
            else {
                continue;
            };
            // The symbol is the first token; the rest of the cell is
            // decoration.
            let Some(symbol) = symbol_cell.split_whitespace().next() else {
                continue;
            };
            if CurrencyCode::resolve(symbol).is_none() {
                continue;
            }
            rates.push(RawRate::new(symbol, buy.clone(), sell.clone()));
        }

        if rates.is_empty() {
            return Err(AggregatorError::Format(
                "no rate rows matched the allow-list".to_string(),
            ));
        }
        Ok(rates)
    }
}

impl Default for Cbt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for Cbt {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: "CBT",
            short_name: "CBT",
            website: "https://cbt.tj",
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
        <table id="CASH"><tbody>
          <tr><td>$ 1</td><td>10,45</td><td>10,60</td></tr>
          <tr><td>€ 1</td><td>11,90</td><td>12,35</td></tr>
          <tr><td>₽ 1</td><td>0,1150</td><td>0,1210</td></tr>
        </tbody></table>"#;

    #[test]
    fn maps_symbols_to_codes_downstream() {
        let Ok(rates) = Cbt::parse(FIXTURE) else {
            panic!("parse should succeed");
        };

        assert_eq!(rates.len(), 3);
        assert_eq!(rates.first(), Some(&RawRate::new("$", "10,45", "10,60")));
        assert_eq!(
            rates.get(2),
            Some(&RawRate::new("₽", "0,1150", "0,1210"))
        );
    }

    #[test]
    fn missing_cash_table_is_a_format_error() {
        assert!(matches!(
            Cbt::parse("<table id='TRANSFER'></table>"),
            Err(AggregatorError::Format(_))
        ));
    }
}
