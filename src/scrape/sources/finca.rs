//! FINCA: rate table in the finca-table-rate block.

use async_trait::async_trait;
use scraper::Html;

use crate::domain::{CurrencyCode, RawRate};
use crate::error::AggregatorError;
use crate::scrape::html::{child_texts, first_match, selector};
use crate::scrape::{FetchContext, SourceAdapter, SourceInfo, SourceKind, fetch_text};

/// FINCA source adapter.
#[derive(Debug)]
pub struct Finca {
    url: String,
}

impl Finca {
    const URL: &'static str = "https://finca.tj/";
    const TABLE_SELECTORS: [&'static str; 2] = [
        "div.finca-table-rate table tbody",
        "div.finca-table-rate table",
    ];

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
            .ok_or_else(|| AggregatorError::Format("rate table not found".to_string()))?;

        let row_sel = selector("tr")?;
        let mut rates = Vec::new();

        for row in table.select(&row_sel) {
            let cells = child_texts(row, "td")?;
            if cells.len() != 3 {
                continue;
            }
            let (Some(label), Some(buy), Some(sell)) =
                (cells.first(), cells.get(1), cells.get(2))
            else {
                continue;
            };
            if CurrencyCode::resolve(label).is_none() {
                continue;
            }
            rates.push(RawRate::new(label.clone(), buy.clone(), sell.clone()));
        }

        if rates.is_empty() {
            return Err(AggregatorError::Format(
                "no rate rows matched the allow-list".to_string(),
            ));
        }
        Ok(rates)
    }
}

impl Default for Finca {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for Finca {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: "Finca",
            short_name: "FINCA",
            website: "https://finca.tj",
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

    #[test]
    fn extracts_three_cell_rows() {
        let html = r#"
            <div class="finca-table-rate"><table><tbody>
              <tr><td>USD</td><td>10.45</td><td>10.60</td></tr>
              <tr><td>EUR</td><td>11.90</td><td>12.35</td></tr>
              <tr><td>KGS</td><td>0.12</td><td>0.13</td></tr>
            </tbody></table></div>"#;

        let Ok(rates) = Finca::parse(html) else {
            panic!("parse should succeed");
        };
        assert_eq!(rates.len(), 2);
        assert_eq!(rates.first(), Some(&RawRate::new("USD", "10.45", "10.60")));
    }

    #[test]
    fn missing_block_is_a_format_error() {
        assert!(matches!(
            Finca::parse("<table><tr><td>USD</td><td>1</td><td>2</td></tr></table>"),
            Err(AggregatorError::Format(_))
        ));
    }
}
