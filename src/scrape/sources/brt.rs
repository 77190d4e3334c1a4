//! BRT (Банк Республики Таджикистан): client-rendered rate table with
//! unstable markup.
//!
//! The site re-renders its rate table under changing class names, so
//! both the browser wait and the parse walk a prioritized selector
//! list and fall back to scanning every table for currency tokens.
//! Labels come in `"1 USD"`, `"USD 1"`, or bare-code shapes.

use async_trait::async_trait;
use scraper::{ElementRef, Html};

use crate::domain::{CurrencyCode, RawRate};
use crate::error::AggregatorError;
use crate::scrape::browser::{RenderTarget, fetch_rendered};
use crate::scrape::html::{child_texts, first_match, selector, text_of};
use crate::scrape::{FetchContext, SourceAdapter, SourceInfo, SourceKind};

/// Header words marking a non-data row.
const HEADER_WORDS: [&str; 4] = ["асъор", "валюта", "currency", "код"];

/// BRT source adapter.
#[derive(Debug)]
pub struct Brt {
    url: String,
}

impl Brt {
    const URL: &'static str = "https://www.brt.tj/";
    const TABLE_SELECTORS: [&'static str; 6] = [
        "table[aria-live='polite']",
        "table.table",
        ".currency-table",
        "table[class*='currency']",
        "table[class*='exchange']",
        "table[class*='rate']",
    ];
    const WAIT_SELECTORS: [&'static str; 7] = [
        "table[aria-live='polite']",
        "table.table",
        ".currency-table",
        "table[class*='currency']",
        "table[class*='exchange']",
        "table[class*='rate']",
        "table",
    ];
    const WAIT_SECS: u64 = 45;

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

        let table = match first_match(&document, &Self::TABLE_SELECTORS)? {
            Some(table) => Some(table),
            None => Self::any_table_with_rates(&document)?,
        };
        let table =
            table.ok_or_else(|| AggregatorError::Format("rate table not found".to_string()))?;

        let row_sel = selector("tr")?;
        let mut rates = Vec::new();

        for row in table.select(&row_sel) {
            let cells = child_texts(row, "td, th")?;
            if cells.len() < 3 {
                continue;
            }
            let (Some(label_cell), Some(buy), Some(sell)) =
                (cells.first(), cells.get(1), cells.get(2))
            else {
                continue;
            };

            let lower = label_cell.to_lowercase();
            if HEADER_WORDS.iter().any(|word| lower.contains(word)) {
                continue;
            }
            if CurrencyCode::resolve(label_cell).is_none() {
                continue;
            }
            rates.push(RawRate::new(label_cell.clone(), buy.clone(), sell.clone()));
        }

        if rates.is_empty() {
            return Err(AggregatorError::Format(
                "no rate rows matched the allow-list".to_string(),
            ));
        }
        Ok(rates)
    }

    /// Fallback: the first table whose text mentions a tracked
    /// currency.
    fn any_table_with_rates<'a>(
        document: &'a Html,
    ) -> Result<Option<ElementRef<'a>>, AggregatorError> {
        let table_sel = selector("table")?;
        for table in document.select(&table_sel) {
            let upper = text_of(table).to_uppercase();
            if ["USD", "EUR", "RUB", "ДОЛЛАР", "ЕВРО"]
                .iter()
                .any(|token| upper.contains(token))
            {
                return Ok(Some(table));
            }
        }
        Ok(None)
    }
}

impl Default for Brt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for Brt {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: "Банк Республики Таджикистан",
            short_name: "BRT",
            website: "https://www.brt.tj",
            kind: SourceKind::RenderedHtml,
        }
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawRate>, AggregatorError> {
        let html = fetch_rendered(
            ctx,
            RenderTarget {
                url: &self.url,
                wait_selectors: &Self::WAIT_SELECTORS,
                wait_timeout: Some(std::time::Duration::from_secs(Self::WAIT_SECS)),
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

    #[test]
    fn parses_prefixed_labels_and_skips_headers() {
        let html = r#"
            <table aria-live="polite">
              <tr><th>Валюта</th><th>Харид</th><th>Фуруш</th></tr>
              <tr><td><div>1 USD</div></td><td>10.45 с.</td><td>10.60 с.</td></tr>
              <tr><td>EUR 1</td><td>11.90</td><td>12.35</td></tr>
            </table>"#;

        let Ok(rates) = Brt::parse(html) else {
            panic!("parse should succeed");
        };
        assert_eq!(rates.len(), 2);
        assert_eq!(
            rates.first(),
            Some(&RawRate::new("1 USD", "10.45 с.", "10.60 с."))
        );
    }

    #[test]
    fn falls_back_to_scanning_unclassed_tables() {
        let html = r#"
            <table id="something">
              <tr><td>USD</td><td>10.45</td><td>10.60</td></tr>
            </table>"#;

        let Ok(rates) = Brt::parse(html) else {
            panic!("parse should succeed");
        };
        assert_eq!(rates.len(), 1);
    }

    #[test]
    fn page_without_rate_table_is_a_format_error() {
        assert!(matches!(
            Brt::parse("<div>loading…</div>"),
            Err(AggregatorError::Format(_))
        ));
    }
}
