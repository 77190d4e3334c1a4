//! NBT (National Bank of Tajikistan): official-rate table.
//!
//! The central bank publishes one official rate per currency, not a
//! buy/sell pair; the single rate is recorded as both sides. Rows live
//! in `tbody.new__rate__nbt-table` with the Cyrillic currency name in
//! the fourth column and the rate in the fifth.

use async_trait::async_trait;
use scraper::Html;

use crate::domain::{CurrencyCode, RawRate};
use crate::error::AggregatorError;
use crate::scrape::html::{child_texts, first_match, selector};
use crate::scrape::{FetchContext, SourceAdapter, SourceInfo, SourceKind, fetch_text};

/// NBT source adapter.
#[derive(Debug)]
pub struct Nbt {
    url: String,
}

impl Nbt {
    const URL: &'static str = "https://nbt.tj/ru/kurs/kurs.php";
    const TABLE_SELECTORS: [&'static str; 2] =
        ["tbody.new__rate__nbt-table", "table tbody"];

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
            if cells.len() < 5 {
                continue;
            }
            let (Some(label), Some(rate)) = (cells.get(3), cells.get(4)) else {
                continue;
            };
            if CurrencyCode::resolve(label).is_none() {
                continue;
            }
            // Official rate serves as both sides of the pair.
            rates.push(RawRate::new(label.clone(), rate.clone(), rate.clone()));
        }

        if rates.is_empty() {
            return Err(AggregatorError::Format(
                "no tracked currencies in rate table".to_string(),
            ));
        }
        Ok(rates)
    }
}

impl Default for Nbt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for Nbt {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: "NBT",
            short_name: "NBT",
            website: "https://nbt.tj",
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
        <table><tbody class="new__rate__nbt-table">
          <tr><td>1</td><td>840</td><td>1</td><td>Доллар США</td><td>10,4521</td></tr>
          <tr><td>2</td><td>978</td><td>1</td><td>ЕВРО</td><td>11,9230</td></tr>
          <tr><td>3</td><td>643</td><td>10</td><td>Российский рубль</td><td>1,1850</td></tr>
          <tr><td>4</td><td>156</td><td>1</td><td>Юань</td><td>1,4400</td></tr>
        </tbody></table>"#;

    #[test]
    fn official_rate_is_both_buy_and_sell() {
        let Ok(rates) = Nbt::parse(FIXTURE) else {
            panic!("parse should succeed");
        };

        assert_eq!(rates.len(), 3);
        assert_eq!(
            rates.first(),
            Some(&RawRate::new("Доллар США", "10,4521", "10,4521"))
        );
        assert_eq!(
            rates.get(2),
            Some(&RawRate::new("Российский рубль", "1,1850", "1,1850"))
        );
    }

    #[test]
    fn missing_table_is_a_format_error() {
        assert!(matches!(
            Nbt::parse("<p>maintenance</p>"),
            Err(AggregatorError::Format(_))
        ));
    }

    #[test]
    fn table_without_tracked_rows_is_a_format_error() {
        let html = r#"<table><tbody class="new__rate__nbt-table">
            <tr><td>1</td><td>156</td><td>1</td><td>Юань</td><td>1,44</td></tr>
        </tbody></table>"#;
        assert!(matches!(
            Nbt::parse(html),
            Err(AggregatorError::Format(_))
        ));
    }
}
