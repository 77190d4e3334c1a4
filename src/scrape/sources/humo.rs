//! HUMO: kursHUMO widget on the homepage.
//!
//! The widget is a `div.kursHUMO` holding `div.kursBody` rows of three
//! divs: a `"1 USD"`-style label, buy, and sell.

use async_trait::async_trait;
use scraper::Html;

use crate::domain::{CurrencyCode, RawRate};
use crate::error::AggregatorError;
use crate::scrape::html::{child_texts, first_match, selector};
use crate::scrape::{FetchContext, SourceAdapter, SourceInfo, SourceKind, fetch_text};

/// HUMO source adapter.
#[derive(Debug)]
pub struct Humo {
    url: String,
}

impl Humo {
    const URL: &'static str = "https://humo.tj/ru/";

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
        let section = first_match(&document, &["div.kursHUMO"])?
            .ok_or_else(|| AggregatorError::Format("kursHUMO widget not found".to_string()))?;

        let body_sel = selector("div.kursBody")?;
        let mut rates = Vec::new();

        for body in section.select(&body_sel) {
            let cells = child_texts(body, "div")?;
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

impl Default for Humo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for Humo {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: "HUMO",
            short_name: "HUMO",
            website: "https://humo.tj",
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
        <div class="kursHUMO">
          <div class="kursHead"><div>Валюта</div><div>Покупка</div><div>Продажа</div></div>
          <div class="kursBody"><div>1 USD</div><div>10.45</div><div>10.60</div></div>
          <div class="kursBody"><div>1 EUR</div><div>11.90</div><div>12.35</div></div>
          <div class="kursBody"><div>1 CNY</div><div>1.44</div><div>1.52</div></div>
        </div>"#;

    #[test]
    fn extracts_widget_rows() {
        let Ok(rates) = Humo::parse(FIXTURE) else {
            panic!("parse should succeed");
        };

        assert_eq!(rates.len(), 2);
        assert_eq!(
            rates.first(),
            Some(&RawRate::new("1 USD", "10.45", "10.60"))
        );
    }

    #[test]
    fn missing_widget_is_a_format_error() {
        assert!(matches!(
            Humo::parse("<div class='other'></div>"),
            Err(AggregatorError::Format(_))
        ));
    }
}
