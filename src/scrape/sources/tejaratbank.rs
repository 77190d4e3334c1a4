//! Tejaratbank: Elementor heading sequence.
//!
//! The page builder emits rates as a flat run of
//! `div.elementor-heading-title` elements: a code heading (`USD`,
//! `EURO`, `RUB`) immediately followed by two numeric headings (buy,
//! sell).

use async_trait::async_trait;
use scraper::Html;

use crate::domain::RawRate;
use crate::error::AggregatorError;
use crate::scrape::html::{selector, text_of};
use crate::scrape::{FetchContext, SourceAdapter, SourceInfo, SourceKind, fetch_text};

const CODE_HEADINGS: [&str; 3] = ["USD", "EURO", "RUB"];

/// Tejaratbank source adapter.
#[derive(Debug)]
pub struct Tejaratbank {
    url: String,
}

impl Tejaratbank {
    const URL: &'static str = "https://tejaratbank.tj/";

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
        let heading_sel = selector("div.elementor-heading-title")?;
        let headings: Vec<String> = document.select(&heading_sel).map(text_of).collect();

        let mut rates = Vec::new();
        for (index, heading) in headings.iter().enumerate() {
            if !CODE_HEADINGS.contains(&heading.as_str()) {
                continue;
            }
            let (Some(buy), Some(sell)) = (headings.get(index + 1), headings.get(index + 2))
            else {
                continue;
            };
            rates.push(RawRate::new(heading.clone(), buy.clone(), sell.clone()));
        }

        if rates.is_empty() {
            return Err(AggregatorError::Format(
                "no code headings followed by rate pairs".to_string(),
            ));
        }
        Ok(rates)
    }
}

impl Default for Tejaratbank {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for Tejaratbank {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: "Tejaratbank",
            short_name: "Tejarat",
            website: "https://tejaratbank.tj",
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
        <div class="elementor-heading-title">Курс валют на 01.08.2025</div>
        <div class="elementor-heading-title">USD</div>
        <div class="elementor-heading-title">10.45</div>
        <div class="elementor-heading-title">10.60</div>
        <div class="elementor-heading-title">EURO</div>
        <div class="elementor-heading-title">11.90</div>
        <div class="elementor-heading-title">12.35</div>"#;

    #[test]
    fn pairs_code_headings_with_following_values() {
        let Ok(rates) = Tejaratbank::parse(FIXTURE) else {
            panic!("parse should succeed");
        };

        assert_eq!(rates.len(), 2);
        assert_eq!(rates.first(), Some(&RawRate::new("USD", "10.45", "10.60")));
        // EURO resolves to EUR downstream.
        assert_eq!(
            rates.get(1),
            Some(&RawRate::new("EURO", "11.90", "12.35"))
        );
    }

    #[test]
    fn page_without_code_headings_is_a_format_error() {
        assert!(matches!(
            Tejaratbank::parse("<div class='elementor-heading-title'>О банке</div>"),
            Err(AggregatorError::Format(_))
        ));
    }
}
