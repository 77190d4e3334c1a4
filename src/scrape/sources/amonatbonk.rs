//! Amonatbonk: JSON API with per-audience quote maps.
//!
//! The endpoint returns `{"individuals": {"USD": {"buy": ..,
//! "sell": ..}, ...}, ...}`; only the `individuals` block is used.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::RawRate;
use crate::error::AggregatorError;
use crate::scrape::{FetchContext, RateField, SourceAdapter, SourceInfo, SourceKind, fetch_json};

const CODES: [&str; 3] = ["USD", "EUR", "RUB"];

/// Amonatbonk source adapter.
#[derive(Debug)]
pub struct Amonatbonk {
    url: String,
}

#[derive(Debug, serde::Deserialize)]
struct AmbResponse {
    individuals: Option<HashMap<String, AmbQuote>>,
}

#[derive(Debug, serde::Deserialize)]
struct AmbQuote {
    buy: RateField,
    sell: RateField,
}

impl Amonatbonk {
    const URL: &'static str =
        "https://amonatbonk.tj/bitrix/templates/amonatbonk/ajax/ambApi.php";

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

    fn project(response: AmbResponse) -> Result<Vec<RawRate>, AggregatorError> {
        let mut individuals = response
            .individuals
            .ok_or_else(|| AggregatorError::Format("missing individuals block".to_string()))?;

        let rates: Vec<RawRate> = CODES
            .iter()
            .filter_map(|code| {
                individuals
                    .remove(*code)
                    .map(|quote| RawRate::new(*code, quote.buy.into_raw(), quote.sell.into_raw()))
            })
            .collect();

        if rates.is_empty() {
            return Err(AggregatorError::Format(
                "no tracked currencies in individuals block".to_string(),
            ));
        }
        Ok(rates)
    }
}

impl Default for Amonatbonk {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for Amonatbonk {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: "Amonatbonk",
            short_name: "AMB",
            website: "https://amonatbonk.tj",
            kind: SourceKind::JsonApi,
        }
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawRate>, AggregatorError> {
        let response: AmbResponse = fetch_json(&ctx.http, &self.url).await?;
        Self::project(response)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn context() -> FetchContext {
        let Ok(config) = crate::config::AggregatorConfig::from_env() else {
            panic!("default config should load");
        };
        let Ok(ctx) = FetchContext::new(&config) else {
            panic!("fetch context should build");
        };
        ctx
    }

    #[tokio::test]
    async fn projects_individuals_block() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ambApi.php"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"individuals":{"USD":{"buy":"10.5","sell":"10.8"},"EUR":{"buy":"11.9","sell":"12.3"}}}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let adapter = Amonatbonk::with_url(format!("{}/ambApi.php", server.uri()));
        let Ok(rates) = adapter.fetch(&context()).await else {
            panic!("fetch should succeed");
        };

        assert_eq!(rates.len(), 2);
        assert_eq!(
            rates.first(),
            Some(&RawRate::new("USD", "10.5", "10.8"))
        );
    }

    #[tokio::test]
    async fn non_2xx_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let adapter = Amonatbonk::with_url(server.uri());
        let result = adapter.fetch(&context()).await;
        assert!(matches!(result, Err(AggregatorError::Transport(_))));
    }

    #[tokio::test]
    async fn missing_individuals_is_a_format_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(r#"{"legal":{}}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let adapter = Amonatbonk::with_url(server.uri());
        let result = adapter.fetch(&context()).await;
        assert!(matches!(result, Err(AggregatorError::Format(_))));
    }

    #[test]
    fn numeric_quote_values_are_accepted() {
        let Ok(response) = serde_json::from_str::<AmbResponse>(
            r#"{"individuals":{"RUB":{"buy":0.115,"sell":0.121}}}"#,
        ) else {
            panic!("fixture should deserialize");
        };
        let Ok(rates) = Amonatbonk::project(response) else {
            panic!("projection should succeed");
        };
        assert_eq!(rates.first(), Some(&RawRate::new("RUB", "0.115", "0.121")));
    }
}
