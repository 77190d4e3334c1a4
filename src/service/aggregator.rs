//! Aggregation orchestrator: one pass over every configured source.
//!
//! Sources run sequentially in their fixed catalog order. Every error
//! inside one source's fetch → normalize → save chain is caught here
//! and recorded as that source's outcome; the pass as a whole never
//! aborts because one bank failed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::normalize;
use crate::error::AggregatorError;
use crate::persistence::RateSink;
use crate::scrape::{FetchContext, SourceAdapter, SourceInfo};

/// Outcome status of one source in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The source was fetched and its rates saved.
    Ok,
    /// The source failed; see the error class and message.
    Failed,
}

/// Per-source outcome of an aggregation pass.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SourceOutcome {
    /// Bank name of the source.
    pub source: String,
    /// Success or failure.
    pub status: OutcomeStatus,
    /// Number of observation rows saved.
    pub rates_saved: usize,
    /// Error class for failures (`transport`, `format`, `timeout`, …).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_class: Option<&'static str>,
    /// Error message for failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Terminal state of one aggregation pass.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct RunReport {
    /// Pass start time.
    pub started_at: DateTime<Utc>,
    /// Pass end time.
    pub finished_at: DateTime<Utc>,
    /// Number of sources that succeeded.
    pub succeeded: usize,
    /// Number of sources that failed.
    pub failed: usize,
    /// One outcome per source, in run order.
    pub sources: Vec<SourceOutcome>,
}

/// Orchestrates aggregation passes over the source catalog.
pub struct Aggregator {
    sources: Vec<Box<dyn SourceAdapter>>,
    ctx: FetchContext,
    sink: Arc<dyn RateSink>,
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("sources", &self.sources.len())
            .finish_non_exhaustive()
    }
}

impl Aggregator {
    /// Creates an orchestrator over the given sources and sink.
    #[must_use]
    pub fn new(
        sources: Vec<Box<dyn SourceAdapter>>,
        ctx: FetchContext,
        sink: Arc<dyn RateSink>,
    ) -> Self {
        Self { sources, ctx, sink }
    }

    /// Metadata for every configured source, in run order.
    #[must_use]
    pub fn sources(&self) -> Vec<SourceInfo> {
        self.sources.iter().map(|s| s.info()).collect()
    }

    /// Runs one aggregation pass and returns the report.
    ///
    /// This is the zero-argument entry point an external scheduler
    /// triggers. No retries happen within a pass.
    pub async fn run_once(&self) -> RunReport {
        let started_at = Utc::now();
        tracing::info!(sources = self.sources.len(), "starting aggregation pass");

        let mut outcomes = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let info = source.info();
            let outcome = match self.scrape_source(source.as_ref(), &info).await {
                Ok(saved) => {
                    tracing::info!(source = info.name, saved, "source scraped");
                    SourceOutcome {
                        source: info.name.to_string(),
                        status: OutcomeStatus::Ok,
                        rates_saved: saved,
                        error_class: None,
                        error: None,
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        source = info.name,
                        class = err.class(),
                        error = %err,
                        "source failed"
                    );
                    SourceOutcome {
                        source: info.name.to_string(),
                        status: OutcomeStatus::Failed,
                        rates_saved: 0,
                        error_class: Some(err.class()),
                        error: Some(err.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let succeeded = outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Ok)
            .count();
        let failed = outcomes.len() - succeeded;
        let finished_at = Utc::now();

        tracing::info!(succeeded, failed, "aggregation pass finished");

        RunReport {
            started_at,
            finished_at,
            succeeded,
            failed,
            sources: outcomes,
        }
    }

    /// Fetches one source and pushes every raw rate through the
    /// normalizer and the sink. Returns the number of rows saved.
    async fn scrape_source(
        &self,
        adapter: &dyn SourceAdapter,
        info: &SourceInfo,
    ) -> Result<usize, AggregatorError> {
        let raw_rates = adapter.fetch(&self.ctx).await?;

        let mut saved = 0;
        for raw in &raw_rates {
            let rate = normalize(raw)?;
            self.sink.save_bank_rate(info, &rate).await?;
            saved += 1;
        }
        Ok(saved)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::AggregatorConfig;
    use crate::domain::{CurrencyCode, RawRate};
    use crate::persistence::memory::MemorySink;
    use crate::scrape::sources::amonatbonk::Amonatbonk;
    use crate::scrape::{SourceKind, catalog};

    /// Scripted adapter for orchestrator tests.
    #[derive(Debug)]
    struct Scripted {
        name: &'static str,
        result: Result<Vec<RawRate>, &'static str>,
    }

    #[async_trait]
    impl SourceAdapter for Scripted {
        fn info(&self) -> SourceInfo {
            SourceInfo {
                name: self.name,
                short_name: self.name,
                website: "https://example.com",
                kind: SourceKind::JsonApi,
            }
        }

        async fn fetch(&self, _ctx: &FetchContext) -> Result<Vec<RawRate>, AggregatorError> {
            match &self.result {
                Ok(rates) => Ok(rates.clone()),
                Err(message) => Err(AggregatorError::Transport((*message).to_string())),
            }
        }
    }

    fn context() -> FetchContext {
        let Ok(config) = AggregatorConfig::from_env() else {
            panic!("default config should load");
        };
        let Ok(ctx) = FetchContext::new(&config) else {
            panic!("fetch context should build");
        };
        ctx
    }

    fn ok_source(name: &'static str) -> Box<dyn SourceAdapter> {
        Box::new(Scripted {
            name,
            result: Ok(vec![
                RawRate::new("USD", "10.45", "10.60"),
                RawRate::new("EUR", "11.90", "12.35"),
            ]),
        })
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_the_pass() {
        let mut sources: Vec<Box<dyn SourceAdapter>> = Vec::new();
        for name in [
            "Bank01", "Bank02", "Bank03", "Bank04", "Bank05", "Bank06", "Bank07", "Bank08",
            "Bank09", "Bank10", "Bank11", "Bank12", "Bank13", "Bank14", "Bank15", "Bank16",
        ] {
            sources.push(ok_source(name));
        }
        sources.push(Box::new(Scripted {
            name: "Broken",
            result: Err("connection refused"),
        }));

        let sink = Arc::new(MemorySink::default());
        let aggregator = Aggregator::new(sources, context(), Arc::clone(&sink) as Arc<dyn RateSink>);
        let report = aggregator.run_once().await;

        assert_eq!(report.succeeded, 16);
        assert_eq!(report.failed, 1);
        assert_eq!(report.sources.len(), 17);

        let failures: Vec<&SourceOutcome> = report
            .sources
            .iter()
            .filter(|o| o.status == OutcomeStatus::Failed)
            .collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures.first().map(|o| o.source.as_str()), Some("Broken"));
        assert_eq!(failures.first().and_then(|o| o.error_class), Some("transport"));

        // 16 sources × 2 rates each reached the sink.
        assert_eq!(sink.rows.lock().await.len(), 32);
    }

    #[tokio::test]
    async fn unparseable_rate_fails_only_its_source() {
        let sources: Vec<Box<dyn SourceAdapter>> = vec![
            Box::new(Scripted {
                name: "BadNumbers",
                result: Ok(vec![RawRate::new("USD", "n/a", "—")]),
            }),
            ok_source("Good"),
        ];

        let sink = Arc::new(MemorySink::default());
        let aggregator = Aggregator::new(sources, context(), Arc::clone(&sink) as Arc<dyn RateSink>);
        let report = aggregator.run_once().await;

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(
            report.sources.first().and_then(|o| o.error_class),
            Some("format")
        );
    }

    #[tokio::test]
    async fn identical_observations_append_two_rows() {
        let sources: Vec<Box<dyn SourceAdapter>> = vec![
            Box::new(Scripted {
                name: "TestBank",
                result: Ok(vec![
                    RawRate::new("USD", "10.5", "10.8"),
                    RawRate::new("USD", "10.5", "10.8"),
                ]),
            }),
        ];

        let sink = Arc::new(MemorySink::default());
        let aggregator = Aggregator::new(sources, context(), Arc::clone(&sink) as Arc<dyn RateSink>);
        let report = aggregator.run_once().await;

        assert_eq!(report.succeeded, 1);
        // The sink never deduplicates: two identical saves, two rows.
        assert_eq!(sink.rows.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn amonatbonk_fixture_flows_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"individuals":{"USD":{"buy":"10.5","sell":"10.8"}}}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let sources: Vec<Box<dyn SourceAdapter>> =
            vec![Box::new(Amonatbonk::with_url(server.uri()))];
        let sink = Arc::new(MemorySink::default());
        let aggregator = Aggregator::new(sources, context(), Arc::clone(&sink) as Arc<dyn RateSink>);

        let report = aggregator.run_once().await;
        assert_eq!(report.succeeded, 1);

        let rows = sink.rows.lock().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows.first(),
            Some(&(
                "Amonatbonk".to_string(),
                CurrencyCode::Usd,
                dec!(10.5),
                dec!(10.8)
            ))
        );
    }

    #[test]
    fn sources_exposes_catalog_metadata() {
        let sink = Arc::new(MemorySink::default());
        let aggregator = Aggregator::new(catalog(), context(), sink);
        let infos = aggregator.sources();
        assert_eq!(infos.len(), 17);
    }
}
