//! Source scraping layer: one adapter per bank behind one capability.
//!
//! Every bank exposes rates differently — JSON APIs, server-rendered
//! HTML tables with inconsistent markup, or client-rendered pages that
//! need a real browser. Each source is a [`SourceAdapter`] that hides
//! its transport and markup assumptions behind a single `fetch`
//! returning [`RawRate`]s; adding a bank means adding one adapter, not
//! touching shared code.

pub mod browser;
pub mod html;
pub mod sources;

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::AggregatorConfig;
use crate::domain::RawRate;
use crate::error::AggregatorError;

/// Browser-like User-Agent sent with every scrape request. Several of
/// the bank sites serve an empty page to unknown agents.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Transport family a source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Single HTTP GET returning JSON.
    JsonApi,
    /// HTTP GET returning server-rendered HTML.
    StaticHtml,
    /// Client-rendered page fetched through a WebDriver session.
    RenderedHtml,
}

/// Static metadata describing a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceInfo {
    /// Bank name, the unique key of the bank reference row.
    pub name: &'static str,
    /// Short display name.
    pub short_name: &'static str,
    /// Bank homepage.
    pub website: &'static str,
    /// Transport family.
    pub kind: SourceKind,
}

/// Shared clients and limits passed to every adapter invocation.
#[derive(Debug, Clone)]
pub struct FetchContext {
    /// Shared HTTP client with User-Agent and request timeout.
    pub http: reqwest::Client,
    /// Like `http`, but tolerating invalid certificates. A few of the
    /// bank sites serve broken certificate chains.
    pub http_insecure: reqwest::Client,
    /// WebDriver endpoint for rendered-page sources.
    pub webdriver_url: String,
    /// Default deadline for a browser wait.
    pub browser_wait: Duration,
}

impl FetchContext {
    /// Builds the shared clients from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AggregatorError::Internal`] if a client cannot be
    /// constructed.
    pub fn new(config: &AggregatorConfig) -> Result<Self, AggregatorError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AggregatorError::Internal(format!("http client: {e}")))?;

        let http_insecure = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.http_timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| AggregatorError::Internal(format!("http client: {e}")))?;

        Ok(Self {
            http,
            http_insecure,
            webdriver_url: config.webdriver_url.clone(),
            browser_wait: config.browser_wait,
        })
    }
}

/// One bank rate source.
///
/// Implementations are registered in [`catalog`] and invoked by the
/// aggregation orchestrator. A `fetch` covers transport plus source
/// markup projection; normalization happens downstream.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Static source metadata.
    fn info(&self) -> SourceInfo;

    /// Fetches the current raw rates from the source.
    ///
    /// # Errors
    ///
    /// [`AggregatorError::Transport`] on network/HTTP failure,
    /// [`AggregatorError::Format`] when the response does not have the
    /// expected shape, [`AggregatorError::Timeout`] when a browser wait
    /// exceeds its deadline.
    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawRate>, AggregatorError>;
}

/// All configured sources in their fixed run order.
#[must_use]
pub fn catalog() -> Vec<Box<dyn SourceAdapter>> {
    vec![
        Box::new(sources::nbt::Nbt::new()),
        Box::new(sources::eskhata::Eskhata::new()),
        Box::new(sources::arvand::Arvand::new()),
        Box::new(sources::imon::Imon::new()),
        Box::new(sources::oriyonbonk::Oriyonbonk::new()),
        Box::new(sources::amonatbonk::Amonatbonk::new()),
        Box::new(sources::spitamenbank::Spitamenbank::new()),
        Box::new(sources::humo::Humo::new()),
        Box::new(sources::azizimoliya::AziziMoliya::new()),
        Box::new(sources::brt::Brt::new()),
        Box::new(sources::cbt::Cbt::new()),
        Box::new(sources::finca::Finca::new()),
        Box::new(sources::ibt::Ibt::new()),
        Box::new(sources::matin::Matin::new()),
        Box::new(sources::ssb::Ssb::new()),
        Box::new(sources::tawhidbank::Tawhidbank::new()),
        Box::new(sources::tejaratbank::Tejaratbank::new()),
    ]
}

/// GETs a URL and returns the body text.
///
/// # Errors
///
/// [`AggregatorError::Transport`] on connection failure or a non-2xx
/// status.
pub(crate) async fn fetch_text(
    client: &reqwest::Client,
    url: &str,
) -> Result<String, AggregatorError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AggregatorError::Transport(format!(
            "{url} returned HTTP {status}"
        )));
    }
    Ok(response.text().await?)
}

/// GETs a URL and deserializes the JSON body.
///
/// # Errors
///
/// [`AggregatorError::Transport`] on connection failure or non-2xx,
/// [`AggregatorError::Format`] when the body is not the expected JSON.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, AggregatorError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AggregatorError::Transport(format!(
            "{url} returned HTTP {status}"
        )));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| AggregatorError::Format(format!("{url}: {e}")))
}

/// A JSON rate value that sources serialize either as a string or as a
/// number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RateField {
    /// String-encoded value, kept verbatim.
    Text(String),
    /// Numeric value, rendered back to text for the normalizer.
    Number(f64),
}

impl RateField {
    /// Renders the field as the raw string the normalizer expects.
    pub(crate) fn into_raw(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}
