//! Rendered-page fetching through a WebDriver session.
//!
//! Rendered sources build their rate widgets client-side, so a plain
//! GET returns an empty shell. [`fetch_rendered`] opens a dedicated
//! WebDriver session, navigates, polls until any candidate selector is
//! present and carries a tracked-currency token, and returns the page
//! source for ordinary selector-based parsing.
//!
//! Invariant: the session is closed on every exit path — success,
//! parse failure, timeout, or any other error. One session per
//! invocation, never shared.

use std::time::Duration;

use fantoccini::{Client, ClientBuilder, Locator};

use crate::error::AggregatorError;

use super::FetchContext;

/// Tokens that mark an element as rate content.
const CURRENCY_TOKENS: [&str; 6] = ["USD", "EUR", "RUB", "ДОЛЛАР", "ЕВРО", "РУБЛЬ"];

/// How often the wait loop re-checks the candidate selectors.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A rendered page to fetch.
#[derive(Debug, Clone, Copy)]
pub struct RenderTarget<'a> {
    /// Page URL.
    pub url: &'a str,
    /// Prioritized candidate selectors for the rate container.
    pub wait_selectors: &'a [&'a str],
    /// Per-source wait deadline override; `None` uses the context
    /// default.
    pub wait_timeout: Option<Duration>,
}

/// Fetches the fully rendered page source for `target`.
///
/// # Errors
///
/// [`AggregatorError::Transport`] when the WebDriver session cannot be
/// established or navigation fails, [`AggregatorError::Timeout`] when
/// no candidate selector carries rate content within the deadline.
pub async fn fetch_rendered(
    ctx: &FetchContext,
    target: RenderTarget<'_>,
) -> Result<String, AggregatorError> {
    let mut client = ClientBuilder::rustls()
        .map_err(|e| AggregatorError::Transport(format!("webdriver tls setup: {e}")))?
        .connect(&ctx.webdriver_url)
        .await
        .map_err(|e| {
            AggregatorError::Transport(format!(
                "webdriver session at {}: {e}",
                ctx.webdriver_url
            ))
        })?;

    let wait = target.wait_timeout.unwrap_or(ctx.browser_wait);
    let outcome = render(&mut client, target, wait).await;

    // Unconditional teardown; a leaked session is a leaked browser.
    if let Err(err) = client.close().await {
        tracing::warn!(url = target.url, error = %err, "webdriver session close failed");
    }

    outcome
}

async fn render(
    client: &mut Client,
    target: RenderTarget<'_>,
    wait: Duration,
) -> Result<String, AggregatorError> {
    client
        .goto(target.url)
        .await
        .map_err(|e| AggregatorError::Transport(format!("navigate {}: {e}", target.url)))?;

    let deadline = tokio::time::Instant::now() + wait;

    loop {
        if rate_content_present(client, target.wait_selectors).await? {
            return client
                .source()
                .await
                .map_err(|e| AggregatorError::Transport(format!("page source: {e}")));
        }

        if tokio::time::Instant::now() >= deadline {
            return Err(AggregatorError::Timeout(format!(
                "no rate content at {} within {}s",
                target.url,
                wait.as_secs()
            )));
        }

        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Checks whether any candidate selector matches an element whose text
/// contains a tracked-currency token. Earlier selectors win, matching
/// the static-parse priority.
async fn rate_content_present(
    client: &mut Client,
    selectors: &[&str],
) -> Result<bool, AggregatorError> {
    for css in selectors {
        let elements = match client.find_all(Locator::Css(css)).await {
            Ok(elements) => elements,
            // A selector that fails mid-render is retried on the next
            // poll tick rather than failing the fetch.
            Err(_) => continue,
        };

        for mut element in elements {
            let text = element.text().await.unwrap_or_default();
            let upper = text.to_uppercase();
            if CURRENCY_TOKENS.iter().any(|token| upper.contains(token)) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
