//! Shared helpers for selector-based HTML extraction.
//!
//! Static-HTML and rendered-HTML adapters both end up here: locate a
//! container by a prioritized selector list, walk its rows, and pull
//! trimmed cell text.

use scraper::{ElementRef, Html, Selector};

use crate::error::AggregatorError;

/// Compiles a CSS selector.
///
/// Selectors in this crate are fixed strings, so a parse failure is a
/// programming error surfaced as [`AggregatorError::Internal`].
///
/// # Errors
///
/// Returns [`AggregatorError::Internal`] when the selector is invalid.
pub fn selector(css: &str) -> Result<Selector, AggregatorError> {
    Selector::parse(css)
        .map_err(|e| AggregatorError::Internal(format!("invalid selector {css:?}: {e}")))
}

/// Finds the first element matching any selector in the prioritized
/// list. Earlier selectors win.
///
/// # Errors
///
/// Returns [`AggregatorError::Internal`] when a selector is invalid.
pub fn first_match<'a>(
    document: &'a Html,
    selectors: &[&str],
) -> Result<Option<ElementRef<'a>>, AggregatorError> {
    for css in selectors {
        let sel = selector(css)?;
        if let Some(element) = document.select(&sel).next() {
            return Ok(Some(element));
        }
    }
    Ok(None)
}

/// Concatenated, trimmed text content of an element.
#[must_use]
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of every child matching `css`, in document order.
///
/// # Errors
///
/// Returns [`AggregatorError::Internal`] when the selector is invalid.
pub fn child_texts(element: ElementRef<'_>, css: &str) -> Result<Vec<String>, AggregatorError> {
    let sel = selector(css)?;
    Ok(element.select(&sel).map(text_of).collect())
}
