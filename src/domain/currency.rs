//! Tracked-currency allow-list and label resolution.
//!
//! [`CurrencyCode`] is the closed set of currencies the aggregator
//! tracks. Bank sites label the same currency many different ways —
//! ISO codes, legacy codes (`RUR`), symbols, `"1 USD"`-style prefixed
//! labels, and Cyrillic names — so resolution happens in one place and
//! every adapter feeds its raw labels through it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A currency the aggregator tracks.
///
/// The allow-list is fixed: observations for any other currency are
/// dropped at resolution time. The legacy `RUR` code is canonicalized
/// to [`CurrencyCode::Rub`] so only one ruble row ever exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    /// United States dollar.
    Usd,
    /// Euro.
    Eur,
    /// Russian ruble.
    Rub,
}

impl CurrencyCode {
    /// Every tracked currency, in display order.
    pub const ALL: [Self; 3] = [Self::Usd, Self::Eur, Self::Rub];

    /// ISO 4217 code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Rub => "RUB",
        }
    }

    /// Human-readable English name, stored on the reference row.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Usd => "US Dollar",
            Self::Eur => "Euro",
            Self::Rub => "Russian Ruble",
        }
    }

    /// Currency symbol, stored on the reference row.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Eur => "€",
            Self::Rub => "₽",
        }
    }

    /// Resolves a free-text source label against the allow-list.
    ///
    /// Handles, in order: exact symbols (`$`, `€`, `₽`), exact codes
    /// and synonyms (`RUR` → RUB, `EURO` → EUR), multi-word labels by
    /// their leading or trailing code token (`"1 USD"`, `"USD 1"`),
    /// and Cyrillic names (`ДОЛЛАР`, `ЕВРО`, `РУБЛЬ` substrings, which
    /// also covers `"Доллар США"` and `"Российский рубль"`).
    ///
    /// Returns `None` for anything outside the allow-list.
    #[must_use]
    pub fn resolve(label: &str) -> Option<Self> {
        let upper = label.trim().to_uppercase();
        if upper.is_empty() {
            return None;
        }

        match upper.as_str() {
            "$" => return Some(Self::Usd),
            "€" => return Some(Self::Eur),
            "₽" => return Some(Self::Rub),
            _ => {}
        }

        if let Some(code) = Self::from_code(&upper) {
            return Some(code);
        }

        let mut tokens = upper.split_whitespace();
        let first = tokens.next();
        let last = tokens.last();
        if let Some(code) = first.and_then(Self::from_code) {
            return Some(code);
        }
        if let Some(code) = last.and_then(Self::from_code) {
            return Some(code);
        }

        if upper.contains("ДОЛЛАР") {
            return Some(Self::Usd);
        }
        if upper.contains("ЕВРО") {
            return Some(Self::Eur);
        }
        if upper.contains("РУБЛЬ") {
            return Some(Self::Rub);
        }

        None
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "USD" => Some(Self::Usd),
            "EUR" | "EURO" => Some(Self::Eur),
            "RUB" | "RUR" => Some(Self::Rub),
            _ => None,
        }
    }

}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_iso_codes() {
        assert_eq!(CurrencyCode::resolve("USD"), Some(CurrencyCode::Usd));
        assert_eq!(CurrencyCode::resolve(" eur "), Some(CurrencyCode::Eur));
        assert_eq!(CurrencyCode::resolve("RUB"), Some(CurrencyCode::Rub));
    }

    #[test]
    fn resolves_symbols() {
        assert_eq!(CurrencyCode::resolve("$"), Some(CurrencyCode::Usd));
        assert_eq!(CurrencyCode::resolve("€"), Some(CurrencyCode::Eur));
        assert_eq!(CurrencyCode::resolve("₽"), Some(CurrencyCode::Rub));
    }

    #[test]
    fn canonicalizes_legacy_codes() {
        assert_eq!(CurrencyCode::resolve("RUR"), Some(CurrencyCode::Rub));
        assert_eq!(CurrencyCode::resolve("EURO"), Some(CurrencyCode::Eur));
    }

    #[test]
    fn resolves_prefixed_labels() {
        assert_eq!(CurrencyCode::resolve("1 USD"), Some(CurrencyCode::Usd));
        assert_eq!(CurrencyCode::resolve("100 RUB"), Some(CurrencyCode::Rub));
        assert_eq!(CurrencyCode::resolve("USD 1"), Some(CurrencyCode::Usd));
    }

    #[test]
    fn resolves_cyrillic_names() {
        assert_eq!(CurrencyCode::resolve("Доллар США"), Some(CurrencyCode::Usd));
        assert_eq!(CurrencyCode::resolve("ЕВРО"), Some(CurrencyCode::Eur));
        assert_eq!(
            CurrencyCode::resolve("Российский рубль"),
            Some(CurrencyCode::Rub)
        );
        assert_eq!(CurrencyCode::resolve("доллар"), Some(CurrencyCode::Usd));
    }

    #[test]
    fn rejects_unknown_labels() {
        assert_eq!(CurrencyCode::resolve("GBP"), None);
        assert_eq!(CurrencyCode::resolve("сомони"), None);
        assert_eq!(CurrencyCode::resolve(""), None);
        assert_eq!(CurrencyCode::resolve("  "), None);
    }
}
