//! # somoni-rates
//!
//! Currency exchange-rate aggregator and market-rate API for banks of
//! Tajikistan. Scrapes buy/sell rates for USD/EUR/RUB from 17 bank
//! websites, normalizes them into one schema, and appends them to
//! PostgreSQL as immutable observations; a permissioned REST API lets
//! city workers submit street-market rates with an audit trail.
//!
//! ## Architecture
//!
//! ```text
//! External scheduler (cron)
//!     │
//!     ├── POST /api/v1/scrape/run
//!     │
//!     ├── Aggregator (service/) — sequential pass, per-source isolation
//!     │     ├── SourceAdapter × 17 (scrape/sources/)
//!     │     │     ├── JSON API        (reqwest)
//!     │     │     ├── Static HTML     (reqwest + scraper)
//!     │     │     └── Rendered HTML   (fantoccini + scraper)
//!     │     ├── Normalizer (domain/)
//!     │     └── RateSink (persistence/)
//!     │
//!     ├── MarketRateService (service/) — authorize, validate, audit
//!     │
//!     └── PostgreSQL
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod scrape;
pub mod service;
