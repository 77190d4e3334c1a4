//! Service layer: aggregation orchestration and market-rate writes.

pub mod aggregator;
pub mod market;

pub use aggregator::{Aggregator, RunReport, SourceOutcome};
pub use market::{MarketRateService, SubmitRateRequest};
