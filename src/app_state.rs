//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::CityDirectory;
use crate::persistence::postgres::RateStore;
use crate::service::{Aggregator, MarketRateService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// PostgreSQL-backed store for all read queries.
    pub store: RateStore,
    /// Aggregation orchestrator.
    pub aggregator: Arc<Aggregator>,
    /// Market-rate write service.
    pub market: MarketRateService,
    /// City directory.
    pub cities: Arc<CityDirectory>,
    /// HS256 secret for bearer-token verification.
    pub jwt_secret: Arc<str>,
}
