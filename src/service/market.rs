//! Market-rate writes: authorize, validate, persist, audit.
//!
//! Unlike bank observations, worker-submitted market rates carry the
//! strict pair invariant (`0 < buy < sell`) and a per-city
//! authorization rule. Nothing is persisted unless both gates pass;
//! every successful write appends an activity row.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::{Actor, CityDirectory, CurrencyCode, Role};
use crate::error::AggregatorError;
use crate::persistence::MarketStore;
use crate::persistence::models::{MarketRateRow, NewActivity, NewMarketRate};

/// A market-rate submission as received from the API layer.
#[derive(Debug, Clone)]
pub struct SubmitRateRequest {
    /// Currency label; resolved against the allow-list.
    pub currency: String,
    /// Target city. Required for admins; ignored for workers, who
    /// always write to their assigned city.
    pub city_name: Option<String>,
    /// Buy rate.
    pub buy: Decimal,
    /// Sell rate.
    pub sell: Decimal,
    /// Optional free-text notes.
    pub notes: Option<String>,
}

/// Service handling market-rate submissions.
#[derive(Clone)]
pub struct MarketRateService {
    store: Arc<dyn MarketStore>,
    cities: Arc<CityDirectory>,
}

impl std::fmt::Debug for MarketRateService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketRateService")
            .field("cities", &self.cities.cities().len())
            .finish_non_exhaustive()
    }
}

impl MarketRateService {
    /// Creates the service over a store and the city directory.
    #[must_use]
    pub fn new(store: Arc<dyn MarketStore>, cities: Arc<CityDirectory>) -> Self {
        Self { store, cities }
    }

    /// Submits a market rate on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// [`AggregatorError::Authorization`] when the actor may not write
    /// for the target city, [`AggregatorError::Validation`] when the
    /// payload fails validation. In both cases nothing is persisted.
    pub async fn submit(
        &self,
        actor: &Actor,
        request: SubmitRateRequest,
    ) -> Result<MarketRateRow, AggregatorError> {
        let city = self.target_city(actor, &request)?;

        if !actor.can_edit_city_rates(&city) {
            return Err(AggregatorError::Authorization(format!(
                "{} may not submit rates for {city}",
                actor.username
            )));
        }

        if !self.cities.contains(&city) {
            return Err(AggregatorError::Validation(format!("unknown city {city:?}")));
        }

        let currency = CurrencyCode::resolve(&request.currency).ok_or_else(|| {
            AggregatorError::Validation(format!("unknown currency {:?}", request.currency))
        })?;

        if request.buy <= Decimal::ZERO || request.sell <= Decimal::ZERO {
            return Err(AggregatorError::Validation(
                "rates must be positive".to_string(),
            ));
        }
        if request.buy >= request.sell {
            return Err(AggregatorError::Validation(
                "buy must be lower than sell".to_string(),
            ));
        }

        let row = self
            .store
            .insert_market_rate(NewMarketRate {
                currency,
                city_name: city.clone(),
                buy: request.buy,
                sell: request.sell,
                added_by: actor.username.clone(),
                notes: request.notes.unwrap_or_default(),
            })
            .await?;

        self.store
            .append_activity(NewActivity {
                worker: actor.username.clone(),
                action: "add_rate".to_string(),
                description: format!("{currency} rate added for {city}"),
                related_rate_id: Some(row.id),
            })
            .await?;

        tracing::info!(
            user = %actor.username,
            city = %city,
            currency = %currency,
            "market rate added"
        );
        Ok(row)
    }

    /// Resolves the city the submission targets.
    fn target_city(
        &self,
        actor: &Actor,
        request: &SubmitRateRequest,
    ) -> Result<String, AggregatorError> {
        match actor.role {
            // Workers always write to their assigned city.
            Role::CityWorker => actor.city.clone().ok_or_else(|| {
                AggregatorError::Authorization(format!(
                    "{} has no assigned city",
                    actor.username
                ))
            }),
            Role::Admin => request.city_name.clone().ok_or_else(|| {
                AggregatorError::Validation("city_name is required".to_string())
            }),
            Role::User => Err(AggregatorError::Authorization(
                "only admins and city workers may submit rates".to_string(),
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::persistence::memory::MemoryMarketStore;

    fn service() -> (MarketRateService, Arc<MemoryMarketStore>) {
        let store = Arc::new(MemoryMarketStore::default());
        let service = MarketRateService::new(
            Arc::clone(&store) as Arc<dyn MarketStore>,
            Arc::new(CityDirectory::default()),
        );
        (service, store)
    }

    fn worker(city: &str) -> Actor {
        Actor {
            username: "rustam".to_string(),
            role: Role::CityWorker,
            city: Some(city.to_string()),
            active: true,
        }
    }

    fn admin() -> Actor {
        Actor {
            username: "admin".to_string(),
            role: Role::Admin,
            city: None,
            active: true,
        }
    }

    fn request(city: Option<&str>, buy: Decimal, sell: Decimal) -> SubmitRateRequest {
        SubmitRateRequest {
            currency: "USD".to_string(),
            city_name: city.map(str::to_string),
            buy,
            sell,
            notes: None,
        }
    }

    #[tokio::test]
    async fn worker_writes_to_assigned_city() {
        let (service, store) = service();

        let result = service
            .submit(&worker("Душанбе"), request(None, dec!(10.45), dec!(10.60)))
            .await;
        let Ok(row) = result else {
            panic!("submission should succeed");
        };

        assert_eq!(row.city_name, "Душанбе");
        assert_eq!(row.added_by, "rustam");
        assert_eq!(store.rates.lock().await.len(), 1);

        let activity = store.activity.lock().await;
        assert_eq!(activity.len(), 1);
        assert_eq!(
            activity.first().map(|a| a.action.as_str()),
            Some("add_rate")
        );
        assert_eq!(
            activity.first().and_then(|a| a.related_rate_id),
            Some(row.id)
        );
    }

    #[tokio::test]
    async fn worker_request_city_is_ignored() {
        let (service, _store) = service();

        // A worker naming another city still writes to the assigned one.
        let result = service
            .submit(
                &worker("Душанбе"),
                request(Some("Худжанд"), dec!(10.45), dec!(10.60)),
            )
            .await;
        let Ok(row) = result else {
            panic!("submission should succeed");
        };
        assert_eq!(row.city_name, "Душанбе");
    }

    #[tokio::test]
    async fn inactive_worker_is_rejected_without_writes() {
        let (service, store) = service();
        let mut actor = worker("Душанбе");
        actor.active = false;

        let result = service
            .submit(&actor, request(None, dec!(10.45), dec!(10.60)))
            .await;
        assert!(matches!(result, Err(AggregatorError::Authorization(_))));
        assert!(store.rates.lock().await.is_empty());
        assert!(store.activity.lock().await.is_empty());
    }

    #[tokio::test]
    async fn plain_user_is_rejected() {
        let (service, store) = service();
        let actor = Actor {
            username: "guest".to_string(),
            role: Role::User,
            city: None,
            active: true,
        };

        let result = service
            .submit(&actor, request(Some("Душанбе"), dec!(10.45), dec!(10.60)))
            .await;
        assert!(matches!(result, Err(AggregatorError::Authorization(_))));
        assert!(store.rates.lock().await.is_empty());
    }

    #[tokio::test]
    async fn admin_must_name_a_known_city() {
        let (service, store) = service();

        let missing = service
            .submit(&admin(), request(None, dec!(10.45), dec!(10.60)))
            .await;
        assert!(matches!(missing, Err(AggregatorError::Validation(_))));

        let unknown = service
            .submit(&admin(), request(Some("Атлантида"), dec!(10.45), dec!(10.60)))
            .await;
        assert!(matches!(unknown, Err(AggregatorError::Validation(_))));
        assert!(store.rates.lock().await.is_empty());
    }

    #[tokio::test]
    async fn inverted_pair_is_rejected_before_persistence() {
        let (service, store) = service();

        let equal = service
            .submit(&worker("Душанбе"), request(None, dec!(10.60), dec!(10.60)))
            .await;
        assert!(matches!(equal, Err(AggregatorError::Validation(_))));

        let inverted = service
            .submit(&worker("Душанбе"), request(None, dec!(10.70), dec!(10.60)))
            .await;
        assert!(matches!(inverted, Err(AggregatorError::Validation(_))));

        assert!(store.rates.lock().await.is_empty());
        assert!(store.activity.lock().await.is_empty());
    }

    #[tokio::test]
    async fn non_positive_rates_are_rejected() {
        let (service, store) = service();

        let result = service
            .submit(&worker("Душанбе"), request(None, dec!(0), dec!(10.60)))
            .await;
        assert!(matches!(result, Err(AggregatorError::Validation(_))));
        assert!(store.rates.lock().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_currency_is_rejected() {
        let (service, store) = service();

        let mut req = request(None, dec!(10.45), dec!(10.60));
        req.currency = "GBP".to_string();
        let result = service.submit(&worker("Душанбе"), req).await;
        assert!(matches!(result, Err(AggregatorError::Validation(_))));
        assert!(store.rates.lock().await.is_empty());
    }

    #[tokio::test]
    async fn admin_writes_with_explicit_city() {
        let (service, store) = service();

        let result = service
            .submit(&admin(), request(Some("Худжанд"), dec!(10.45), dec!(10.60)))
            .await;
        let Ok(row) = result else {
            panic!("submission should succeed");
        };
        assert_eq!(row.city_name, "Худжанд");
        assert_eq!(store.activity.lock().await.len(), 1);
    }
}
