//! Authenticated actor and the city-rate authorization predicate.

use super::Role;

/// The authenticated principal behind a request, as asserted by its
/// bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Username (token subject).
    pub username: String,
    /// Actor role.
    pub role: Role,
    /// Assigned city, present for city workers.
    pub city: Option<String>,
    /// Whether a worker may currently submit rates.
    pub active: bool,
}

impl Actor {
    /// Whether the actor may write market rates for `city`.
    ///
    /// Admins may write anywhere; a city worker may write only while
    /// active and only for the exact assigned city.
    #[must_use]
    pub fn can_edit_city_rates(&self, city: &str) -> bool {
        match self.role {
            Role::Admin => true,
            Role::CityWorker => {
                self.active && self.city.as_deref() == Some(city)
            }
            Role::User => false,
        }
    }
}
