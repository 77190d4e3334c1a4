//! Actor roles for the market-rate subsystem.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role carried in a bearer token's claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access: may write market rates for any city, trigger
    /// aggregation passes, and read the activity log.
    Admin,
    /// May write market rates for the assigned city only, while the
    /// worker flag is active.
    CityWorker,
    /// Read-only access to authenticated endpoints.
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Admin => "admin",
            Self::CityWorker => "city_worker",
            Self::User => "user",
        };
        f.write_str(s)
    }
}
