//! Bearer-token authentication for the market-rate endpoints.
//!
//! Accounts are not managed by this service; a trusted issuer signs
//! HS256 tokens whose claims carry the role, the assigned city, and
//! the worker-active flag. [`AuthUser`] extracts and verifies the
//! token and hands handlers a domain [`Actor`].

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::domain::{Actor, Role};
use crate::error::AggregatorError;

/// Claims carried in a bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Username.
    pub sub: String,
    /// Actor role.
    pub role: Role,
    /// Assigned city for city workers.
    #[serde(default)]
    pub city: Option<String>,
    /// Worker-active flag; defaults to true for non-worker roles.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Expiry as a Unix timestamp.
    pub exp: u64,
}

const fn default_active() -> bool {
    true
}

/// Verifies a bearer token and returns the actor it asserts.
///
/// # Errors
///
/// Returns [`AggregatorError::Unauthenticated`] on a bad signature,
/// expired token, or malformed claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Actor, AggregatorError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| AggregatorError::Unauthenticated(format!("invalid token: {e}")))?;

    let claims = data.claims;
    Ok(Actor {
        username: claims.sub,
        role: claims.role,
        city: claims.city,
        active: claims.active,
    })
}

/// Authenticated-request extractor wrapping the verified [`Actor`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Actor);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AggregatorError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AggregatorError::Unauthenticated("missing Authorization header".to_string())
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AggregatorError::Unauthenticated("expected a Bearer token".to_string())
        })?;

        let actor = verify_token(token, &state.jwt_secret)?;
        Ok(Self(actor))
    }
}

impl AuthUser {
    /// Requires the admin role.
    ///
    /// # Errors
    ///
    /// Returns [`AggregatorError::Authorization`] for any other role.
    pub fn require_admin(&self) -> Result<&Actor, AggregatorError> {
        if self.0.role == Role::Admin {
            Ok(&self.0)
        } else {
            Err(AggregatorError::Authorization(
                "admin role required".to_string(),
            ))
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};

    use super::*;

    const SECRET: &str = "test-secret";

    fn token_for(claims: &Claims, secret: &str) -> String {
        match encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        ) {
            Ok(token) => token,
            Err(err) => panic!("token encoding failed: {err}"),
        }
    }

    fn worker_claims() -> Claims {
        Claims {
            sub: "rustam".to_string(),
            role: Role::CityWorker,
            city: Some("Душанбе".to_string()),
            active: true,
            exp: 4_102_444_800, // far future
        }
    }

    #[test]
    fn valid_token_yields_the_actor() {
        let token = token_for(&worker_claims(), SECRET);
        let Ok(actor) = verify_token(&token, SECRET) else {
            panic!("verification should succeed");
        };

        assert_eq!(actor.username, "rustam");
        assert_eq!(actor.role, Role::CityWorker);
        assert_eq!(actor.city.as_deref(), Some("Душанбе"));
        assert!(actor.active);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = token_for(&worker_claims(), "other-secret");
        assert!(matches!(
            verify_token(&token, SECRET),
            Err(AggregatorError::Unauthenticated(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut claims = worker_claims();
        claims.exp = 1; // long past
        let token = token_for(&claims, SECRET);
        assert!(matches!(
            verify_token(&token, SECRET),
            Err(AggregatorError::Unauthenticated(_))
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(
            verify_token("not-a-token", SECRET),
            Err(AggregatorError::Unauthenticated(_))
        ));
    }
}
