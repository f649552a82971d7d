//! Authentication service implementation
//!
//! Bearer-token verification for the HTTP surface. Tokens are HS256 JWTs
//! whose `sub` claim carries the user ID; the API verifies tokens, it
//! does not run a sign-up or login flow.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::utils::errors::Result;

/// Claims carried by a gatherly bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub exp: i64,
}

/// The authenticated principal of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
}

#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Issue a token for a user, valid for the configured TTL.
    pub fn issue_token(&self, user_id: i64) -> Result<String> {
        let expires_at = Utc::now() + Duration::seconds(self.config.token_ttl_seconds as i64);
        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify a bearer token and extract the principal.
    pub fn verify_token(&self, token: &str) -> Result<CurrentUser> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(CurrentUser {
            id: data.claims.sub,
        })
    }
}
