//! Signed session tokens for the official smartCARS 3 family.
//!
//! Tokens are HS256-signed JWTs. The numeric user id is embedded twice:
//! under `sub` (what the smartCARS client reads) and under `user_id`
//! (what everything else reads). Expiry is enforced on every
//! verification; there is no server-side revocation list.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use topsky_core::types::DbId;

/// Claims embedded in every signed session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's database id, read by the smartCARS client.
    pub sub: DbId,
    /// The same id under the name the rest of this codebase uses.
    pub user_id: DbId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for audit trails.
    pub jti: String,
}

/// Configuration for session token generation and validation.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Session lifetime in days (default: 7, the smartCARS 3 standard).
    pub ttl_days: i64,
}

/// Default session lifetime in days.
const DEFAULT_TTL_DAYS: i64 = 7;

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var            | Required | Default |
    /// |--------------------|----------|---------|
    /// | `SESSION_SECRET`   | **yes**  | --      |
    /// | `SESSION_TTL_DAYS` | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if `SESSION_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("SESSION_SECRET").expect("SESSION_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "SESSION_SECRET must not be empty");

        let ttl_days: i64 = std::env::var("SESSION_TTL_DAYS")
            .unwrap_or_else(|_| DEFAULT_TTL_DAYS.to_string())
            .parse()
            .expect("SESSION_TTL_DAYS must be a valid i64");

        Self { secret, ttl_days }
    }
}

/// Generate an HS256 session token for the given user.
///
/// Returns the token together with its expiry as a Unix timestamp (the
/// login response echoes the expiry to the client).
pub fn generate_session_token(
    user_id: DbId,
    config: &SessionConfig,
) -> Result<(String, i64), jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.ttl_days * 24 * 60 * 60;

    let claims = Claims {
        sub: user_id,
        user_id,
        exp,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok((token, exp))
}

/// Validate and decode a session token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration automatically.
pub fn validate_session_token(
    token: &str,
    config: &SessionConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}
