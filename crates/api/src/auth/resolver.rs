//! Credential resolution against the user store.
//!
//! Given an identifier/secret pair (already extracted by
//! `topsky_core::fields`), resolve it to a verified user. Every failure
//! mode -- unknown identifier, wrong secret, inactive account, missing
//! profile -- folds into the single uniform
//! [`AppError::InvalidCredentials`], so a caller probing the login
//! endpoint cannot enumerate accounts.

use topsky_core::fields::Credentials;
use topsky_core::tokens::fingerprint;
use topsky_db::models::user::User;
use topsky_db::repositories::{ProfileRepo, UserRepo};
use topsky_db::DbPool;

use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};

/// Which credential path authenticated the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedVia {
    ApiKey,
    Password,
}

/// Resolve credentials to a verified active user.
///
/// Lookup order:
/// 1. Identifier contains `@`: active user by email (case-insensitive).
/// 2. Otherwise, or when no email matched: active user by username.
/// 3. No user found either way: resolution fails.
///
/// For a found user the secret is checked against the service-profile API
/// key first (exact match), then against the account password. The
/// username branch doubles as the framework-authenticate fallback -- it
/// performs the same lookup-plus-password check a generic backend would.
pub async fn resolve(pool: &DbPool, credentials: &Credentials) -> AppResult<(User, ResolvedVia)> {
    let user = lookup_user(pool, &credentials.identifier).await?;

    let Some(user) = user else {
        tracing::debug!(
            identifier = %credentials.identifier,
            "Login failed: unknown identifier"
        );
        return Err(AppError::InvalidCredentials);
    };

    let via = check_secret(pool, &user, &credentials.secret).await?;

    let Some(via) = via else {
        tracing::debug!(
            user_id = user.id,
            secret_fingerprint = %fingerprint(&credentials.secret),
            "Login failed: secret mismatch"
        );
        return Err(AppError::InvalidCredentials);
    };

    UserRepo::record_login(pool, user.id).await?;
    tracing::info!(user_id = user.id, via = ?via, "Login succeeded");
    Ok((user, via))
}

/// Find an active user by email (when the identifier looks like one),
/// falling back to an exact username match.
async fn lookup_user(pool: &DbPool, identifier: &str) -> AppResult<Option<User>> {
    if identifier.contains('@') {
        if let Some(user) = UserRepo::find_active_by_email(pool, identifier).await? {
            return Ok(Some(user));
        }
    }
    Ok(UserRepo::find_active_by_username(pool, identifier).await?)
}

/// Two-step secret check: service-profile API key, then password.
///
/// Side effects on success: the API-key path touches the profile's
/// `last_used`; the password path lazily creates a profile when none
/// exists yet (get-or-create, never an error if one already does).
async fn check_secret(pool: &DbPool, user: &User, secret: &str) -> AppResult<Option<ResolvedVia>> {
    if let Some(profile) = ProfileRepo::find_active_by_user(pool, user.id).await? {
        if profile.api_key == secret {
            ProfileRepo::touch_last_used(pool, profile.id).await?;
            return Ok(Some(ResolvedVia::ApiKey));
        }
    }

    match verify_password(secret, &user.password_hash) {
        Ok(true) => {
            ProfileRepo::get_or_create(pool, user.id).await?;
            Ok(Some(ResolvedVia::Password))
        }
        Ok(false) => Ok(None),
        Err(e) => {
            // A corrupt stored hash is a server problem, but exposing it
            // would distinguish this account from any other. Log and fold.
            tracing::error!(user_id = user.id, error = %e, "Password hash verification error");
            Ok(None)
        }
    }
}
