//! Session issuance and verification.
//!
//! Two variants exist and stay distinct:
//!
//! - **Opaque key** (phpVMS and bridge families): the service profile's
//!   stored `api_key`, returned verbatim. The expiry echoed at login is
//!   synthesized for client compatibility and is NOT enforced -- the key
//!   stays valid until the profile is deactivated.
//! - **Signed token** (official smartCARS family): an HS256 JWT with a
//!   7-day lifetime, enforced on every verification, stateless.
//!
//! Gated endpoints re-verify on every request; there is no session
//! affinity and no logout.

use topsky_core::types::DbId;
use topsky_db::models::profile::SmartcarsProfile;
use topsky_db::models::user::User;
use topsky_db::repositories::{ProfileRepo, UserRepo};

use crate::auth::jwt::{generate_session_token, validate_session_token};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Which session mechanism an endpoint family uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFamily {
    /// Signed, time-boxed JWT.
    Signed,
    /// Long-lived opaque service-profile key.
    Opaque,
}

/// A freshly issued session value plus the expiry echoed to the client.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub session: String,
    /// Unix timestamp. Enforced for [`SessionFamily::Signed`] only.
    pub expiry: i64,
}

/// Mint a session value for a verified user.
pub async fn issue(state: &AppState, user_id: DbId, family: SessionFamily) -> AppResult<IssuedSession> {
    match family {
        SessionFamily::Signed => {
            let (session, expiry) = generate_session_token(user_id, &state.config.session)
                .map_err(|e| AppError::Internal(format!("Token generation error: {e}")))?;
            Ok(IssuedSession { session, expiry })
        }
        SessionFamily::Opaque => {
            let (profile, expiry) = issue_opaque(state, user_id).await?;
            Ok(IssuedSession {
                session: profile.api_key,
                expiry,
            })
        }
    }
}

/// Opaque-variant issuance, returning the whole profile so the bridge
/// family can also expose the secondary ACARS token.
pub async fn issue_opaque(
    state: &AppState,
    user_id: DbId,
) -> AppResult<(SmartcarsProfile, i64)> {
    let profile = ProfileRepo::get_or_create(&state.pool, user_id).await?;
    ProfileRepo::touch_last_used(&state.pool, profile.id).await?;
    // Response-shape compatibility only; opaque keys do not expire.
    let expiry = chrono::Utc::now().timestamp() + state.config.session.ttl_days * 24 * 60 * 60;
    Ok((profile, expiry))
}

/// Resolve a presented session value back to its active user.
///
/// Expired, malformed, unknown, and orphaned values all return the same
/// [`AppError::AuthRequired`].
pub async fn resolve_session(
    state: &AppState,
    family: SessionFamily,
    raw: &str,
) -> AppResult<User> {
    let user_id = match family {
        SessionFamily::Signed => validate_session_token(raw, &state.config.session)
            .map_err(|_| AppError::AuthRequired)?
            .sub,
        SessionFamily::Opaque => {
            let profile = ProfileRepo::find_active_by_api_key(&state.pool, raw)
                .await?
                .ok_or(AppError::AuthRequired)?;
            ProfileRepo::touch_last_used(&state.pool, profile.id).await?;
            profile.user_id
        }
    };

    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or(AppError::AuthRequired)?;

    Ok(user)
}
