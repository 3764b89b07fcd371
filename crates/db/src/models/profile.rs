//! smartCARS service-profile model.

use serde::Serialize;
use sqlx::FromRow;
use topsky_core::types::{DbId, Timestamp};

/// A row from the `smartcars_profiles` table.
///
/// `api_key` is returned to the owning client at login (it IS the opaque
/// session value), but must never appear in logs; use
/// `topsky_core::tokens::fingerprint` there.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SmartcarsProfile {
    pub id: DbId,
    pub user_id: DbId,
    pub api_key: String,
    pub acars_token: String,
    pub is_active: bool,
    pub last_used: Option<Timestamp>,
    pub created_at: Timestamp,
}
