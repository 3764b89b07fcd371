//! Repository for the `smartcars_profiles` table.

use sqlx::PgPool;
use topsky_core::tokens::generate_service_token;
use topsky_core::types::DbId;

use crate::models::profile::SmartcarsProfile;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, api_key, acars_token, is_active, last_used, created_at";

/// Provides lookups and lazy creation for service profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Fetch the profile for a user, creating one with fresh tokens if it
    /// does not exist yet.
    ///
    /// Creation races from concurrent first logins are resolved by the
    /// database: `ON CONFLICT (user_id) DO NOTHING` followed by a plain
    /// fetch means both callers observe the same single row.
    pub async fn get_or_create(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<SmartcarsProfile, sqlx::Error> {
        sqlx::query(
            "INSERT INTO smartcars_profiles (user_id, api_key, acars_token)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(generate_service_token())
        .bind(generate_service_token())
        .execute(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM smartcars_profiles WHERE user_id = $1");
        sqlx::query_as::<_, SmartcarsProfile>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Find an active profile for a user.
    pub async fn find_active_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<SmartcarsProfile>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM smartcars_profiles WHERE user_id = $1 AND is_active");
        sqlx::query_as::<_, SmartcarsProfile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active profile by its API key (opaque session lookup).
    pub async fn find_active_by_api_key(
        pool: &PgPool,
        api_key: &str,
    ) -> Result<Option<SmartcarsProfile>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM smartcars_profiles WHERE api_key = $1 AND is_active");
        sqlx::query_as::<_, SmartcarsProfile>(&query)
            .bind(api_key)
            .fetch_optional(pool)
            .await
    }

    /// Set `last_used` to now after a successful authentication.
    pub async fn touch_last_used(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE smartcars_profiles SET last_used = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Deactivate a profile, invalidating its API key as a session value.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE smartcars_profiles SET is_active = false WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
