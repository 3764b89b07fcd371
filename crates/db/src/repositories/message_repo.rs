//! Repository for the `acars_messages` table (append-only).

use sqlx::PgPool;
use topsky_core::types::DbId;

use crate::models::message::{AcarsMessage, CreateAcarsMessage};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, message_type, aircraft_ident, flight_number, route, \
                        departure_airport, arrival_airport, latitude, longitude, altitude, \
                        speed, heading, time_off, time_on, flight_time_minutes, distance_nm, \
                        fuel_used, fuel_flow, engine_n1, engine_epr, landing_rate, pax_count, \
                        direction, payload, created_at";

/// Provides inserts and per-user statistics for flight events.
pub struct MessageRepo;

impl MessageRepo {
    /// Insert a flight event, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAcarsMessage,
    ) -> Result<AcarsMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO acars_messages
                (user_id, message_type, aircraft_ident, flight_number, route,
                 departure_airport, arrival_airport, latitude, longitude, altitude,
                 speed, heading, time_off, time_on, flight_time_minutes, distance_nm,
                 fuel_used, fuel_flow, engine_n1, engine_epr, landing_rate, pax_count,
                 direction, payload)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                     $15, $16, $17, $18, $19, $20, $21, $22, $23, $24)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AcarsMessage>(&query)
            .bind(input.user_id)
            .bind(input.message_type)
            .bind(&input.aircraft_ident)
            .bind(&input.flight_number)
            .bind(&input.route)
            .bind(&input.departure_airport)
            .bind(&input.arrival_airport)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.altitude)
            .bind(input.speed)
            .bind(input.heading)
            .bind(input.time_off)
            .bind(input.time_on)
            .bind(input.flight_time_minutes)
            .bind(input.distance_nm)
            .bind(input.fuel_used)
            .bind(input.fuel_flow)
            .bind(input.engine_n1)
            .bind(input.engine_epr)
            .bind(input.landing_rate)
            .bind(input.pax_count)
            .bind(input.direction.as_str())
            .bind(&input.payload)
            .fetch_one(pool)
            .await
    }

    /// Find a message by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AcarsMessage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM acars_messages WHERE id = $1");
        sqlx::query_as::<_, AcarsMessage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's messages, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<AcarsMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM acars_messages
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, AcarsMessage>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Count of all messages owned by a user.
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM acars_messages WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Total logged flight hours for a user, from PIREP flight times.
    pub async fn total_hours_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let minutes: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(flight_time_minutes)::BIGINT FROM acars_messages WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(minutes.unwrap_or(0) / 60)
    }
}
