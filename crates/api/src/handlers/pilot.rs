//! User-info endpoint: the pilot profile a logged-in client displays.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;
use topsky_core::types::DbId;
use topsky_db::repositories::MessageRepo;

use crate::auth::session::SessionFamily;
use crate::error::AppResult;
use crate::extract::query_map;
use crate::handlers::gate;
use crate::state::AppState;

/// Pilot profile returned by the user-info endpoints.
#[derive(Debug, Serialize)]
pub struct PilotInfo {
    pub pilot_id: DbId,
    pub name: String,
    pub email: String,
    pub country: String,
    pub timezone: String,
    pub opt_in: bool,
    pub status: i32,
    pub total_flights: i64,
    pub total_hours: i64,
    pub curr_airport_id: String,
}

/// GET /api/smartcars/user
pub async fn smartcars_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<PilotInfo>> {
    user_info(&state, SessionFamily::Signed, &headers, &params).await
}

/// GET /api/phpvms/user
pub async fn phpvms_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<PilotInfo>> {
    user_info(&state, SessionFamily::Opaque, &headers, &params).await
}

async fn user_info(
    state: &AppState,
    family: SessionFamily,
    headers: &HeaderMap,
    params: &HashMap<String, String>,
) -> AppResult<Json<PilotInfo>> {
    let query = query_map(params);
    let user = gate(state, family, headers, &query, None).await?;

    let total_flights = MessageRepo::count_for_user(&state.pool, user.id).await?;
    let total_hours = MessageRepo::total_hours_for_user(&state.pool, user.id).await?;

    Ok(Json(PilotInfo {
        pilot_id: user.id,
        name: user.full_name(),
        email: user.email,
        country: state.config.airline.country.clone(),
        timezone: state.config.airline.timezone.clone(),
        opt_in: true,
        status: 1,
        total_flights,
        total_hours,
        curr_airport_id: state.config.airline.home_airport.clone(),
    }))
}
