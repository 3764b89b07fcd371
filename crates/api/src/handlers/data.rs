//! Reference-data endpoints (aircraft, airports, schedules) and flight
//! bids. All are gated on a session value.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use topsky_core::reference::{Aircraft, Airport, Schedule};

use crate::auth::session::SessionFamily;
use crate::error::{AppError, AppResult};
use crate::extract::{query_map, BodyFields};
use crate::handlers::gate;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

macro_rules! reference_endpoint {
    ($signed:ident, $opaque:ident, $field:ident, $item:ty) => {
        pub async fn $signed(
            State(state): State<AppState>,
            headers: HeaderMap,
            Query(params): Query<HashMap<String, String>>,
        ) -> AppResult<Json<Vec<$item>>> {
            let query = query_map(&params);
            gate(&state, SessionFamily::Signed, &headers, &query, None).await?;
            Ok(Json(state.reference.$field.clone()))
        }

        pub async fn $opaque(
            State(state): State<AppState>,
            headers: HeaderMap,
            Query(params): Query<HashMap<String, String>>,
        ) -> AppResult<Json<Vec<$item>>> {
            let query = query_map(&params);
            gate(&state, SessionFamily::Opaque, &headers, &query, None).await?;
            Ok(Json(state.reference.$field.clone()))
        }
    };
}

reference_endpoint!(smartcars_aircraft, phpvms_aircraft, aircraft, Aircraft);
reference_endpoint!(smartcars_airports, phpvms_airports, airports, Airport);
reference_endpoint!(smartcars_schedules, phpvms_schedules, schedules, Schedule);

// ---------------------------------------------------------------------------
// Bids
// ---------------------------------------------------------------------------

/// POST /api/smartcars/bid
pub async fn smartcars_bid(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    BodyFields(body): BodyFields,
) -> AppResult<Json<Value>> {
    bid(&state, SessionFamily::Signed, &headers, &params, body).await
}

/// POST /api/phpvms/bid
pub async fn phpvms_bid(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    BodyFields(body): BodyFields,
) -> AppResult<Json<Value>> {
    bid(&state, SessionFamily::Opaque, &headers, &params, body).await
}

/// Record a pilot's intent to fly a schedule. Bids are not persisted --
/// the client only needs the acknowledgement record.
async fn bid(
    state: &AppState,
    family: SessionFamily,
    headers: &HeaderMap,
    params: &HashMap<String, String>,
    body: Map<String, Value>,
) -> AppResult<Json<Value>> {
    let query = query_map(params);
    let user = gate(state, family, headers, &query, Some(&body)).await?;

    let flight_id = field_text(&body, "flight_id")
        .ok_or_else(|| AppError::BadRequest("Flight ID is required".into()))?;
    let aircraft_id = field_text(&body, "aircraft_id");

    Ok(Json(json!({
        "bid": {
            "id": format!("bid_{}_{flight_id}", user.id),
            "user_id": user.id,
            "flight_id": flight_id,
            "aircraft_id": aircraft_id,
            "created_at": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        },
        "message": "Bid created successfully",
    })))
}

fn field_text(body: &Map<String, Value>, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
