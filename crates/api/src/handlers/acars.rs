//! Flight-event ingest: position reports, PIREPs, and the bulk message
//! endpoint, plus the debug request log.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use topsky_core::fields::SECRET_ALIASES;
use topsky_db::models::message::{message_types, CreateAcarsMessage, MessageDirection};
use topsky_db::models::user::User;
use topsky_db::repositories::MessageRepo;
use validator::Validate;

use crate::auth::session::{resolve_session, SessionFamily};
use crate::error::{AppError, AppResult};
use crate::extract::{bearer_token, lenient, query_map, BodyFields};
use crate::handlers::gate;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Ingest DTOs
// ---------------------------------------------------------------------------

/// In-flight position report, as sent by smartCARS during a leg.
#[derive(Debug, Deserialize, Validate)]
pub struct PositionReport {
    #[serde(default, alias = "aircraft_id")]
    #[validate(required, length(min = 1))]
    pub aircraft: Option<String>,
    #[serde(default, alias = "latitude", deserialize_with = "lenient::f64_opt")]
    #[validate(required, range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[serde(default, alias = "longitude", deserialize_with = "lenient::f64_opt")]
    #[validate(required, range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,
    #[serde(default, deserialize_with = "lenient::i32_opt")]
    pub altitude: Option<i32>,
    #[serde(default, deserialize_with = "lenient::i32_opt")]
    #[validate(range(min = 0, max = 360))]
    pub heading: Option<i32>,
    #[serde(default, deserialize_with = "lenient::i32_opt")]
    pub speed: Option<i32>,
    #[serde(default)]
    pub flight_number: Option<String>,
    #[serde(default)]
    pub route: Option<String>,
}

/// Completed-flight report. The required set is the flight totals.
#[derive(Debug, Deserialize, Validate)]
pub struct PirepReport {
    #[serde(default)]
    #[validate(required, length(min = 1))]
    pub flight_number: Option<String>,
    #[serde(default, alias = "aircraft_id")]
    pub aircraft: Option<String>,
    #[serde(default, alias = "departure", alias = "departure_airport")]
    pub dpt_airport: Option<String>,
    #[serde(default, alias = "arrival", alias = "arrival_airport")]
    pub arr_airport: Option<String>,
    /// Block time in minutes.
    #[serde(default, deserialize_with = "lenient::i32_opt")]
    #[validate(required, range(min = 0))]
    pub flight_time: Option<i32>,
    /// Great-circle distance in nautical miles.
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    #[validate(required, range(min = 0.0))]
    pub distance: Option<f64>,
    /// Fuel burn in kilograms.
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    #[validate(required, range(min = 0.0))]
    pub fuel_used: Option<f64>,
    #[serde(default, deserialize_with = "lenient::i32_opt")]
    pub landing_rate: Option<i32>,
}

/// One entry of the bulk message endpoint. Carries its own direction.
#[derive(Debug, Deserialize, Validate)]
pub struct BulkMessageItem {
    #[serde(default, alias = "aircraft")]
    #[validate(required, length(min = 1))]
    pub aircraft_id: Option<String>,
    #[serde(default)]
    #[validate(required)]
    pub direction: Option<MessageDirection>,
    #[serde(default)]
    pub flight_number: Option<String>,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default, alias = "lat", deserialize_with = "lenient::f64_opt")]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[serde(default, alias = "lng", deserialize_with = "lenient::f64_opt")]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::i32_opt")]
    pub altitude: Option<i32>,
    #[serde(default, deserialize_with = "lenient::i32_opt")]
    pub speed: Option<i32>,
    #[serde(default, deserialize_with = "lenient::i32_opt")]
    #[validate(range(min = 0, max = 360))]
    pub heading: Option<i32>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub fuel_flow: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub engine_n1: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub engine_epr: Option<f64>,
    #[serde(default, deserialize_with = "lenient::i32_opt")]
    pub pax_count: Option<i32>,
}

// ---------------------------------------------------------------------------
// Position reports
// ---------------------------------------------------------------------------

/// POST /api/smartcars/position
pub async fn smartcars_position(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    BodyFields(body): BodyFields,
) -> AppResult<Json<Value>> {
    position_report(&state, SessionFamily::Signed, &headers, &params, body).await
}

/// POST /api/phpvms/position
pub async fn phpvms_position(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    BodyFields(body): BodyFields,
) -> AppResult<Json<Value>> {
    position_report(&state, SessionFamily::Opaque, &headers, &params, body).await
}

async fn position_report(
    state: &AppState,
    family: SessionFamily,
    headers: &HeaderMap,
    params: &HashMap<String, String>,
    body: Map<String, Value>,
) -> AppResult<Json<Value>> {
    let query = query_map(params);
    let user = gate(state, family, headers, &query, Some(&body)).await?;

    let report = parse_report::<PositionReport>(&body, "Invalid position data")?;

    let mut input = CreateAcarsMessage::bare(
        user.id,
        MessageDirection::Outgoing,
        sanitized_payload(&body),
    );
    input.message_type = message_types::POSITION;
    input.aircraft_ident = report.aircraft.unwrap_or_default();
    input.flight_number = report.flight_number.unwrap_or_default();
    input.route = report.route.unwrap_or_default();
    input.latitude = report.lat;
    input.longitude = report.lng;
    input.altitude = report.altitude;
    input.heading = report.heading;
    input.speed = report.speed;

    let message = MessageRepo::create(&state.pool, &input).await?;
    tracing::debug!(user_id = user.id, message_id = message.id, "Position report stored");

    Ok(Json(json!({
        "message": "Position updated successfully",
        "id": message.id,
    })))
}

// ---------------------------------------------------------------------------
// PIREPs
// ---------------------------------------------------------------------------

/// POST /api/smartcars/pirep
pub async fn smartcars_pirep(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    BodyFields(body): BodyFields,
) -> AppResult<Json<Value>> {
    pirep_report(&state, SessionFamily::Signed, &headers, &params, body).await
}

/// POST /api/phpvms/pirep
pub async fn phpvms_pirep(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    BodyFields(body): BodyFields,
) -> AppResult<Json<Value>> {
    pirep_report(&state, SessionFamily::Opaque, &headers, &params, body).await
}

async fn pirep_report(
    state: &AppState,
    family: SessionFamily,
    headers: &HeaderMap,
    params: &HashMap<String, String>,
    body: Map<String, Value>,
) -> AppResult<Json<Value>> {
    let query = query_map(params);
    let user = gate(state, family, headers, &query, Some(&body)).await?;

    let report = parse_report::<PirepReport>(&body, "Invalid PIREP data")?;

    let mut input = CreateAcarsMessage::bare(
        user.id,
        MessageDirection::Incoming,
        sanitized_payload(&body),
    );
    input.message_type = message_types::PIREP;
    input.aircraft_ident = report.aircraft.unwrap_or_default();
    input.flight_number = report.flight_number.unwrap_or_default();
    input.departure_airport = report.dpt_airport.unwrap_or_default();
    input.arrival_airport = report.arr_airport.unwrap_or_default();
    input.flight_time_minutes = report.flight_time;
    input.distance_nm = report.distance;
    input.fuel_used = report.fuel_used;
    input.landing_rate = report.landing_rate;

    let message = MessageRepo::create(&state.pool, &input).await?;
    tracing::info!(user_id = user.id, message_id = message.id, "PIREP stored");

    Ok(Json(json!({
        "pirep_id": message.id,
        "message": "PIREP submitted successfully",
        "status": "pending",
    })))
}

// ---------------------------------------------------------------------------
// Bulk message create (signed-token only)
// ---------------------------------------------------------------------------

/// POST /api/acars/messages
///
/// Accepts an ordered list of event payloads, either as a bare JSON array
/// or as `{"messages": [...]}`. Each entry is validated and inserted
/// independently: one malformed entry does not abort the batch, and index
/// N of the request maps to result N of the response.
pub async fn bridge_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    Json(value): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let (items, body_session) = match value {
        Value::Array(items) => (items, None),
        Value::Object(map) => {
            let session = map
                .get("session")
                .and_then(|v| v.as_str())
                .map(str::to_string);
            let items = map
                .get("messages")
                .and_then(|v| v.as_array())
                .cloned()
                .ok_or_else(|| AppError::BadRequest("Expected a list of messages".into()))?;
            (items, session)
        }
        _ => return Err(AppError::BadRequest("Expected a list of messages".into())),
    };

    let raw = body_session
        .or_else(|| params.get("session").cloned())
        .or_else(|| bearer_token(&headers))
        .ok_or(AppError::AuthRequired)?;
    let user = resolve_session(&state, SessionFamily::Signed, &raw).await?;

    let mut created = Vec::new();
    let mut errors = Vec::new();

    for (index, item) in items.into_iter().enumerate() {
        match store_bulk_item(&state, &user, &item).await {
            Ok(message) => created.push(message),
            Err(BulkItemError::Invalid(detail)) => {
                errors.push(json!({ "index": index, "errors": detail }));
            }
            // A store fault aborts the whole request: the client cannot
            // fix it by editing an entry.
            Err(BulkItemError::Fatal(e)) => return Err(e),
        }
    }

    let status = if created.is_empty() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::CREATED
    };

    let body = json!({
        "created_count": created.len(),
        "error_count": errors.len(),
        "created_messages": created,
        "errors": errors,
    });

    Ok((status, Json(body)))
}

enum BulkItemError {
    /// Per-item validation failure, reported in the response.
    Invalid(Value),
    /// Infrastructure failure, propagated as the overall response.
    Fatal(AppError),
}

async fn store_bulk_item(
    state: &AppState,
    user: &User,
    item: &Value,
) -> Result<topsky_db::models::message::AcarsMessage, BulkItemError> {
    let Some(fields) = item.as_object() else {
        return Err(BulkItemError::Invalid(
            json!({ "non_field_errors": ["Expected an object."] }),
        ));
    };

    let parsed: BulkMessageItem = serde_json::from_value(item.clone())
        .map_err(|e| BulkItemError::Invalid(json!({ "non_field_errors": [e.to_string()] })))?;
    parsed
        .validate()
        .map_err(|e| BulkItemError::Invalid(serde_json::to_value(&e).unwrap_or_default()))?;

    // `validate` guarantees both required fields are present.
    let direction = parsed.direction.unwrap_or(MessageDirection::Incoming);

    let mut input = CreateAcarsMessage::bare(user.id, direction, sanitized_payload(fields));
    input.aircraft_ident = parsed.aircraft_id.unwrap_or_default();
    input.flight_number = parsed.flight_number.unwrap_or_default();
    input.route = parsed.route.unwrap_or_default();
    input.latitude = parsed.latitude;
    input.longitude = parsed.longitude;
    input.altitude = parsed.altitude;
    input.speed = parsed.speed;
    input.heading = parsed.heading;
    input.fuel_flow = parsed.fuel_flow;
    input.engine_n1 = parsed.engine_n1;
    input.engine_epr = parsed.engine_epr;
    input.pax_count = parsed.pax_count;

    MessageRepo::create(&state.pool, &input)
        .await
        .map_err(|e| BulkItemError::Fatal(e.into()))
}

/// GET /api/acars/messages
///
/// The authenticated user's recent flight events, newest first.
pub async fn bridge_list_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<Value>> {
    let query = query_map(&params);
    let user = gate(&state, SessionFamily::Signed, &headers, &query, None).await?;

    let messages = MessageRepo::list_for_user(&state.pool, user.id, 100).await?;
    Ok(Json(json!({ "count": messages.len(), "messages": messages })))
}

// ---------------------------------------------------------------------------
// Debug request log
// ---------------------------------------------------------------------------

/// GET /api/acars/debug/requests
///
/// The bounded in-memory log of recent authentication attempts. Records
/// carry secret fingerprints, never secrets.
pub async fn debug_requests(State(state): State<AppState>) -> Json<Value> {
    let records = state.request_log_snapshot();
    Json(json!({ "count": records.len(), "requests": records }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Deserialize and validate an ingest DTO from the body map, mapping both
/// failure kinds onto the endpoint's `{"message", "errors"}` shape.
fn parse_report<T>(body: &Map<String, Value>, message: &'static str) -> AppResult<T>
where
    T: serde::de::DeserializeOwned + Validate,
{
    let report: T = serde_json::from_value(Value::Object(body.clone())).map_err(|e| {
        AppError::ValidationFailed {
            message,
            errors: json!({ "non_field_errors": [e.to_string()] }),
        }
    })?;
    report.validate().map_err(|e| AppError::ValidationFailed {
        message,
        errors: serde_json::to_value(&e).unwrap_or_default(),
    })?;
    Ok(report)
}

/// Copy of the client message with credential fields removed; this is
/// what lands in the stored `payload` column.
fn sanitized_payload(body: &Map<String, Value>) -> Value {
    let mut map = body.clone();
    map.remove("session");
    for alias in SECRET_ALIASES {
        map.remove(*alias);
    }
    Value::Object(map)
}
