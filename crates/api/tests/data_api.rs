//! HTTP-level integration tests for handler info, the pilot profile,
//! reference data, bids, and service health.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, create_test_user, get, get_auth, post_json};
use sqlx::PgPool;
use topsky_api::auth::jwt::generate_session_token;
use topsky_db::models::message::{CreateAcarsMessage, MessageDirection};
use topsky_db::repositories::{MessageRepo, ProfileRepo};

fn signed_session(user_id: i64) -> String {
    let (token, _) = generate_session_token(user_id, &common::test_config().session)
        .expect("token generation should succeed");
    token
}

// ---------------------------------------------------------------------------
// Handler info
// ---------------------------------------------------------------------------

/// The smartCARS handler descriptor is public and advertises auth.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_smartcars_handler_info(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/smartcars").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["apiVersion"], "1.0.2");
    assert_eq!(json["auth"], true);
    assert_eq!(json["handler"]["author"], "Topsky Virtual Airlines");
    assert!(json["time"].is_string());
}

/// The bridge descriptor uses the legacy envelope shape.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_bridge_handler_info(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/acars").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["apiVersion"], "1.0.0");
    assert_eq!(json["status"], "success");
    assert!(json["data"]["features"].is_array());
}

// ---------------------------------------------------------------------------
// Pilot profile
// ---------------------------------------------------------------------------

/// User info reports the flight count and hours from the event log.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_info_counts_flights(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "countpilot").await;

    // Two stored events, one with 120 minutes of block time.
    let mut first = CreateAcarsMessage::bare(
        user.id,
        MessageDirection::Outgoing,
        serde_json::json!({}),
    );
    first.aircraft_ident = "SP-TSA".to_string();
    MessageRepo::create(&pool, &first).await.unwrap();

    let mut second = CreateAcarsMessage::bare(
        user.id,
        MessageDirection::Incoming,
        serde_json::json!({}),
    );
    second.aircraft_ident = "SP-TSA".to_string();
    second.flight_time_minutes = Some(120);
    MessageRepo::create(&pool, &second).await.unwrap();

    let session = signed_session(user.id);
    let app = build_test_app(pool);
    let response = get(app, &format!("/api/smartcars/user?session={session}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["pilot_id"], user.id);
    assert_eq!(json["name"], "Jan Kowalski");
    assert_eq!(json["total_flights"], 2);
    assert_eq!(json["total_hours"], 2);
    assert_eq!(json["country"], "PL");
    assert_eq!(json["timezone"], "Europe/Warsaw");
    assert_eq!(json["curr_airport_id"], "EPWA");
}

/// The session may arrive as a bearer header instead of a query param.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_info_accepts_bearer_header(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "bearerpilot").await;
    let session = signed_session(user.id);
    let app = build_test_app(pool);

    let response = get_auth(app, "/api/smartcars/user", &session).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["pilot_id"], user.id);
}

/// The phpVMS family resolves the opaque key for the same profile data.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_phpvms_user_info_via_api_key(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "opaquepilot").await;
    let profile = ProfileRepo::get_or_create(&pool, user.id).await.unwrap();
    let app = build_test_app(pool);

    let response = get(
        app,
        &format!("/api/phpvms/user?session={}", profile.api_key),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["pilot_id"], user.id);
    assert_eq!(json["total_flights"], 0);
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

/// Authenticated clients receive the configured reference datasets.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_reference_data_endpoints(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "refpilot").await;
    let session = signed_session(user.id);
    let app = build_test_app(pool);

    let aircraft = body_json(
        get(app.clone(), &format!("/api/smartcars/aircraft?session={session}")).await,
    )
    .await;
    let aircraft = aircraft.as_array().expect("aircraft must be a list");
    assert_eq!(aircraft[0]["icao"], "B738");
    assert_eq!(aircraft[0]["registration"], "SP-TSA");

    let airports = body_json(
        get(app.clone(), &format!("/api/smartcars/airports?session={session}")).await,
    )
    .await;
    let airports = airports.as_array().expect("airports must be a list");
    assert!(airports.iter().any(|a| a["id"] == "EPWA" && a["hub"] == true));

    let schedules = body_json(
        get(app, &format!("/api/smartcars/schedules?session={session}")).await,
    )
    .await;
    let schedules = schedules.as_array().expect("schedules must be a list");
    assert_eq!(schedules[0]["flight_number"], "TS001");
    assert_eq!(schedules[0]["dpt_airport_id"], "EPWA");
}

/// Reference data is gated: no session means the uniform rejection.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_reference_data_requires_session(pool: PgPool) {
    let app = build_test_app(pool);

    for path in ["/api/smartcars/aircraft", "/api/phpvms/airports", "/api/smartcars/schedules"] {
        let response = get(app.clone(), path).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{path}");
        let json = body_json(response).await;
        assert_eq!(json["message"], "Authentication required", "{path}");
    }
}

// ---------------------------------------------------------------------------
// Bids
// ---------------------------------------------------------------------------

/// A bid echoes a synthetic record tied to the user and flight.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_bid_creates_record(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "bidpilot").await;
    let session = signed_session(user.id);
    let app = build_test_app(pool);

    let body = serde_json::json!({ "session": session, "flight_id": 1, "aircraft_id": 2 });
    let response = post_json(app, "/api/smartcars/bid", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Bid created successfully");
    assert_eq!(json["bid"]["id"], format!("bid_{}_1", user.id));
    assert_eq!(json["bid"]["user_id"], user.id);
}

/// A bid without a flight id is a 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_bid_requires_flight_id(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "nobidpilot").await;
    let session = signed_session(user.id);
    let app = build_test_app(pool);

    let body = serde_json::json!({ "session": session });
    let response = post_json(app, "/api/smartcars/bid", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Flight ID is required");
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// The health endpoint reports database reachability.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_health_check(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}
