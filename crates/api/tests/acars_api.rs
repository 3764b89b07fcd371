//! HTTP-level integration tests for flight-event ingest: position
//! reports, PIREPs, the bulk message endpoint, and gated-endpoint
//! failure uniformity.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{body_bytes, body_json, build_test_app, create_test_user, get, post_form, post_json};
use sqlx::PgPool;
use topsky_api::auth::jwt::generate_session_token;
use topsky_db::models::message::MessageDirection;
use topsky_db::repositories::{MessageRepo, ProfileRepo};

/// Mint a signed session token the way the server would.
fn signed_session(user_id: i64) -> String {
    let (token, _) = generate_session_token(user_id, &common::test_config().session)
        .expect("token generation should succeed");
    token
}

// ---------------------------------------------------------------------------
// Position reports
// ---------------------------------------------------------------------------

/// A position report creates an OUTGOING flight event and returns its id.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_position_report_creates_outgoing_event(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "pospilot").await;
    let session = signed_session(user.id);
    let app = build_test_app(pool.clone());

    let body = serde_json::json!({
        "session": session,
        "aircraft": "SP-TSA",
        "lat": 52.16569,
        "lng": 20.96709,
        "altitude": 35000,
        "heading": 270,
        "speed": 480,
        "flight_number": "TS001",
    });
    let response = post_json(app, "/api/smartcars/position", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Position updated successfully");

    let id = json["id"].as_i64().expect("created id must be returned");
    let message = MessageRepo::find_by_id(&pool, id)
        .await
        .expect("lookup should succeed")
        .expect("message must exist");
    assert_matches!(message.direction, MessageDirection::Outgoing);
    assert_eq!(message.user_id, user.id);
    assert_eq!(message.aircraft_ident, "SP-TSA");
    assert_eq!(message.latitude, Some(52.16569));
    assert_eq!(message.message_type, "POSITION");
}

/// Form-encoded position reports (phpVMS transport, opaque session in the
/// body) decode their stringly-typed numbers.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_position_report_form_encoded(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "formpilot").await;
    let profile = ProfileRepo::get_or_create(&pool, user.id)
        .await
        .expect("profile creation should succeed");
    let app = build_test_app(pool.clone());

    let body = format!(
        "session={}&aircraft=SP-TSB&lat=51.47002&lng=-0.45426&altitude=37000.0",
        profile.api_key
    );
    let response = post_form(app, "/api/phpvms/position", &body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let id = json["id"].as_i64().unwrap();
    let message = MessageRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(message.altitude, Some(37000));
    assert_eq!(message.longitude, Some(-0.45426));
}

/// The stored payload keeps the client's fields but never its credentials.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_position_payload_is_sanitized(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "paypilot").await;
    let session = signed_session(user.id);
    let app = build_test_app(pool.clone());

    let body = serde_json::json!({
        "session": session,
        "aircraft": "SP-TSA",
        "lat": 52.0,
        "lng": 21.0,
        "gate": "A12",
    });
    let response = post_json(app, "/api/smartcars/position", body).await;
    let json = body_json(response).await;

    let id = json["id"].as_i64().unwrap();
    let message = MessageRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(message.payload["gate"], "A12");
    assert!(message.payload.get("session").is_none(), "session must be stripped");
}

/// Missing required position fields fail with structured per-field errors.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_position_report_missing_fields(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "badpospilot").await;
    let session = signed_session(user.id);
    let app = build_test_app(pool);

    let body = serde_json::json!({ "session": session, "aircraft": "SP-TSA" });
    let response = post_json(app, "/api/smartcars/position", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Invalid position data");
    assert!(json["errors"]["lat"].is_array(), "lat must be reported missing");
    assert!(json["errors"]["lng"].is_array(), "lng must be reported missing");
}

// ---------------------------------------------------------------------------
// PIREPs
// ---------------------------------------------------------------------------

/// A PIREP creates an INCOMING flight event with the flight totals.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_pirep_creates_incoming_event(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "pireppilot").await;
    let session = signed_session(user.id);
    let app = build_test_app(pool.clone());

    let body = serde_json::json!({
        "session": session,
        "flight_number": "TS001",
        "aircraft": "SP-TSA",
        "dpt_airport": "EPWA",
        "arr_airport": "EGLL",
        "flight_time": 120,
        "distance": 1200.5,
        "fuel_used": 8400.0,
        "landing_rate": -180,
    });
    let response = post_json(app, "/api/smartcars/pirep", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "PIREP submitted successfully");
    assert_eq!(json["status"], "pending");

    let id = json["pirep_id"].as_i64().expect("pirep_id must be returned");
    let message = MessageRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(message.direction, MessageDirection::Incoming);
    assert_eq!(message.message_type, "PIREP");
    assert_eq!(message.flight_time_minutes, Some(120));
    assert_eq!(message.distance_nm, Some(1200.5));
    assert_eq!(message.fuel_used, Some(8400.0));
    assert_eq!(message.departure_airport, "EPWA");
}

/// A PIREP without its flight totals is rejected field-by-field.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_pirep_requires_flight_totals(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "shortpirep").await;
    let session = signed_session(user.id);
    let app = build_test_app(pool);

    let body = serde_json::json!({ "session": session, "flight_number": "TS001" });
    let response = post_json(app, "/api/smartcars/pirep", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Invalid PIREP data");
    for field in ["flight_time", "distance", "fuel_used"] {
        assert!(
            json["errors"][field].is_array(),
            "{field} must be reported missing"
        );
    }
}

// ---------------------------------------------------------------------------
// Bulk message create
// ---------------------------------------------------------------------------

/// Three valid entries and one malformed: the batch partially succeeds,
/// and the bad entry's index is preserved.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_bulk_create_partial_success(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "bulkpilot").await;
    let session = signed_session(user.id);
    let app = build_test_app(pool.clone());

    let items = serde_json::json!([
        { "aircraft_id": "SP-TSA", "direction": "OUT", "flight_number": "TS001" },
        { "aircraft_id": "SP-TSA", "direction": "IN", "latitude": 52.1 },
        // Index 2: no aircraft_id and no direction.
        { "flight_number": "TS003" },
        { "aircraft_id": "SP-TSB", "direction": "OUTGOING" },
    ]);
    let response = post_json(
        app,
        &format!("/api/acars/messages?session={session}"),
        items,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["created_count"], 3);
    assert_eq!(json["error_count"], 1);

    let errors = json["errors"].as_array().expect("errors must be a list");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["index"], 2);

    let created = json["created_messages"].as_array().expect("created list");
    assert_eq!(created.len(), 3);
    assert_eq!(created[0]["direction"], "OUTGOING");
    assert_eq!(created[1]["direction"], "INCOMING");

    let count = MessageRepo::count_for_user(&pool, user.id).await.unwrap();
    assert_eq!(count, 3);
}

/// A batch where nothing validates returns 400 overall.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_bulk_create_all_invalid(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "allbadpilot").await;
    let session = signed_session(user.id);
    let app = build_test_app(pool);

    let items = serde_json::json!({
        "session": session,
        "messages": [ { "flight_number": "TS001" }, 42 ],
    });
    let response = post_json(app, "/api/acars/messages", items).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["created_count"], 0);
    assert_eq!(json["error_count"], 2);
}

/// The bulk endpoint takes signed tokens only; an opaque API key is not
/// accepted there.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_bulk_create_rejects_opaque_key(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "opaquebulk").await;
    let profile = ProfileRepo::get_or_create(&pool, user.id).await.unwrap();
    let app = build_test_app(pool);

    let items = serde_json::json!([{ "aircraft_id": "SP-TSA", "direction": "OUT" }]);
    let response = post_json(
        app,
        &format!("/api/acars/messages?session={}", profile.api_key),
        items,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Authentication required");
}

// ---------------------------------------------------------------------------
// Gated-endpoint failure uniformity
// ---------------------------------------------------------------------------

/// Missing session and well-formed-but-unresolvable session fail with the
/// same shape on every gated endpoint.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_gated_endpoints_reject_uniformly(pool: PgPool) {
    let app = build_test_app(pool);

    // Structurally plausible but unresolvable values per family.
    let bogus_jwt = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOjF9.invalid";
    let bogus_key = "A".repeat(48);

    let paths = [
        format!("/api/smartcars/user?session={bogus_jwt}"),
        format!("/api/phpvms/user?session={bogus_key}"),
        format!("/api/smartcars/aircraft?session={bogus_jwt}"),
        format!("/api/phpvms/schedules?session={bogus_key}"),
    ];

    let missing = get(app.clone(), "/api/smartcars/user").await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    let expected = body_bytes(missing).await;

    for path in paths {
        let response = get(app.clone(), &path).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{path}");
        assert_eq!(body_bytes(response).await, expected, "{path}");
    }
}

/// An expired signed token is rejected exactly like a malformed one.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_expired_token_is_rejected_uniformly(pool: PgPool) {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use topsky_api::auth::jwt::Claims;

    let (user, _) = create_test_user(&pool, "expiredpilot").await;
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user.id,
        user_id: user.id,
        exp: now - 300,
        iat: now - 600,
        jti: "test".to_string(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(common::TEST_SESSION_SECRET.as_bytes()),
    )
    .unwrap();

    let app = build_test_app(pool);
    let response = get(app, &format!("/api/smartcars/user?session={token}")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Authentication required");
}

/// A valid token whose user has since been deactivated resolves to the
/// same uniform rejection.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_dangling_user_token_is_rejected(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "gonepilot").await;
    let session = signed_session(user.id);
    topsky_db::repositories::UserRepo::deactivate(&pool, user.id)
        .await
        .unwrap();

    let app = build_test_app(pool);
    let response = get(app, &format!("/api/smartcars/user?session={session}")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Authentication required");
}
