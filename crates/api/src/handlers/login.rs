//! Login handlers for all three endpoint families.
//!
//! One flow -- extract credentials, resolve, issue -- behind three
//! response adapters. Failures are uniform (`Invalid credentials`, 401)
//! regardless of cause, and every attempt lands in the request ring log.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use topsky_core::fields::extract_credentials;
use topsky_core::pilot::pilot_ident;
use topsky_core::ringlog::RequestRecord;
use topsky_core::tokens::fingerprint;
use topsky_db::models::user::User;

use crate::auth::resolver::resolve;
use crate::auth::session::{issue, issue_opaque, IssuedSession, SessionFamily};
use crate::error::{AppError, AppResult};
use crate::extract::{basic_credentials, query_map, BodyFields};
use crate::response::BridgeEnvelope;
use crate::state::AppState;

/// Flat login response shared by the smartcars and phpvms families.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "pilotID")]
    pub pilot_id: String,
    pub session: String,
    pub expiry: i64,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
}

impl LoginResponse {
    fn new(user: &User, issued: IssuedSession) -> Self {
        Self {
            pilot_id: pilot_ident(user.id),
            session: issued.session,
            expiry: issued.expiry,
            first_name: user.display_first_name(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Nested payload of the legacy bridge login envelope.
#[derive(Debug, Serialize)]
pub struct BridgeLoginData {
    pub pilot_id: String,
    pub api_key: String,
    pub acars_token: String,
    pub expiry: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// POST /api/smartcars/login -- signed-token variant.
pub async fn smartcars_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    BodyFields(body): BodyFields,
) -> AppResult<Json<LoginResponse>> {
    let user = login_flow(&state, "smartcars", &headers, &params, &body).await?;
    let issued = issue(&state, user.id, SessionFamily::Signed).await?;
    Ok(Json(LoginResponse::new(&user, issued)))
}

/// POST /api/phpvms/login -- opaque-key variant.
pub async fn phpvms_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    BodyFields(body): BodyFields,
) -> AppResult<Json<LoginResponse>> {
    let user = login_flow(&state, "phpvms", &headers, &params, &body).await?;
    let issued = issue(&state, user.id, SessionFamily::Opaque).await?;
    Ok(Json(LoginResponse::new(&user, issued)))
}

/// POST /api/acars/login -- opaque-key variant, nested-data envelope.
pub async fn bridge_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    BodyFields(body): BodyFields,
) -> AppResult<Json<BridgeEnvelope<BridgeLoginData>>> {
    let user = login_flow(&state, "acars", &headers, &params, &body).await?;
    let (profile, expiry) = issue_opaque(&state, user.id).await?;
    Ok(Json(BridgeEnvelope::success(BridgeLoginData {
        pilot_id: pilot_ident(user.id),
        api_key: profile.api_key,
        acars_token: profile.acars_token,
        expiry,
        first_name: user.display_first_name(),
        last_name: user.last_name,
        email: user.email,
    })))
}

/// Shared login flow: extract credentials, resolve, record the attempt.
async fn login_flow(
    state: &AppState,
    family: &'static str,
    headers: &HeaderMap,
    params: &HashMap<String, String>,
    body: &Map<String, Value>,
) -> AppResult<User> {
    let query = query_map(params);
    let basic = basic_credentials(headers);
    let credentials = extract_credentials(
        body,
        &query,
        basic.as_ref().map(|(u, p)| (u.as_str(), p.as_str())),
    );

    let Some(credentials) = credentials else {
        record_attempt(state, family, None, None, false);
        return Err(AppError::InvalidCredentials);
    };

    match resolve(&state.pool, &credentials).await {
        Ok((user, _via)) => {
            record_attempt(
                state,
                family,
                Some(credentials.identifier.clone()),
                Some(&credentials.secret),
                true,
            );
            Ok(user)
        }
        Err(e) => {
            record_attempt(
                state,
                family,
                Some(credentials.identifier.clone()),
                Some(&credentials.secret),
                false,
            );
            Err(e)
        }
    }
}

fn record_attempt(
    state: &AppState,
    family: &'static str,
    identifier: Option<String>,
    secret: Option<&str>,
    succeeded: bool,
) {
    state.record_request(RequestRecord {
        family,
        path: format!("/api/{family}/login"),
        identifier,
        secret_fingerprint: secret.map(fingerprint),
        succeeded,
        at: Utc::now(),
    });
}
