//! HTTP handlers, shared across the endpoint families.
//!
//! Each family router (`routes::{smartcars,phpvms,bridge}`) mounts thin
//! per-family wrappers that delegate to the common logic here with the
//! right [`SessionFamily`].

pub mod acars;
pub mod data;
pub mod handler_info;
pub mod login;
pub mod pilot;

use axum::http::HeaderMap;
use serde_json::{Map, Value};
use topsky_db::models::user::User;

use crate::auth::session::{resolve_session, SessionFamily};
use crate::error::{AppError, AppResult};
use crate::extract::session_value;
use crate::state::AppState;

/// Resolve the session presented with a request, or fail with the uniform
/// gated-endpoint error.
pub(crate) async fn gate(
    state: &AppState,
    family: SessionFamily,
    headers: &HeaderMap,
    query: &Map<String, Value>,
    body: Option<&Map<String, Value>>,
) -> AppResult<User> {
    let raw = session_value(headers, query, body).ok_or(AppError::AuthRequired)?;
    resolve_session(state, family, &raw).await
}
