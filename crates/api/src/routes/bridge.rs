//! Route definitions for the legacy ACARS bridge family (`/api/acars`).
//!
//! Login issues the opaque key inside a nested-data envelope; the bulk
//! message endpoint accepts signed tokens only.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{acars, handler_info, login};
use crate::state::AppState;

/// Register a handler under both `path` and `path/`.
fn twin(router: Router<AppState>, path: &str, route: axum::routing::MethodRouter<AppState>) -> Router<AppState> {
    router
        .route(path, route.clone())
        .route(&format!("{path}/"), route)
}

/// Routes mounted at `/api/acars`.
///
/// ```text
/// GET  /                -> handler info (public, legacy envelope)
/// POST /login           -> login (public, nested-data response)
/// GET  /messages        -> the user's recent flight events
/// POST /messages        -> bulk message create (signed token only)
/// GET  /debug/requests  -> bounded auth-attempt log
/// ```
pub fn router() -> Router<AppState> {
    let mut router = Router::new().route("/", get(handler_info::bridge_handler_info));
    router = twin(router, "/login", post(login::bridge_login));
    router = twin(
        router,
        "/messages",
        get(acars::bridge_list_messages).post(acars::bridge_messages),
    );
    router = twin(router, "/debug/requests", get(acars::debug_requests));
    router
}
