//! Route definitions for the phpVMS-compatible family
//! (`/api/phpvms`, opaque API-key sessions).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{acars, data, handler_info, login, pilot};
use crate::state::AppState;

/// Register a handler under both `path` and `path/`.
fn twin(router: Router<AppState>, path: &str, route: axum::routing::MethodRouter<AppState>) -> Router<AppState> {
    router
        .route(path, route.clone())
        .route(&format!("{path}/"), route)
}

/// Routes mounted at `/api/phpvms`. Same surface as the smartcars family,
/// authenticated with the service-profile API key instead of a JWT.
pub fn router() -> Router<AppState> {
    let mut router = Router::new().route(
        "/",
        get(handler_info::smartcars_handler_info).post(handler_info::smartcars_handler_info),
    );
    router = twin(router, "/login", post(login::phpvms_login));
    router = twin(router, "/user", get(pilot::phpvms_user));
    router = twin(router, "/schedules", get(data::phpvms_schedules));
    router = twin(router, "/aircraft", get(data::phpvms_aircraft));
    router = twin(router, "/airports", get(data::phpvms_airports));
    router = twin(router, "/bid", post(data::phpvms_bid));
    router = twin(router, "/position", post(acars::phpvms_position));
    router = twin(router, "/pirep", post(acars::phpvms_pirep));
    router
}
