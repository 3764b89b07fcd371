//! Route definitions for the official smartCARS 3 family
//! (`/api/smartcars`, signed-token sessions).

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

/// Routes mounted at `/api/smartcars`.
///
/// ```text
/// GET/POST /           -> handler info (public)
/// POST     /login      -> login (public)
/// GET      /user       -> pilot profile
/// GET      /schedules  -> schedule list
/// GET      /aircraft   -> fleet list
/// GET      /airports   -> airport list
/// POST     /bid        -> flight bid
/// POST     /position   -> position report ingest
/// POST     /pirep      -> flight report ingest
/// ```
pub fn router() -> Router<AppState> {
    let mut router = Router::new().route(
        "/",
        get(handler_info::smartcars_handler_info).post(handler_info::smartcars_handler_info),
    );
    router = twin(router, "/login", post(login::smartcars_login));
    router = twin(router, "/user", get(pilot::smartcars_user));
    router = twin(router, "/schedules", get(data::smartcars_schedules));
    router = twin(router, "/aircraft", get(data::smartcars_aircraft));
    router = twin(router, "/airports", get(data::smartcars_airports));
    router = twin(router, "/bid", post(data::smartcars_bid));
    router = twin(router, "/position", post(acars::smartcars_position));
    router = twin(router, "/pirep", post(acars::smartcars_pirep));
    router
}
