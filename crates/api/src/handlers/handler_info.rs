//! Handler-info endpoints: static capability descriptors, no auth.

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::response::{API_VERSION, BRIDGE_API_VERSION};

/// GET/POST /api/smartcars and /api/phpvms
///
/// The descriptor the smartCARS 3 client probes before login.
pub async fn smartcars_handler_info() -> Json<Value> {
    Json(json!({
        "apiVersion": API_VERSION,
        "handler": {
            "name": "smartCARS 3 Topsky Handler",
            "version": API_VERSION,
            "author": "Topsky Virtual Airlines",
            "web": "https://dtopsky.topsky.app"
        },
        "phpvms": {
            "version": "7.0.0",
            "type": "Rust Port"
        },
        "auth": true,
        "time": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }))
}

/// GET /api/acars
///
/// Legacy bridge descriptor, `status`/`response`/`data` envelope.
pub async fn bridge_handler_info() -> Json<Value> {
    Json(json!({
        "apiVersion": BRIDGE_API_VERSION,
        "handlerName": "Topsky ACARS Handler",
        "handlerVersion": env!("CARGO_PKG_VERSION"),
        "handlerAuthor": "Topsky Virtual Airlines",
        "handlerWebsite": "https://dtopsky.topsky.app",
        "status": "success",
        "response": "Handler is active and ready",
        "data": {
            "platform": "Rust",
            "features": ["ACARS", "Position Reporting", "Flight Tracking"]
        }
    }))
}
