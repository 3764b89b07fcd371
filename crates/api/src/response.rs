//! Shared response envelope types.
//!
//! The flat `{"message": ...}` shape and the legacy bridge
//! `{"status", "response", "data"}` envelope both live here so handlers
//! never build them ad hoc.

use serde::Serialize;

/// Protocol version advertised by the handler-info endpoints, pinned to
/// what the smartCARS 3 client expects.
pub const API_VERSION: &str = "1.0.2";

/// Protocol version of the legacy bridge envelope.
pub const BRIDGE_API_VERSION: &str = "1.0.0";

/// Legacy bridge success envelope: `{"status": "success", "data": ...}`.
#[derive(Debug, Serialize)]
pub struct BridgeEnvelope<T: Serialize> {
    pub status: &'static str,
    pub data: T,
}

impl<T: Serialize> BridgeEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}
