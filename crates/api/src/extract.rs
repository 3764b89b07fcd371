//! Request extraction helpers shared by every endpoint family.
//!
//! The smartCARS clients send credentials and telemetry as JSON or
//! form-urlencoded bodies interchangeably, with numbers frequently quoted
//! as strings. Everything that papers over that lives here: the
//! [`BodyFields`] extractor, header parsing, and the lenient numeric
//! deserializers used by ingest DTOs.

use axum::extract::{Form, FromRequest, Json, Request};
use axum::http::header;
use axum::http::HeaderMap;
use base64::Engine;
use serde_json::{Map, Value};

use crate::error::AppError;

/// Request body decoded to a flat field map, accepting both
/// `application/json` objects and `application/x-www-form-urlencoded`
/// bodies. An absent body yields an empty map.
#[derive(Debug, Default)]
pub struct BodyFields(pub Map<String, Value>);

impl<S> FromRequest<S> for BodyFields
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|_| AppError::BadRequest("Invalid JSON body".into()))?;
            return match value {
                Value::Object(map) => Ok(Self(map)),
                Value::Null => Ok(Self(Map::new())),
                _ => Err(AppError::BadRequest("Expected a JSON object".into())),
            };
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|_| AppError::BadRequest("Invalid form body".into()))?;
            let map = pairs
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            return Ok(Self(map));
        }

        // No declared content type: tolerate an empty body, or a client
        // that forgot the header on a JSON payload.
        let bytes = axum::body::to_bytes(req.into_body(), usize::MAX)
            .await
            .map_err(|_| AppError::BadRequest("Failed to read request body".into()))?;
        if bytes.is_empty() {
            return Ok(Self(Map::new()));
        }
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            _ => Err(AppError::BadRequest("Unsupported request body".into())),
        }
    }
}

/// Convert query parameters to the same map shape as [`BodyFields`].
pub fn query_map(params: &std::collections::HashMap<String, String>) -> Map<String, Value> {
    params
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}

/// Decode an `Authorization: Basic` header into its user/password pair.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = raw.strip_prefix("Basic ")?;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

/// Extract an `Authorization: Bearer` token.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

/// Locate the session value presented with a request: the body `session`
/// field wins, then the `session` query parameter, then a bearer header.
pub fn session_value(
    headers: &HeaderMap,
    query: &Map<String, Value>,
    body: Option<&Map<String, Value>>,
) -> Option<String> {
    let from_map = |map: &Map<String, Value>| {
        map.get("session")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    body.and_then(from_map)
        .or_else(|| from_map(query))
        .or_else(|| bearer_token(headers))
}

/// Deserializers that accept JSON numbers or their string spellings, as
/// sent by form-encoded clients. Empty strings decode to `None`.
pub mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(serde::de::Error::custom(format!(
                "expected a number or string, got {other}"
            ))),
        }
    }

    pub fn f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match text_or_number(deserializer)? {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid number: {raw}"))),
        }
    }

    pub fn i32_opt<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match text_or_number(deserializer)? {
            None => Ok(None),
            // Clients report altitude as "35000.0"; truncate, do not reject.
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .map(|f| Some(f as i32))
                .map_err(|_| serde::de::Error::custom(format!("invalid integer: {raw}"))),
        }
    }
}
