//! Credential-field extraction.
//!
//! The ACARS clients this backend serves disagree about field names: the
//! same login request may carry its identifier as `email`, `username`,
//! `pilot_id`, or a Basic-Auth user part, and its secret as `password`,
//! `api_key`, `token`, and so on. Instead of ad hoc fallback chains in
//! every handler, a single extraction function consults one ordered alias
//! list and produces a typed result.

use serde_json::{Map, Value};

/// Identifier field names, in priority order. First non-empty wins.
pub const IDENTIFIER_ALIASES: &[&str] = &["email", "username", "pilot_id", "user_id", "user", "login"];

/// Secret field names, in priority order. First non-empty wins.
pub const SECRET_ALIASES: &[&str] = &["api_key", "password", "key", "token", "pass", "pwd", "secret"];

/// A resolved identifier/secret pair extracted from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: String,
    pub secret: String,
}

/// Extract credentials from the request body, query string, and an
/// optional decoded Basic-Auth pair.
///
/// For each alias (in [`IDENTIFIER_ALIASES`] / [`SECRET_ALIASES`] order)
/// the body is consulted before the query string; the Basic-Auth pair is
/// the final fallback for whichever half is still missing. Returns `None`
/// unless both halves are present and non-empty.
pub fn extract_credentials(
    body: &Map<String, Value>,
    query: &Map<String, Value>,
    basic_auth: Option<(&str, &str)>,
) -> Option<Credentials> {
    let identifier = first_match(IDENTIFIER_ALIASES, body, query)
        .or_else(|| basic_auth.map(|(user, _)| user.to_string()).filter(|s| !s.is_empty()));
    let secret = first_match(SECRET_ALIASES, body, query)
        .or_else(|| basic_auth.map(|(_, pass)| pass.to_string()).filter(|s| !s.is_empty()));

    match (identifier, secret) {
        (Some(identifier), Some(secret)) => Some(Credentials { identifier, secret }),
        _ => None,
    }
}

/// Return the first non-empty value for any alias, body before query.
fn first_match(aliases: &[&str], body: &Map<String, Value>, query: &Map<String, Value>) -> Option<String> {
    for alias in aliases {
        for source in [body, query] {
            if let Some(value) = source.get(*alias).and_then(as_text) {
                return Some(value);
            }
        }
    }
    None
}

/// Coerce a JSON value to a non-empty string. Numbers are accepted because
/// form-decoded bodies and hand-written clients send `pilot_id: 7`.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
