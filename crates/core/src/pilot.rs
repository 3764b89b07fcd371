//! Pilot identifier derivation.

use crate::types::DbId;

/// Airline prefix prepended to every pilot identifier.
pub const PILOT_PREFIX: &str = "LO";

/// Derive the display pilot identifier for a user id: the airline prefix
/// followed by the id zero-padded to four digits (`7` -> `LO0007`).
///
/// Purely cosmetic -- never used as a lookup key. Ids above 9999 simply
/// grow wider (`LO12345`).
pub fn pilot_ident(user_id: DbId) -> String {
    format!("{PILOT_PREFIX}{user_id:04}")
}
