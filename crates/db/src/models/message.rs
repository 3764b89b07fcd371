//! ACARS flight-event model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use topsky_core::types::{DbId, Timestamp};

/// Direction of a flight-event message relative to this system.
///
/// Stored as text; legacy clients send `IN`/`OUT`, which deserialize to
/// the same variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageDirection {
    Incoming,
    Outgoing,
}

// The `direction` column is a plain `VARCHAR` (see the migration), not a
// PostgreSQL enum type, so map this enum to/from text rather than letting
// the `sqlx::Type` derive expect a named PG enum.
impl sqlx::Type<sqlx::Postgres> for MessageDirection {
    fn type_info() -> <sqlx::Postgres as sqlx::Database>::TypeInfo {
        <str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &<sqlx::Postgres as sqlx::Database>::TypeInfo) -> bool {
        <str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for MessageDirection {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode(self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for MessageDirection {
    fn decode(
        value: <sqlx::Postgres as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        raw.parse().map_err(|e: String| e.into())
    }
}

impl MessageDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incoming => "INCOMING",
            Self::Outgoing => "OUTGOING",
        }
    }
}

impl std::str::FromStr for MessageDirection {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_uppercase().as_str() {
            "INCOMING" | "IN" => Ok(Self::Incoming),
            "OUTGOING" | "OUT" => Ok(Self::Outgoing),
            other => Err(format!("Unknown direction: {other}")),
        }
    }
}

impl<'de> Deserialize<'de> for MessageDirection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Classification of the message body.
pub mod message_types {
    pub const ACARS: &str = "ACARS";
    pub const POSITION: &str = "POSITION";
    pub const PIREP: &str = "PIREP";
}

/// Full row from the `acars_messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AcarsMessage {
    pub id: DbId,
    pub user_id: DbId,
    pub message_type: String,
    pub aircraft_ident: String,
    pub flight_number: String,
    pub route: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<i32>,
    pub speed: Option<i32>,
    pub heading: Option<i32>,
    pub time_off: Option<Timestamp>,
    pub time_on: Option<Timestamp>,
    pub flight_time_minutes: Option<i32>,
    pub distance_nm: Option<f64>,
    pub fuel_used: Option<f64>,
    pub fuel_flow: Option<f64>,
    pub engine_n1: Option<f64>,
    pub engine_epr: Option<f64>,
    pub landing_rate: Option<i32>,
    pub pax_count: Option<i32>,
    pub direction: MessageDirection,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for inserting a flight event. `payload` must always carry the full
/// original client message.
#[derive(Debug, Clone)]
pub struct CreateAcarsMessage {
    pub user_id: DbId,
    pub message_type: &'static str,
    pub aircraft_ident: String,
    pub flight_number: String,
    pub route: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<i32>,
    pub speed: Option<i32>,
    pub heading: Option<i32>,
    pub time_off: Option<Timestamp>,
    pub time_on: Option<Timestamp>,
    pub flight_time_minutes: Option<i32>,
    pub distance_nm: Option<f64>,
    pub fuel_used: Option<f64>,
    pub fuel_flow: Option<f64>,
    pub engine_n1: Option<f64>,
    pub engine_epr: Option<f64>,
    pub landing_rate: Option<i32>,
    pub pax_count: Option<i32>,
    pub direction: MessageDirection,
    pub payload: serde_json::Value,
}

impl CreateAcarsMessage {
    /// A minimal record: everything optional left empty. Handlers fill in
    /// the typed fields they parsed.
    pub fn bare(user_id: DbId, direction: MessageDirection, payload: serde_json::Value) -> Self {
        Self {
            user_id,
            message_type: message_types::ACARS,
            aircraft_ident: String::new(),
            flight_number: String::new(),
            route: String::new(),
            departure_airport: String::new(),
            arrival_airport: String::new(),
            latitude: None,
            longitude: None,
            altitude: None,
            speed: None,
            heading: None,
            time_off: None,
            time_on: None,
            flight_time_minutes: None,
            distance_nm: None,
            fuel_used: None,
            fuel_flow: None,
            engine_n1: None,
            engine_epr: None,
            landing_rate: None,
            pax_count: None,
            direction,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parses_legacy_spellings() {
        assert_eq!("IN".parse::<MessageDirection>().unwrap(), MessageDirection::Incoming);
        assert_eq!("out".parse::<MessageDirection>().unwrap(), MessageDirection::Outgoing);
        assert_eq!("INCOMING".parse::<MessageDirection>().unwrap(), MessageDirection::Incoming);
        assert!("SIDEWAYS".parse::<MessageDirection>().is_err());
    }

    #[test]
    fn test_direction_serializes_canonically() {
        let json = serde_json::to_string(&MessageDirection::Outgoing).unwrap();
        assert_eq!(json, "\"OUTGOING\"");
    }
}
