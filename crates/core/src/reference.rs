//! Airline reference data: fleet, airports, and schedules.
//!
//! smartCARS clients fetch these datasets after login. They change rarely
//! and are served from memory: either the built-in Topsky dataset or a
//! JSON file supplied at startup, so deployments can swap in their own
//! fleet without a rebuild.

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aircraft {
    pub id: i64,
    pub icao: String,
    pub iata: String,
    pub name: String,
    pub registration: String,
    pub hex_code: String,
    pub active: bool,
    pub subfleet_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airport {
    /// ICAO code doubles as the identifier, matching the phpVMS schema.
    pub id: String,
    pub icao: String,
    pub iata: String,
    pub name: String,
    pub location: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    pub hub: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: i64,
    pub airline_id: i64,
    pub flight_number: String,
    pub route_code: String,
    pub dpt_airport_id: String,
    pub arr_airport_id: String,
    pub aircraft_id: i64,
    pub distance: i64,
    pub flight_time: i64,
    pub route: String,
    pub notes: String,
    pub active: bool,
}

/// The full reference dataset served to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceData {
    pub aircraft: Vec<Aircraft>,
    pub airports: Vec<Airport>,
    pub schedules: Vec<Schedule>,
}

impl ReferenceData {
    /// Load a dataset from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, crate::error::CoreError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            crate::error::CoreError::Internal(format!(
                "Failed to read reference data {}: {e}",
                path.display()
            ))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            crate::error::CoreError::Internal(format!(
                "Failed to parse reference data {}: {e}",
                path.display()
            ))
        })
    }

    /// The built-in Topsky Virtual Airlines dataset.
    pub fn builtin() -> Self {
        Self {
            aircraft: vec![
                Aircraft {
                    id: 1,
                    icao: "B738".into(),
                    iata: "738".into(),
                    name: "Boeing 737-800".into(),
                    registration: "SP-TSA".into(),
                    hex_code: "48421F".into(),
                    active: true,
                    subfleet_id: 1,
                },
                Aircraft {
                    id: 2,
                    icao: "A320".into(),
                    iata: "320".into(),
                    name: "Airbus A320-200".into(),
                    registration: "SP-TSB".into(),
                    hex_code: "48422F".into(),
                    active: true,
                    subfleet_id: 2,
                },
            ],
            airports: vec![
                Airport {
                    id: "EPWA".into(),
                    icao: "EPWA".into(),
                    iata: "WAW".into(),
                    name: "Warsaw Chopin Airport".into(),
                    location: "Warsaw, Poland".into(),
                    country: "PL".into(),
                    lat: 52.16569,
                    lng: 20.96709,
                    hub: true,
                },
                Airport {
                    id: "EGLL".into(),
                    icao: "EGLL".into(),
                    iata: "LHR".into(),
                    name: "London Heathrow Airport".into(),
                    location: "London, United Kingdom".into(),
                    country: "GB".into(),
                    lat: 51.47002,
                    lng: -0.45426,
                    hub: false,
                },
                Airport {
                    id: "EDDF".into(),
                    icao: "EDDF".into(),
                    iata: "FRA".into(),
                    name: "Frankfurt am Main Airport".into(),
                    location: "Frankfurt, Germany".into(),
                    country: "DE".into(),
                    lat: 50.02644,
                    lng: 8.54316,
                    hub: false,
                },
            ],
            schedules: vec![
                Schedule {
                    id: 1,
                    airline_id: 1,
                    flight_number: "TS001".into(),
                    route_code: "EPWA-EGLL".into(),
                    dpt_airport_id: "EPWA".into(),
                    arr_airport_id: "EGLL".into(),
                    aircraft_id: 1,
                    distance: 1200,
                    flight_time: 120,
                    route: "EPWA DCT EGLL".into(),
                    notes: "Regular passenger service".into(),
                    active: true,
                },
                Schedule {
                    id: 2,
                    airline_id: 1,
                    flight_number: "TS002".into(),
                    route_code: "EGLL-EPWA".into(),
                    dpt_airport_id: "EGLL".into(),
                    arr_airport_id: "EPWA".into(),
                    aircraft_id: 2,
                    distance: 1200,
                    flight_time: 120,
                    route: "EGLL DCT EPWA".into(),
                    notes: "Return passenger service".into(),
                    active: true,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_dataset_is_consistent() {
        let data = ReferenceData::builtin();
        assert!(!data.aircraft.is_empty());
        assert!(!data.airports.is_empty());
        assert!(!data.schedules.is_empty());

        // Every schedule endpoint must exist in the airport list.
        for schedule in &data.schedules {
            assert!(data.airports.iter().any(|a| a.id == schedule.dpt_airport_id));
            assert!(data.airports.iter().any(|a| a.id == schedule.arr_airport_id));
        }
    }

    #[test]
    fn test_round_trips_through_json() {
        let data = ReferenceData::builtin();
        let raw = serde_json::to_string(&data).unwrap();
        let parsed: ReferenceData = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.aircraft.len(), data.aircraft.len());
        assert_eq!(parsed.airports[0].id, "EPWA");
    }
}
