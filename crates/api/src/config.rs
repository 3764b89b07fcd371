use std::path::PathBuf;

use crate::auth::jwt::SessionConfig;

/// Airline identity fields echoed in user-info responses.
#[derive(Debug, Clone)]
pub struct AirlineConfig {
    /// ISO country code (default: `PL`).
    pub country: String,
    /// IANA timezone name (default: `Europe/Warsaw`).
    pub timezone: String,
    /// ICAO code of the airline's home airport (default: `EPWA`).
    pub home_airport: String,
}

impl AirlineConfig {
    pub fn from_env() -> Self {
        Self {
            country: std::env::var("AIRLINE_COUNTRY").unwrap_or_else(|_| "PL".into()),
            timezone: std::env::var("AIRLINE_TIMEZONE").unwrap_or_else(|_| "Europe/Warsaw".into()),
            home_airport: std::env::var("AIRLINE_HOME_AIRPORT").unwrap_or_else(|_| "EPWA".into()),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the session secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Signed-session token configuration (secret, TTL).
    pub session: SessionConfig,
    /// Airline identity for user-info responses.
    pub airline: AirlineConfig,
    /// Optional JSON file overriding the built-in reference dataset.
    pub reference_data_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default           |
    /// |------------------------|-------------------|
    /// | `HOST`                 | `0.0.0.0`         |
    /// | `PORT`                 | `8000`            |
    /// | `REQUEST_TIMEOUT_SECS` | `30`              |
    /// | `SESSION_SECRET`       | **required**      |
    /// | `SESSION_TTL_DAYS`     | `7`               |
    /// | `AIRLINE_COUNTRY`      | `PL`              |
    /// | `AIRLINE_TIMEZONE`     | `Europe/Warsaw`   |
    /// | `AIRLINE_HOME_AIRPORT` | `EPWA`            |
    /// | `REFERENCE_DATA_PATH`  | built-in dataset  |
    ///
    /// # Panics
    ///
    /// Panics if `SESSION_SECRET` is missing -- misconfiguration should
    /// fail at startup, not at the first login.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let reference_data_path = std::env::var("REFERENCE_DATA_PATH").ok().map(PathBuf::from);

        Self {
            host,
            port,
            request_timeout_secs,
            session: SessionConfig::from_env(),
            airline: AirlineConfig::from_env(),
            reference_data_path,
        }
    }
}
