use std::sync::{Arc, Mutex};

use topsky_core::reference::ReferenceData;
use topsky_core::ringlog::{RequestRecord, RingLog};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: topsky_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Fleet/airport/schedule reference dataset.
    pub reference: Arc<ReferenceData>,
    /// Bounded log of recent authentication attempts.
    pub request_log: Arc<Mutex<RingLog<RequestRecord>>>,
}

impl AppState {
    /// Append a record to the request log. A poisoned lock is ignored --
    /// losing a debug record must never fail a request.
    pub fn record_request(&self, record: RequestRecord) {
        if let Ok(mut log) = self.request_log.lock() {
            log.push(record);
        }
    }

    /// Snapshot of the request log, oldest first.
    pub fn request_log_snapshot(&self) -> Vec<RequestRecord> {
        self.request_log
            .lock()
            .map(|log| log.snapshot())
            .unwrap_or_default()
    }
}
