pub mod webhook;

use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub time: DateTime<Utc>,
}

/// Liveness only. Does not touch the store, so it answers even while the database is down.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        time: Utc::now(),
    })
}
