/**
 * Health Routes
 * Endpoints for checking backend health status
 */
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;

use crate::media::MediaStore as _;
use crate::state::AppState;
use crate::store::ProjectStore as _;

// Track server start time for uptime calculation
lazy_static::lazy_static! {
    static ref SERVER_START: Instant = Instant::now();
}

/// Initialize the server start time
pub fn init_start_time() {
    lazy_static::initialize(&SERVER_START);
}

/// Single service check result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCheck {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health checks for the backend's dependencies
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub storage: ServiceCheck,
    pub media: ServiceCheck,
}

/// Detailed health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedHealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub uptime: u64,
    pub checks: HealthChecks,
}

/// Simple health response
#[derive(Debug, Serialize)]
pub struct SimpleHealthResponse {
    pub status: String,
}

/// GET /health - Simple health ping
pub async fn health_ping() -> Json<SimpleHealthResponse> {
    Json(SimpleHealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /health/detailed - Uptime plus per-dependency checks
pub async fn health_detailed(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    let uptime = SERVER_START.elapsed().as_secs();

    let start = Instant::now();
    let storage = match state.projects.ping().await {
        Ok(()) => ServiceCheck {
            status: "healthy".to_string(),
            response_time: Some(start.elapsed().as_millis() as u64),
            error: None,
        },
        Err(e) => ServiceCheck {
            status: "unhealthy".to_string(),
            response_time: None,
            error: Some(e.to_string()),
        },
    };

    let media = match state.media.probe().await {
        Ok(()) => ServiceCheck {
            status: "healthy".to_string(),
            response_time: None,
            error: None,
        },
        Err(e) => ServiceCheck {
            status: "unhealthy".to_string(),
            response_time: None,
            error: Some(e.to_string()),
        },
    };

    // Overall status stays "ok" even if a dependency is degraded, so the
    // frontend can still tell the backend itself is up.
    Json(DetailedHealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        uptime,
        checks: HealthChecks { storage, media },
    })
}
