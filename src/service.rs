// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Screen Service
 * HTTP-function entry: /scan plus health probes
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::artifacts::Baseline;
use crate::errors::ScreenError;
use crate::report::{self, ScreenResponse};
use crate::scan::ScreenEngine;

pub struct ServiceState {
    pub engine: ScreenEngine,
    start_time: Instant,
}

impl ServiceState {
    pub fn new(engine: ScreenEngine) -> Self {
        Self {
            engine,
            start_time: Instant::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScanQuery {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScanRequestBody {
    url: Option<String>,
    baseline: Option<Baseline>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: String,
    uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
struct LivenessResponse {
    alive: bool,
    timestamp: String,
}

pub fn create_router(state: Arc<ServiceState>) -> Router {
    Router::new()
        .route("/scan", get(scan_get).post(scan_post))
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .with_state(state)
}

async fn scan_get(
    State(state): State<Arc<ServiceState>>,
    Query(query): Query<ScanQuery>,
) -> impl IntoResponse {
    run_scan(state, query.url, None).await
}

/// Query string wins over the JSON body when both carry a URL; the baseline
/// only ever comes from the body.
async fn scan_post(
    State(state): State<Arc<ServiceState>>,
    Query(query): Query<ScanQuery>,
    body: Option<Json<ScanRequestBody>>,
) -> impl IntoResponse {
    let body = body.map(|Json(b)| b);
    let url = query
        .url
        .or_else(|| body.as_ref().and_then(|b| b.url.clone()));
    let baseline = body.and_then(|b| b.baseline);
    run_scan(state, url, baseline).await
}

async fn run_scan(
    state: Arc<ServiceState>,
    url: Option<String>,
    baseline: Option<Baseline>,
) -> (StatusCode, Json<ScreenResponse>) {
    let Some(url) = url else {
        debug!("[Service] Request without url");
        let doc = report::error_document(&ScreenError::InvalidUrl(
            "Missing url in query string or request body".to_string(),
        ));
        return (StatusCode::BAD_REQUEST, Json(ScreenResponse::Error(doc)));
    };

    let response = state.engine.scan(&url, baseline).await;
    let status =
        StatusCode::from_u16(response.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response))
}

async fn health_handler(State(state): State<Arc<ServiceState>>) -> impl IntoResponse {
    let health = HealthResponse {
        status: "HEALTHY",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    };
    (StatusCode::OK, Json(health))
}

async fn liveness_handler() -> impl IntoResponse {
    let liveness = LivenessResponse {
        alive: true,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };
    (StatusCode::OK, Json(liveness))
}
