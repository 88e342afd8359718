//! HTTP surface over [`ScanCoordinator`].
//!
//! | Route             | Method | Body / Query        |
//! |-------------------|--------|---------------------|
//! | `/api/scan`       | GET    | `?subnet=<range>`   |
//! | `/api/ping`       | POST   | `{"ip": "<ipv4>"}`  |
//! | `/api/health`     | GET    | none                |

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use lanmap_common::error::ProbeError;
use lanmap_common::network::device::Device;
use lanmap_core::scanner::ScanCoordinator;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const SCAN_HINT: &str =
    "check that the range looks like 192.168.1.1-254 and that the server has sufficient privileges";

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<ScanCoordinator>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/scan", get(scan))
        .route("/api/ping", post(ping))
        .route("/api/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ScanParams {
    subnet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PingRequest {
    ip: Option<String>,
}

#[derive(Serialize)]
struct ScanResponse {
    success: bool,
    devices: Vec<Device>,
    logs: Vec<String>,
}

#[derive(Serialize)]
struct PingResponse {
    success: bool,
    alive: bool,
    time: Option<f64>,
}

#[derive(Serialize)]
struct Failure {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    logs: Option<Vec<String>>,
}

fn failure(status: StatusCode, message: String, logs: Option<Vec<String>>) -> Response {
    let body = Failure {
        success: false,
        message,
        logs,
    };
    (status, Json(body)).into_response()
}

async fn scan(State(state): State<AppState>, Query(params): Query<ScanParams>) -> Response {
    info!("Scan requested for {:?}", params.subnet);

    let result = state.coordinator.scan(params.subnet.as_deref()).await;
    let logs = result.log.lines();

    if result.success {
        let body = ScanResponse {
            success: true,
            devices: result.devices,
            logs,
        };
        return (StatusCode::OK, Json(body)).into_response();
    }

    let reason = result.error.unwrap_or_else(|| "unknown error".to_string());
    error!("Scan failed: {reason}");
    failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("could not scan the network ({reason}); {SCAN_HINT}"),
        Some(logs),
    )
}

async fn ping(State(state): State<AppState>, body: Bytes) -> Response {
    let ip = serde_json::from_slice::<PingRequest>(&body)
        .ok()
        .and_then(|req| req.ip)
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty());

    let Some(ip) = ip else {
        return failure(
            StatusCode::BAD_REQUEST,
            "request body must be JSON with a non-empty \"ip\" field".to_string(),
            None,
        );
    };

    match state.coordinator.ping_one(&ip).await {
        Ok(probe) => {
            let body = PingResponse {
                success: true,
                alive: probe.reachable,
                time: probe.latency_ms,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e @ ProbeError::InvalidAddress(_)) => {
            failure(StatusCode::BAD_REQUEST, e.to_string(), None)
        }
        Err(e) => {
            error!("Ping of {ip} failed: {e}");
            failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), None)
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
