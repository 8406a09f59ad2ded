//! HTTP server for the JSON-RPC, health and metrics endpoints

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::info;

use crate::api::UtilsApi;
use crate::metrics::Metrics;
use crate::rpc;

pub type SharedApi = Arc<UtilsApi>;
pub type SharedMetrics = Arc<Metrics>;

/// Combined app state
#[derive(Clone)]
pub struct AppState {
    pub api: SharedApi,
    pub metrics: SharedMetrics,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub prefix: String,
    pub requests_total: u64,
}

/// JSON-RPC endpoint; the body is parsed by hand so any content type works
async fn json_rpc(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    Json(rpc::handle_body(state.api.as_ref(), &state.metrics, &body))
}

/// Health check endpoint handler
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        prefix: state.api.prefix().to_string(),
        requests_total: state.metrics.rpc_requests_total.get(),
    })
}

/// Liveness probe (always returns OK if server is running)
async fn liveness() -> &'static str {
    "OK"
}

/// Prometheus metrics endpoint
async fn prometheus_metrics(State(state): State<AppState>) -> Response {
    let encoder = TextEncoder::new();
    let metric_families = state.metrics.registry.gather();
    let mut buffer = Vec::new();

    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to encode metrics",
        )
            .into_response();
    }

    ([(header::CONTENT_TYPE, encoder.format_type().to_string())], buffer).into_response()
}

/// All routes, ready to be served
pub fn router(api: SharedApi, metrics: SharedMetrics) -> Router {
    let state = AppState { api, metrics };

    Router::new()
        .route("/", post(json_rpc))
        .route("/health", get(health_check))
        .route("/healthz", get(liveness))
        .route("/metrics", get(prometheus_metrics))
        .with_state(state)
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    api: SharedApi,
    metrics: SharedMetrics,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> eyre::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, prefix = %api.prefix(), "JSON-RPC server listening");
    info!("  POST /    - JSON-RPC (utils_convertAddress)");
    info!("  /health   - Health status (JSON)");
    info!("  /metrics  - Prometheus metrics");

    axum::serve(listener, router(api, metrics))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("JSON-RPC server stopped");
    Ok(())
}

/// Bind `addr` and serve until `shutdown` resolves
pub async fn start_server(
    addr: SocketAddr,
    api: SharedApi,
    metrics: SharedMetrics,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> eyre::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| eyre::eyre!("Failed to bind {}: {}", addr, e))?;

    serve(listener, api, metrics, shutdown).await
}
