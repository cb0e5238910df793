//! HTTP boundary for the prediction service
//!
//! Owns the only error→status translation in the system: the core reports
//! its taxonomy, this layer decides what callers see. Server-side failures
//! are logged in full and returned as opaque generic errors.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use storecast_core::{ForecastError, ModelSnapshot, PredictionService, StoreDayRecord};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    pub start_time: Instant,
    pub req_count: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(service: Arc<PredictionService>) -> Self {
        Self {
            service,
            start_time: Instant::now(),
            req_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn record_request(&self) -> u64 {
        self.req_count.fetch_add(1, Ordering::Relaxed) as u64 + 1
    }

    fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

type SharedState = Arc<AppState>;

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub inputs: Vec<StoreDayRecord>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predictions: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    timestamp: u64,
    version: &'static str,
    model: ModelSnapshot,
    req_total: u64,
}

#[derive(Debug, Serialize)]
struct ReloadResponse {
    status: &'static str,
    model: ModelSnapshot,
}

#[derive(Debug, Serialize)]
struct VersionResponse {
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request<S: Into<String>>(message: S) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal<S: Into<String>>(message: S) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        match err {
            // Client mistakes carry their reason back.
            ForecastError::MalformedRecord(_) => ApiError::bad_request(err.to_string()),
            ForecastError::Reload(_) => {
                error!("model reload failed: {err}");
                ApiError::internal("reload failed")
            }
            // Schema skew, inference and I/O detail stays in the logs.
            _ => {
                error!("prediction failed: {err}");
                ApiError::internal("prediction failed")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, payload).into_response()
    }
}

pub async fn start_server(state: AppState, addr: &str) -> Result<()> {
    let shared = Arc::new(state);
    let app = build_router(shared);
    let listener = bind_listener(addr).await?;
    info!("prediction API listening on {addr}");
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated unexpectedly")
}

async fn bind_listener(addr: &str) -> Result<tokio::net::TcpListener> {
    if let Ok(socket_addr) = addr.parse::<SocketAddr>() {
        tokio::net::TcpListener::bind(socket_addr)
            .await
            .with_context(|| format!("failed to bind listener on {socket_addr}"))
    } else {
        tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind listener on {addr}"))
    }
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/predict", post(handle_predict))
        .route("/health", get(handle_health))
        .route("/reload", post(handle_reload))
        .route("/metrics", get(handle_metrics))
        .route("/version", get(handle_version))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_predict(
    State(state): State<SharedState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    state.record_request();
    let predictions = state.service.predict(&request.inputs)?;
    Ok(Json(PredictResponse { predictions }))
}

async fn handle_health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let req_total = state.record_request();
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.uptime_seconds(),
        timestamp: unix_now(),
        version: env!("CARGO_PKG_VERSION"),
        model: state.service.model_snapshot(),
        req_total,
    })
}

async fn handle_reload(
    State(state): State<SharedState>,
) -> Result<Json<ReloadResponse>, ApiError> {
    state.record_request();
    let model = state.service.reload_model()?;
    Ok(Json(ReloadResponse {
        status: "reloaded",
        model,
    }))
}

async fn handle_metrics(State(state): State<SharedState>) -> Response {
    let req_total = state.record_request();
    let uptime = state.uptime_seconds();
    let model = state.service.model_snapshot();

    let mut metrics =
        "# HELP storecast_http_requests_total Total number of API requests handled\n".to_string();
    metrics.push_str("# TYPE storecast_http_requests_total counter\n");
    metrics.push_str(&format!("storecast_http_requests_total {req_total}\n"));
    metrics.push_str("# HELP storecast_uptime_seconds Uptime of the service in seconds\n");
    metrics.push_str("# TYPE storecast_uptime_seconds gauge\n");
    metrics.push_str(&format!("storecast_uptime_seconds {uptime}\n"));
    metrics.push_str("# HELP storecast_model_trees Trees in the currently served model\n");
    metrics.push_str("# TYPE storecast_model_trees gauge\n");
    metrics.push_str(&format!("storecast_model_trees {}\n", model.tree_count));
    metrics.push_str("# HELP storecast_model_loaded_at Unix time the served model was loaded\n");
    metrics.push_str("# TYPE storecast_model_loaded_at gauge\n");
    metrics.push_str(&format!("storecast_model_loaded_at {}\n", model.loaded_at));

    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics,
    )
        .into_response()
}

async fn handle_version(State(state): State<SharedState>) -> Json<VersionResponse> {
    state.record_request();
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
