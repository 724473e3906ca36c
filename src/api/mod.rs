//! HTTP front-end (axum).
//!
//! Every solving endpoint runs its CPU-bound work on the blocking pool so the
//! async workers stay responsive.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::dataset::DatasetReport;
use crate::engine::{Engine, StatisticsSnapshot};
use crate::error::{TspError, TspResult};
use crate::wire::{
    self, CompareAllResponse, CompareRequest, DatasetRequest, ErrorResponse, PairCompareResponse,
    SolveRequest, SolveResponse,
};

const ENDPOINTS: [&str; 7] = [
    "/api/solve",
    "/api/compare",
    "/api/compare-all",
    "/api/statistics",
    "/api/dataset/evaluate",
    "/health",
    "/",
];

/// Handler state.
pub type AppState = Arc<Engine>;

/// Failed request: status plus JSON body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorResponse {
                error: message.into(),
                kind: "internal".to_string(),
            },
        }
    }
}

/// HTTP status for an engine error.
#[must_use]
pub fn status_for(error: &TspError) -> StatusCode {
    match error {
        TspError::Validation(_) | TspError::UnknownAlgorithm(_) => StatusCode::BAD_REQUEST,
        TspError::ResourceLimitExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        TspError::TimeoutExceeded { .. } => StatusCode::REQUEST_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<TspError> for ApiError {
    fn from(error: TspError) -> Self {
        Self {
            status: status_for(&error),
            body: ErrorResponse::from(&error),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Build the application router.
pub fn build_router(engine: Engine) -> Router {
    let state: AppState = Arc::new(engine);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/solve", post(solve))
        .route("/api/compare", post(compare))
        .route("/api/compare-all", post(compare_all))
        .route("/api/statistics", get(statistics))
        .route("/api/dataset/evaluate", post(evaluate_dataset))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl+C.
///
/// # Errors
///
/// `Io` if the address cannot be bound or the server fails.
pub async fn serve(engine: Engine, addr: &str) -> TspResult<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, build_router(engine))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; shut down by terminating the process");
        std::future::pending::<()>().await;
    }
}

async fn run_blocking<T, F>(state: AppState, work: F) -> Result<Json<T>, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Engine) -> TspResult<T> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || work(&state))
        .await
        .map_err(|e| ApiError::internal(format!("solver task failed: {e}")))?;
    Ok(Json(result?))
}

async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "Quantum TSP Solver API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ENDPOINTS,
    }))
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn solve(
    State(state): State<AppState>,
    Json(request): Json<SolveRequest>,
) -> Result<Json<SolveResponse>, ApiError> {
    run_blocking(state, move |engine| wire::solve(engine, &request)).await
}

async fn compare(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<PairCompareResponse>, ApiError> {
    run_blocking(state, move |engine| wire::compare_pair(engine, &request)).await
}

async fn compare_all(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<CompareAllResponse>, ApiError> {
    run_blocking(state, move |engine| wire::compare_all(engine, &request)).await
}

async fn statistics(State(state): State<AppState>) -> Json<StatisticsSnapshot> {
    Json(state.statistics())
}

async fn evaluate_dataset(
    State(state): State<AppState>,
    Json(request): Json<DatasetRequest>,
) -> Result<Json<DatasetReport>, ApiError> {
    run_blocking(state, move |engine| wire::evaluate_dataset(engine, &request)).await
}
