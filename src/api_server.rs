// Axum API Server Module
//
// Purpose: REST API exposing reading evaluation, shared score history and the
// factor limits table

#[cfg(feature = "api")]
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

#[cfg(feature = "api")]
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};

#[cfg(feature = "api")]
use std::path::PathBuf;

#[cfg(feature = "api")]
use std::sync::Arc;

#[cfg(feature = "api")]
use anyhow::Context;

#[cfg(feature = "api")]
use crate::config::ServerConfig;

#[cfg(feature = "api")]
use crate::error::ScoringError;

#[cfg(feature = "api")]
use crate::history::HistoryBuffer;

#[cfg(feature = "api")]
use crate::limits::ALL_LIMITS;

#[cfg(feature = "api")]
use crate::reading::EnvironmentalReading;

#[cfg(feature = "api")]
use crate::scorer::{evaluate_batch, EnvironmentalScorer, SharedScorer};

// ============================================================================
// Application State
// ============================================================================

#[cfg(feature = "api")]
#[derive(Clone)]
pub struct AppState {
    pub scorer: SharedScorer,
    pub history_path: Option<Arc<PathBuf>>,
    /// One history save at a time, so an older snapshot never overwrites a newer one
    save_lock: Arc<tokio::sync::Mutex<()>>,
}

#[cfg(feature = "api")]
impl AppState {
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let history = match &config.history_path {
            Some(path) if path.exists() => {
                tracing::info!("Loading score history from {:?}", path);
                HistoryBuffer::load(path)
                    .with_context(|| format!("Failed to load history file: {:?}", path))?
            }
            Some(path) => {
                tracing::info!("No history at {:?} yet, starting empty", path);
                HistoryBuffer::new()
            }
            None => HistoryBuffer::new(),
        };

        Ok(Self {
            scorer: SharedScorer::new(EnvironmentalScorer::with_history(history)),
            history_path: config.history_path.clone().map(Arc::new),
            save_lock: Arc::new(tokio::sync::Mutex::new(())),
        })
    }

    /// Persist history if a path is configured; failures are logged, not returned.
    ///
    /// The snapshot is taken after the save lock is acquired, and the file is
    /// written on the blocking pool with the scorer unlocked.
    async fn persist_history(&self) {
        let Some(path) = self.history_path.clone() else {
            return;
        };

        let _guard = self.save_lock.lock().await;
        let history = self.scorer.history();
        let saved = tokio::task::spawn_blocking(move || history.save(&path)).await;

        match saved {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Failed to save history: {}", e),
            Err(e) => tracing::warn!("History save task failed: {}", e),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

#[cfg(feature = "api")]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Scoring endpoints
        .route("/api/score", post(score_reading))
        .route("/api/evaluate/batch", post(evaluate_readings))

        // History + reference data
        .route("/api/history", get(get_history))
        .route("/api/limits", get(get_limits))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

#[cfg(feature = "api")]
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Score one reading and archive it in the shared history
#[cfg(feature = "api")]
async fn score_reading(
    State(state): State<AppState>,
    Json(reading): Json<EnvironmentalReading>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = state.scorer.score(&reading)?;
    state.persist_history().await;

    tracing::debug!("Scored reading: aggregate {:.3}", result.aggregate_score);
    Ok(Json(serde_json::to_value(result).map_err(|e| AppError::Internal(e.to_string()))?))
}

/// Evaluate many readings in parallel without touching history
#[cfg(feature = "api")]
async fn evaluate_readings(
    Json(readings): Json<Vec<EnvironmentalReading>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let start = std::time::Instant::now();

    // Rayon work runs on the blocking pool, off the async workers
    let results = tokio::task::spawn_blocking(move || evaluate_batch(&readings))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;
    tracing::debug!("Evaluated {} readings in {:?}", results.len(), start.elapsed());

    Ok(Json(serde_json::to_value(results).map_err(|e| AppError::Internal(e.to_string()))?))
}

#[cfg(feature = "api")]
async fn get_history(State(state): State<AppState>) -> Json<serde_json::Value> {
    let history = state.scorer.history();
    Json(serde_json::json!({
        "entries": history.snapshot(),
        "statistics": history.statistics(),
        "trend": history.trend(),
    }))
}

#[cfg(feature = "api")]
async fn get_limits() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "limits": ALL_LIMITS }))
}

// ============================================================================
// Error Handling
// ============================================================================

#[cfg(feature = "api")]
#[derive(Debug)]
enum AppError {
    InvalidInput(String),
    Internal(String),
}

#[cfg(feature = "api")]
impl From<ScoringError> for AppError {
    fn from(e: ScoringError) -> Self {
        match e {
            ScoringError::NonFinite { .. } => AppError::InvalidInput(e.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

#[cfg(feature = "api")]
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
