//! Environmental Scorer
//!
//! Scores growing conditions (temperature, humidity, soil pH, light and
//! optionally CO2) against fixed optimal ranges.
//!
//! - `reading`: input readings and the `Factor` enum
//! - `limits`: optimal / warning / critical bands and status classification
//! - `normalization`: per-factor falloff curves and the aggregate
//! - `advice`: threshold rules producing recommendations and risk warnings
//! - `assessment`: `ScoreResult` output types
//! - `history`: bounded score history with statistics, trend and persistence
//! - `scorer`: single-owner, shared and batch scoring entry points
//! - `api_server` (feature `api`): Axum HTTP service

pub mod advice;
pub mod assessment;
pub mod config;
pub mod error;
pub mod history;
pub mod limits;
pub mod normalization;
pub mod reading;
pub mod scorer;

pub mod api_server;

// Re-export commonly used types
pub use assessment::{FactorAssessment, ScoreResult};
pub use config::ServerConfig;
pub use error::ScoringError;
pub use history::{HistoryBuffer, HistoryEntry, HistoryStats, TrendAnalysis, TrendDirection, HISTORY_CAPACITY};
pub use limits::{FactorLimits, FactorStatus};
pub use reading::{EnvironmentalReading, Factor};
pub use scorer::{evaluate, evaluate_batch, EnvironmentalScorer, SharedScorer};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
