//! Score Result Types
//!
//! Output structures for the scorer, capturing per-factor scores, the
//! aggregate, and the advice generated for a single reading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::limits::FactorStatus;
use crate::reading::Factor;

/// Aggregate at or above which a result is reported with high confidence
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.9;
pub const HIGH_CONFIDENCE: f64 = 0.9;
pub const BASE_CONFIDENCE: f64 = 0.7;

/// Fixed confidence heuristic, not a statistical estimate
pub fn confidence_for(aggregate_score: f64) -> f64 {
    if aggregate_score >= HIGH_CONFIDENCE_THRESHOLD {
        HIGH_CONFIDENCE
    } else {
        BASE_CONFIDENCE
    }
}

/// Assessment of one factor in a reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorAssessment {
    pub factor: Factor,

    /// Raw reading
    pub value: f64,

    /// Optimality in [0, 1]
    pub score: f64,

    pub status: FactorStatus,
}

/// Complete result of scoring one reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Optimality per present factor, each in [0, 1]
    pub per_factor_score: BTreeMap<Factor, f64>,

    /// Mean of the per-factor scores
    pub aggregate_score: f64,

    /// Action recommendations, in factor order
    pub recommendations: Vec<String>,

    /// Risk warnings, in factor order
    pub risk_factors: Vec<String>,

    pub confidence: f64,

    /// Per-factor detail including status band
    pub factors: Vec<FactorAssessment>,

    pub timestamp: DateTime<Utc>,
}

impl ScoreResult {
    pub fn factor_score(&self, factor: Factor) -> Option<f64> {
        self.per_factor_score.get(&factor).copied()
    }

    /// Worst status across all factors
    pub fn overall_status(&self) -> FactorStatus {
        self.factors
            .iter()
            .map(|f| f.status)
            .fold(FactorStatus::Optimal, FactorStatus::worst)
    }

    pub fn has_risks(&self) -> bool {
        !self.risk_factors.is_empty()
    }
}
