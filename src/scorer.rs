//! Environmental Scorer - Main coordinator for scoring readings
//!
//! Combines normalization, advice rules and the history buffer into the main
//! scoring interface. Evaluation is a pure function of the reading; `score`
//! additionally archives the aggregate into the scorer's history.
//!
//! Includes a sequential single-owner scorer, a mutex-guarded `SharedScorer`
//! for multi-caller use, and parallel (Rayon) batch evaluation.

use chrono::Utc;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::advice::{generate_recommendations, identify_risk_factors};
use crate::assessment::{confidence_for, FactorAssessment, ScoreResult};
use crate::error::Result;
use crate::history::{HistoryBuffer, HistoryEntry};
use crate::limits::limits_for;
use crate::normalization::{aggregate, normalize};
use crate::reading::EnvironmentalReading;

/// Score a reading without touching any history
pub fn evaluate(reading: &EnvironmentalReading) -> Result<ScoreResult> {
    reading.validate()?;

    let factors: Vec<FactorAssessment> = reading
        .values()
        .map(|(factor, value)| FactorAssessment {
            factor,
            value,
            score: normalize(factor, value),
            status: limits_for(factor).status(value),
        })
        .collect();

    let per_factor_score: BTreeMap<_, _> = factors.iter().map(|f| (f.factor, f.score)).collect();
    let scores: Vec<f64> = factors.iter().map(|f| f.score).collect();
    let aggregate_score = aggregate(&scores);

    let recommendations = generate_recommendations(reading);
    let risk_factors = identify_risk_factors(reading);

    tracing::debug!(
        aggregate_score,
        recommendations = recommendations.len(),
        risks = risk_factors.len(),
        "Evaluated reading"
    );

    Ok(ScoreResult {
        per_factor_score,
        aggregate_score,
        recommendations,
        risk_factors,
        confidence: confidence_for(aggregate_score),
        factors,
        timestamp: Utc::now(),
    })
}

/// Surface risks of an archived score. Pure evaluation stays at debug level.
fn warn_risks(result: &ScoreResult) {
    for risk in &result.risk_factors {
        tracing::warn!("{}", risk);
    }
}

/// Score many readings in parallel. History is never touched.
pub fn evaluate_batch(readings: &[EnvironmentalReading]) -> Result<Vec<ScoreResult>> {
    readings.par_iter().map(evaluate).collect()
}

/// Single-owner scorer holding its own score history
#[derive(Debug, Default)]
pub struct EnvironmentalScorer {
    history: HistoryBuffer,
}

impl EnvironmentalScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing history, e.g. one loaded from disk
    pub fn with_history(history: HistoryBuffer) -> Self {
        Self { history }
    }

    /// Pure evaluation; see [`evaluate`]
    pub fn evaluate(&self, reading: &EnvironmentalReading) -> Result<ScoreResult> {
        evaluate(reading)
    }

    /// Evaluate and archive the aggregate score
    pub fn score(&mut self, reading: &EnvironmentalReading) -> Result<ScoreResult> {
        let result = evaluate(reading)?;
        warn_risks(&result);
        self.history
            .append(HistoryEntry::new(result.timestamp, result.aggregate_score));
        Ok(result)
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryBuffer {
        &mut self.history
    }
}

// ============================================================================
// Shared Scorer
// ============================================================================

/// Cloneable handle to one scorer shared between concurrent callers.
///
/// Evaluation runs outside the lock; only the history append is serialized.
#[derive(Debug, Clone, Default)]
pub struct SharedScorer {
    inner: Arc<Mutex<EnvironmentalScorer>>,
}

impl SharedScorer {
    pub fn new(scorer: EnvironmentalScorer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(scorer)),
        }
    }

    /// Evaluate and archive the aggregate score.
    ///
    /// The timestamp is taken under the lock so history stays in arrival order.
    pub fn score(&self, reading: &EnvironmentalReading) -> Result<ScoreResult> {
        let mut result = evaluate(reading)?;
        {
            let mut scorer = self.lock();
            result.timestamp = Utc::now();
            scorer
                .history_mut()
                .append(HistoryEntry::new(result.timestamp, result.aggregate_score));
        }
        warn_risks(&result);
        Ok(result)
    }

    /// Copy of the current history.
    ///
    /// Prefer this over [`with_history`](Self::with_history) for slow work such
    /// as saving, so the lock is released first.
    pub fn history(&self) -> HistoryBuffer {
        self.lock().history().clone()
    }

    /// Run a closure against the locked history
    pub fn with_history<T>(&self, f: impl FnOnce(&HistoryBuffer) -> T) -> T {
        f(self.lock().history())
    }

    fn lock(&self) -> MutexGuard<'_, EnvironmentalScorer> {
        // History appends are single pushes, so a poisoned buffer is still consistent
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
