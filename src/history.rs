//! Score History
//!
//! Bounded FIFO of recent aggregate scores, used to chart how conditions
//! evolve. Holds at most [`HISTORY_CAPACITY`] entries; the oldest entry is
//! evicted first.
//!
//! Also provides summary statistics, a least-squares trend over the retained
//! window, and JSON persistence so history can survive a restart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScoringError};

/// Maximum number of retained entries
pub const HISTORY_CAPACITY: usize = 30;

/// Trend strength below which the history is considered stable
pub const STABLE_TREND_THRESHOLD: f64 = 0.1;

/// One archived aggregate score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub aggregate_score: f64,
}

impl HistoryEntry {
    pub fn new(timestamp: DateTime<Utc>, aggregate_score: f64) -> Self {
        Self {
            timestamp,
            aggregate_score,
        }
    }
}

/// Fixed-capacity FIFO of history entries, oldest first
#[derive(Debug, Clone, Default)]
pub struct HistoryBuffer {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
        }
    }

    /// Append to the back, evicting from the front once over capacity
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > HISTORY_CAPACITY {
            self.entries.pop_front();
        }
    }

    /// Copy of the current contents in arrival order
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Write the history as a pretty-printed JSON array.
    ///
    /// The file is written to a sibling `.tmp` file first and renamed into
    /// place, so readers never see a partially written history.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot()).map_err(|source| {
            ScoringError::HistoryFormat {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let tmp_path = temp_path_for(path);
        fs::write(&tmp_path, json)
            .and_then(|_| fs::rename(&tmp_path, path))
            .map_err(|source| {
                let _ = fs::remove_file(&tmp_path);
                ScoringError::HistoryIo {
                    path: path.to_path_buf(),
                    source,
                }
            })?;

        tracing::info!("Saved {} history entries to {:?}", self.len(), path);
        Ok(())
    }

    /// Load a history file, keeping only the newest entries that fit
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ScoringError::HistoryIo {
            path: path.to_path_buf(),
            source,
        })?;

        let entries: Vec<HistoryEntry> =
            serde_json::from_str(&contents).map_err(|source| ScoringError::HistoryFormat {
                path: path.to_path_buf(),
                source,
            })?;

        let mut buffer = Self::new();
        for entry in entries {
            buffer.append(entry);
        }

        tracing::info!("Loaded {} history entries from {:?}", buffer.len(), path);
        Ok(buffer)
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Summary statistics of the retained aggregate scores
    pub fn statistics(&self) -> Option<HistoryStats> {
        if self.entries.is_empty() {
            return None;
        }

        let mut values: Vec<f64> = self.entries.iter().map(|e| e.aggregate_score).collect();
        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        values.sort_by(|a, b| a.total_cmp(b));
        let median = if count % 2 == 0 {
            (values[count / 2 - 1] + values[count / 2]) / 2.0
        } else {
            values[count / 2]
        };

        Some(HistoryStats {
            count,
            mean,
            std_dev: variance.sqrt(),
            min: values[0],
            max: values[count - 1],
            median,
        })
    }

    /// Least-squares trend of aggregate score over time
    ///
    /// Strength is `|slope| * span / mean`, the relative change the slope
    /// implies across the retained window.
    pub fn trend(&self) -> Option<TrendAnalysis> {
        if self.entries.len() < 2 {
            return None;
        }

        // Entries may arrive out of timestamp order (e.g. a merged file)
        let first = self.entries.iter().map(|e| e.timestamp).min()?;
        let points: Vec<(f64, f64)> = self
            .entries
            .iter()
            .map(|e| {
                let seconds = (e.timestamp - first).num_milliseconds() as f64 / 1000.0;
                (seconds, e.aggregate_score)
            })
            .collect();

        let n = points.len() as f64;
        let mean_t = points.iter().map(|(t, _)| t).sum::<f64>() / n;
        let mean_v = points.iter().map(|(_, v)| v).sum::<f64>() / n;

        let mut cov = 0.0;
        let mut var_t = 0.0;
        let mut var_v = 0.0;
        for (t, v) in &points {
            cov += (t - mean_t) * (v - mean_v);
            var_t += (t - mean_t).powi(2);
            var_v += (v - mean_v).powi(2);
        }

        // All entries share a timestamp: no slope to fit
        if var_t == 0.0 {
            return Some(TrendAnalysis::stable());
        }

        let slope = cov / var_t;
        let r_squared = if var_v == 0.0 {
            0.0
        } else {
            cov * cov / (var_t * var_v)
        };

        let span = points.iter().map(|(t, _)| *t).fold(0.0, f64::max);
        let strength = if mean_v == 0.0 {
            0.0
        } else {
            (slope.abs() * span / mean_v).abs()
        };

        let direction = if strength < STABLE_TREND_THRESHOLD {
            TrendDirection::Stable
        } else if slope > 0.0 {
            TrendDirection::Improving
        } else {
            TrendDirection::Declining
        };

        Some(TrendAnalysis {
            direction,
            strength,
            slope,
            r_squared,
        })
    }
}

/// `history.json` -> `history.json.tmp`, in the same directory
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Summary statistics over the history window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Stable,
    Improving,
    Declining,
}

/// Linear trend of aggregate score against time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    pub strength: f64,
    /// Score change per second
    pub slope: f64,
    pub r_squared: f64,
}

impl TrendAnalysis {
    fn stable() -> Self {
        Self {
            direction: TrendDirection::Stable,
            strength: 0.0,
            slope: 0.0,
            r_squared: 0.0,
        }
    }
}
