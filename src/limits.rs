//! Factor Limits
//!
//! Fixed optimal / warning / critical bands for each factor, and the status
//! classification derived from them.
//!
//! ## Bands
//! - optimal: conditions the crop is happiest in
//! - warning: acceptable, outside it an adjustment is advised
//! - critical: outside (or on the edge of) this band growth is at risk

use serde::{Deserialize, Serialize};

use crate::reading::Factor;

/// Inclusive numeric band `[low, high]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    /// Strictly inside, boundaries excluded
    pub fn contains_open(&self, value: f64) -> bool {
        self.low < value && value < self.high
    }
}

/// Limits for a single factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorLimits {
    pub factor: Factor,
    pub optimal: Band,
    pub warning: Band,
    pub critical: Band,
}

impl FactorLimits {
    /// Classify a value against this factor's bands
    pub fn status(&self, value: f64) -> FactorStatus {
        if self.optimal.contains(value) {
            FactorStatus::Optimal
        } else if self.warning.contains(value) {
            FactorStatus::Normal
        } else if self.critical.contains_open(value) {
            FactorStatus::Warning
        } else {
            FactorStatus::Critical
        }
    }

    /// Format the optimal band for display, e.g. "20.0-24.0 °C"
    pub fn optimal_text(&self) -> String {
        format!(
            "{:.1}-{:.1} {}",
            self.optimal.low,
            self.optimal.high,
            self.factor.unit()
        )
    }
}

// ============================================================================
// Limits Table
// ============================================================================

pub const TEMPERATURE_LIMITS: FactorLimits = FactorLimits {
    factor: Factor::Temperature,
    optimal: Band::new(20.0, 24.0),
    warning: Band::new(18.0, 26.0),
    critical: Band::new(15.0, 30.0),
};

pub const HUMIDITY_LIMITS: FactorLimits = FactorLimits {
    factor: Factor::Humidity,
    optimal: Band::new(45.0, 55.0),
    warning: Band::new(40.0, 60.0),
    critical: Band::new(35.0, 65.0),
};

pub const SOIL_PH_LIMITS: FactorLimits = FactorLimits {
    factor: Factor::SoilPh,
    optimal: Band::new(6.0, 7.0),
    warning: Band::new(5.8, 7.2),
    critical: Band::new(5.5, 7.5),
};

pub const LIGHT_LIMITS: FactorLimits = FactorLimits {
    factor: Factor::LightIntensity,
    optimal: Band::new(40_000.0, 60_000.0),
    warning: Band::new(30_000.0, 70_000.0),
    critical: Band::new(25_000.0, 75_000.0),
};

pub const CO2_LIMITS: FactorLimits = FactorLimits {
    factor: Factor::Co2Level,
    optimal: Band::new(380.0, 420.0),
    warning: Band::new(350.0, 450.0),
    critical: Band::new(320.0, 480.0),
};

pub const ALL_LIMITS: [FactorLimits; 5] = [
    TEMPERATURE_LIMITS,
    HUMIDITY_LIMITS,
    SOIL_PH_LIMITS,
    LIGHT_LIMITS,
    CO2_LIMITS,
];

pub fn limits_for(factor: Factor) -> &'static FactorLimits {
    match factor {
        Factor::Temperature => &TEMPERATURE_LIMITS,
        Factor::Humidity => &HUMIDITY_LIMITS,
        Factor::SoilPh => &SOIL_PH_LIMITS,
        Factor::LightIntensity => &LIGHT_LIMITS,
        Factor::Co2Level => &CO2_LIMITS,
    }
}

/// Qualitative status of one factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorStatus {
    /// Within the optimal band
    Optimal,
    /// Outside optimal but within the warning band
    Normal,
    /// Outside the warning band, still short of critical
    Warning,
    /// At or beyond the critical boundary
    Critical,
}

impl FactorStatus {
    pub fn display_text(&self) -> &'static str {
        match self {
            FactorStatus::Optimal => "Optimal",
            FactorStatus::Normal => "Normal",
            FactorStatus::Warning => "Warning",
            FactorStatus::Critical => "Critical",
        }
    }

    /// Return the worse of two statuses
    pub fn worst(self, other: Self) -> Self {
        self.max(other)
    }
}
