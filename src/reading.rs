//! Environmental readings
//!
//! Defines the `EnvironmentalReading` struct representing one set of field or
//! greenhouse conditions, plus the `Factor` enum naming each measured quantity.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, ScoringError};

/// One measured environmental quantity.
///
/// Declaration order is the output order for scores, recommendations and risks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Temperature,
    Humidity,
    SoilPh,
    LightIntensity,
    Co2Level,
}

impl Factor {
    pub const ALL: [Factor; 5] = [
        Factor::Temperature,
        Factor::Humidity,
        Factor::SoilPh,
        Factor::LightIntensity,
        Factor::Co2Level,
    ];

    /// Stable snake_case key, matching the JSON field name
    pub fn key(&self) -> &'static str {
        match self {
            Factor::Temperature => "temperature",
            Factor::Humidity => "humidity",
            Factor::SoilPh => "soil_ph",
            Factor::LightIntensity => "light_intensity",
            Factor::Co2Level => "co2_level",
        }
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            Factor::Temperature => "Temperature",
            Factor::Humidity => "Humidity",
            Factor::SoilPh => "Soil pH",
            Factor::LightIntensity => "Light intensity",
            Factor::Co2Level => "CO2 level",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Factor::Temperature => "°C",
            Factor::Humidity => "%",
            Factor::SoilPh => "pH",
            Factor::LightIntensity => "lux",
            Factor::Co2Level => "ppm",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}

/// Current conditions supplied by the caller for a single evaluation.
///
/// No range checks are applied: absurd values simply score 0 through the
/// falloff curves. Only non-finite values are rejected by [`validate`].
///
/// [`validate`]: EnvironmentalReading::validate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalReading {
    /// Air temperature (°C)
    pub temperature: f64,

    /// Relative humidity (%)
    pub humidity: f64,

    /// Soil pH (H2O)
    pub soil_ph: f64,

    /// Light intensity (lux)
    pub light_intensity: f64,

    /// CO2 concentration (ppm), if measured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2_level: Option<f64>,
}

impl EnvironmentalReading {
    pub fn new(temperature: f64, humidity: f64, soil_ph: f64, light_intensity: f64) -> Self {
        Self {
            temperature,
            humidity,
            soil_ph,
            light_intensity,
            co2_level: None,
        }
    }

    pub fn with_co2(mut self, co2_level: f64) -> Self {
        self.co2_level = Some(co2_level);
        self
    }

    /// Value for a factor, `None` only for an unmeasured CO2 level
    pub fn value(&self, factor: Factor) -> Option<f64> {
        match factor {
            Factor::Temperature => Some(self.temperature),
            Factor::Humidity => Some(self.humidity),
            Factor::SoilPh => Some(self.soil_ph),
            Factor::LightIntensity => Some(self.light_intensity),
            Factor::Co2Level => self.co2_level,
        }
    }

    /// Present factors with their values, in factor order
    pub fn values(&self) -> impl Iterator<Item = (Factor, f64)> + '_ {
        Factor::ALL
            .into_iter()
            .filter_map(move |factor| self.value(factor).map(|v| (factor, v)))
    }

    /// Reject NaN and infinite values
    pub fn validate(&self) -> Result<()> {
        match self.values().find(|(_, value)| !value.is_finite()) {
            Some((factor, value)) => Err(ScoringError::NonFinite { factor, value }),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Reference Readings
// ============================================================================

/// Every factor at its optimum: 22°C, 50% RH, pH 6.5, 50 000 lux
pub fn ideal_greenhouse() -> EnvironmentalReading {
    EnvironmentalReading::new(22.0, 50.0, 6.5, 50_000.0).with_co2(400.0)
}

/// Cold, waterlogged, alkaline and over-lit: trips every risk rule
pub fn stressed_field() -> EnvironmentalReading {
    EnvironmentalReading::new(15.0, 80.0, 8.0, 90_000.0)
}
