//! Normalization Utilities
//!
//! Converts raw factor readings into optimality scores in [0, 1].
//!
//! Every curve is a clamped linear falloff around a fixed optimum, so any
//! finite input (negative temperatures, pH of 40, ...) lands at 0 rather than
//! producing an error.

use crate::reading::Factor;

/// Optimum and falloff width for a factor that scores 1.0 inside a plateau
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Falloff {
    /// Point the linear falloff is measured from
    pub center: f64,
    /// Distance from `center` at which the score reaches 0
    pub width: f64,
    /// Values inside `[plateau.0, plateau.1]` score exactly 1.0
    pub plateau: Option<(f64, f64)>,
}

impl Falloff {
    /// Score a value against this curve
    pub fn score(&self, value: f64) -> f64 {
        if let Some((low, high)) = self.plateau {
            if low <= value && value <= high {
                return 1.0;
            }
        }
        (1.0 - (value - self.center).abs() / self.width).clamp(0.0, 1.0)
    }
}

pub const TEMPERATURE_FALLOFF: Falloff = Falloff {
    center: 22.0,
    width: 10.0,
    plateau: None,
};

pub const HUMIDITY_FALLOFF: Falloff = Falloff {
    center: 50.0,
    width: 30.0,
    plateau: Some((40.0, 60.0)),
};

pub const SOIL_PH_FALLOFF: Falloff = Falloff {
    center: 6.5,
    width: 2.0,
    plateau: Some((6.0, 7.0)),
};

pub const CO2_FALLOFF: Falloff = Falloff {
    center: 400.0,
    width: 200.0,
    plateau: None,
};

/// Light intensity at which the light score saturates (lux)
pub const LIGHT_SATURATION: f64 = 50_000.0;

/// Light scores rise linearly to saturation and never fall.
///
/// Excess light is reported through the light-stress risk rule instead.
pub fn light_score(intensity: f64) -> f64 {
    (intensity / LIGHT_SATURATION).clamp(0.0, 1.0)
}

/// Normalize a raw factor value to [0, 1]
pub fn normalize(factor: Factor, value: f64) -> f64 {
    match factor {
        Factor::Temperature => TEMPERATURE_FALLOFF.score(value),
        Factor::Humidity => HUMIDITY_FALLOFF.score(value),
        Factor::SoilPh => SOIL_PH_FALLOFF.score(value),
        Factor::LightIntensity => light_score(value),
        Factor::Co2Level => CO2_FALLOFF.score(value),
    }
}

/// Unweighted mean of factor scores; 0.0 for an empty slice
pub fn aggregate(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}
