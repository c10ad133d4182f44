//! Advice Generation
//!
//! Threshold rules that turn raw readings into action recommendations and
//! risk warnings. Each factor's rules only ever look at that factor's value,
//! so changing one reading never adds or removes text for another factor.

use crate::limits::limits_for;
use crate::reading::{EnvironmentalReading, Factor};

// ============================================================================
// Recommendation Rules
// ============================================================================

/// Low/high triggers for an action recommendation
struct RecommendationRule {
    factor: Factor,
    below: f64,
    above: f64,
    raise: &'static str,
    lower: &'static str,
}

const RECOMMENDATION_RULES: [RecommendationRule; 5] = [
    RecommendationRule {
        factor: Factor::Temperature,
        below: 18.0,
        above: 26.0,
        raise: "Increase temperature (add heating or reduce ventilation)",
        lower: "Decrease temperature (add shading or increase ventilation)",
    },
    RecommendationRule {
        factor: Factor::Humidity,
        below: 40.0,
        above: 60.0,
        raise: "Increase humidity (misting or reduced airflow)",
        lower: "Decrease humidity to limit fungal risk (dehumidify or improve airflow)",
    },
    RecommendationRule {
        factor: Factor::SoilPh,
        below: 6.0,
        above: 7.0,
        raise: "Raise soil pH by adding lime",
        lower: "Lower soil pH by adding sulfur",
    },
    RecommendationRule {
        factor: Factor::LightIntensity,
        below: 30_000.0,
        above: 70_000.0,
        raise: "Increase light exposure (supplemental lighting or remove shading)",
        lower: "Provide shade to reduce light intensity",
    },
    RecommendationRule {
        factor: Factor::Co2Level,
        below: 350.0,
        above: 450.0,
        raise: "Improve ventilation or supplement CO2",
        lower: "Increase air circulation to bring CO2 down",
    },
];

impl RecommendationRule {
    fn evaluate(&self, value: f64) -> Option<String> {
        let action = if value < self.below {
            self.raise
        } else if value > self.above {
            self.lower
        } else {
            return None;
        };

        let limits = limits_for(self.factor);
        Some(format!(
            "{}: {} from {:.1} {} toward {}",
            self.factor,
            action,
            value,
            self.factor.unit(),
            limits.optimal_text()
        ))
    }
}

/// Recommendation for a single factor, if its value trips a threshold
pub fn recommendation_for(factor: Factor, value: f64) -> Option<String> {
    RECOMMENDATION_RULES
        .iter()
        .find(|rule| rule.factor == factor)
        .and_then(|rule| rule.evaluate(value))
}

/// All recommendations for a reading, in factor order
pub fn generate_recommendations(reading: &EnvironmentalReading) -> Vec<String> {
    reading
        .values()
        .filter_map(|(factor, value)| recommendation_for(factor, value))
        .collect()
}

// ============================================================================
// Risk Rules
// ============================================================================

/// Risk warning for a single factor, if its value crosses a risk threshold
pub fn risk_for(factor: Factor, value: f64) -> Option<String> {
    let unit = factor.unit();
    match factor {
        Factor::Temperature if value <= 15.0 || value >= 30.0 => Some(format!(
            "Critical temperature: {:.1} {} is outside the safe 15-30 {} range",
            value, unit, unit
        )),
        Factor::Humidity if value > 70.0 => Some(format!(
            "Fungal disease risk: humidity at {:.1}{} exceeds 70{}",
            value, unit, unit
        )),
        Factor::Humidity if value < 30.0 => Some(format!(
            "Desiccation risk: humidity at {:.1}{} is below 30{}",
            value, unit, unit
        )),
        Factor::SoilPh if value < 5.5 || value > 7.5 => Some(format!(
            "Nutrient availability risk: soil pH {:.1} is outside 5.5-7.5",
            value
        )),
        Factor::LightIntensity if value < 20_000.0 || value > 80_000.0 => Some(format!(
            "Light stress: {:.0} {} is outside 20000-80000 {}",
            value, unit, unit
        )),
        Factor::Co2Level if value <= 320.0 || value >= 480.0 => Some(format!(
            "Critical CO2 level: {:.0} {} is outside the safe 320-480 {} range",
            value, unit, unit
        )),
        _ => None,
    }
}

/// All risk warnings for a reading, in factor order
pub fn identify_risk_factors(reading: &EnvironmentalReading) -> Vec<String> {
    reading
        .values()
        .filter_map(|(factor, value)| risk_for(factor, value))
        .collect()
}
