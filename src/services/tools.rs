//! Small calculators and simulators — BMI, heart-rate zones, coin flips.
//!
//! All three are pure functions of their input, apart from the coin
//! session which accumulates counts across requests. Randomness is passed in
//! as an `Rng` so tests can seed it.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ErrorCode;

/// Upper bound on flips per request.
pub const MAX_FLIPS_PER_REQUEST: u32 = 10_000;
/// Ratio points kept in a session; older points are evicted first.
pub const MAX_SERIES_POINTS: usize = 2_000;

const CM_PER_INCH: f64 = 2.54;
const KG_PER_POUND: f64 = 0.453_592;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ToolError {
    #[error("{field} must be a positive number, got {value}")]
    InvalidMeasurement { field: &'static str, value: f64 },
    #[error("age must be between 1 and 120, got {0}")]
    InvalidAge(u32),
    #[error("flip count must be between 1 and 10000, got {0}")]
    InvalidFlipCount(u32),
}

impl ErrorCode for ToolError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidMeasurement { .. } => "E_INVALID_MEASUREMENT",
            Self::InvalidAge(_) => "E_INVALID_AGE",
            Self::InvalidFlipCount(_) => "E_INVALID_FLIP_COUNT",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

// =============================================================================
// BMI
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Centimetres and kilograms.
    #[default]
    Metric,
    /// Inches and pounds.
    Imperial,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BmiInput {
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub units: UnitSystem,
    pub height: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BmiCategory {
    Underweight,
    #[serde(rename = "Normal weight")]
    NormalWeight,
    Overweight,
    Obese,
}

impl BmiCategory {
    #[must_use]
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::NormalWeight
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }

    /// Severity hint for display (`info`, `success`, `warning`, `danger`).
    #[must_use]
    pub fn level(self) -> &'static str {
        match self {
            Self::Underweight => "info",
            Self::NormalWeight => "success",
            Self::Overweight => "warning",
            Self::Obese => "danger",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BmiReport {
    /// Rounded to one decimal.
    pub bmi: f64,
    pub category: BmiCategory,
    /// Display level of the rounded value; can differ from `category` at a
    /// boundary.
    pub level: &'static str,
    pub gender: Gender,
}

fn positive(field: &'static str, value: f64) -> Result<f64, ToolError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ToolError::InvalidMeasurement { field, value })
    }
}

/// Body-mass index. The category is taken from the unrounded value and the
/// display level from the rounded one.
///
/// # Errors
///
/// Returns [`ToolError::InvalidMeasurement`] for a non-finite or
/// non-positive height or weight.
pub fn bmi(input: &BmiInput) -> Result<BmiReport, ToolError> {
    let height = positive("height", input.height)?;
    let weight = positive("weight", input.weight)?;

    let (meters, kg) = match input.units {
        UnitSystem::Metric => (height / 100.0, weight),
        UnitSystem::Imperial => (height * CM_PER_INCH / 100.0, weight * KG_PER_POUND),
    };
    let raw = kg / (meters * meters);
    let category = BmiCategory::from_bmi(raw);
    debug!(bmi = raw, ?category, "bmi computed");

    let rounded = (raw * 10.0).round() / 10.0;
    Ok(BmiReport { bmi: rounded, category, level: BmiCategory::from_bmi(rounded).level(), gender: input.gender })
}

// =============================================================================
// HEART RATE
// =============================================================================

struct ZoneSpec {
    name: &'static str,
    intensity: &'static str,
    low_pct: u32,
    high_pct: u32,
}

const ZONES: [ZoneSpec; 5] = [
    ZoneSpec { name: "Recovery", intensity: "Very Light", low_pct: 50, high_pct: 60 },
    ZoneSpec { name: "Endurance", intensity: "Light", low_pct: 60, high_pct: 70 },
    ZoneSpec { name: "Aerobic", intensity: "Moderate", low_pct: 70, high_pct: 80 },
    ZoneSpec { name: "Anaerobic", intensity: "Hard", low_pct: 80, high_pct: 90 },
    ZoneSpec { name: "Maximum", intensity: "Maximum Effort", low_pct: 90, high_pct: 100 },
];

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HeartRateInput {
    #[serde(default)]
    pub gender: Gender,
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeartRateZone {
    /// 1-based.
    pub zone: u8,
    pub name: &'static str,
    pub intensity: &'static str,
    pub low_pct: u32,
    pub high_pct: u32,
    pub min_bpm: u32,
    pub max_bpm: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeartRateReport {
    pub max_heart_rate: u32,
    pub zones: Vec<HeartRateZone>,
}

/// Estimated maximum heart rate.
///
/// # Errors
///
/// Returns [`ToolError::InvalidAge`] outside `1..=120`.
pub fn max_heart_rate(gender: Gender, age: u32) -> Result<u32, ToolError> {
    if !(1..=120).contains(&age) {
        return Err(ToolError::InvalidAge(age));
    }
    let base = match gender {
        Gender::Male => 220,
        Gender::Female => 226,
        Gender::Other => 223,
    };
    Ok(base - age)
}

/// `max * pct / 100` rounded half up.
fn percent_of(max: u32, pct: u32) -> u32 {
    (max * pct + 50) / 100
}

/// The five training zones for a person.
///
/// # Errors
///
/// Returns [`ToolError::InvalidAge`] outside `1..=120`.
pub fn heart_rate_zones(input: &HeartRateInput) -> Result<HeartRateReport, ToolError> {
    let max = max_heart_rate(input.gender, input.age)?;
    let zones = (1u8..)
        .zip(&ZONES)
        .map(|(zone, spec)| HeartRateZone {
            zone,
            name: spec.name,
            intensity: spec.intensity,
            low_pct: spec.low_pct,
            high_pct: spec.high_pct,
            min_bpm: percent_of(max, spec.low_pct),
            max_bpm: percent_of(max, spec.high_pct),
        })
        .collect();
    Ok(HeartRateReport { max_heart_rate: max, zones })
}

// =============================================================================
// COIN
// =============================================================================

/// One point of the running heads ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlipPoint {
    pub flip_number: u64,
    pub heads_ratio: f64,
}

/// Result of a single `flip` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlipBatch {
    pub heads: u32,
    pub tails: u32,
    pub points: Vec<FlipPoint>,
}

/// Running coin-flip tally. Counts cover every flip; `series` holds only
/// the most recent [`MAX_SERIES_POINTS`] points.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoinSession {
    pub heads: u64,
    pub tails: u64,
    pub series: VecDeque<FlipPoint>,
}

impl CoinSession {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.heads + self.tails
    }

    /// Fraction of heads so far; `None` before the first flip.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn heads_ratio(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.heads as f64 / total as f64)
    }

    /// Flip `count` fair coins, recording the ratio after each.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidFlipCount`] outside
    /// `1..=MAX_FLIPS_PER_REQUEST`; the session is unchanged.
    pub fn flip<R: Rng + ?Sized>(&mut self, count: u32, rng: &mut R) -> Result<FlipBatch, ToolError> {
        if !(1..=MAX_FLIPS_PER_REQUEST).contains(&count) {
            return Err(ToolError::InvalidFlipCount(count));
        }

        let mut batch = FlipBatch { heads: 0, tails: 0, points: Vec::with_capacity(count as usize) };
        for _ in 0..count {
            if rng.random_bool(0.5) {
                self.heads += 1;
                batch.heads += 1;
            } else {
                self.tails += 1;
                batch.tails += 1;
            }
            let point = FlipPoint { flip_number: self.total(), heads_ratio: self.heads_ratio().unwrap_or_default() };
            if self.series.len() == MAX_SERIES_POINTS {
                self.series.pop_front();
            }
            self.series.push_back(point);
            batch.points.push(point);
        }
        debug!(count, total = self.total(), "coins flipped");
        Ok(batch)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[path = "tools_test.rs"]
mod tests;
