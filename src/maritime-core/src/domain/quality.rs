use serde::{Deserialize, Serialize};

pub const COMPLETENESS_WEIGHT: f64 = 0.25;
pub const ACCURACY_WEIGHT: f64 = 0.25;
pub const CONSISTENCY_WEIGHT: f64 = 0.15;
pub const TIMELINESS_WEIGHT: f64 = 0.15;
pub const VALIDITY_WEIGHT: f64 = 0.10;
pub const UNIQUENESS_WEIGHT: f64 = 0.10;

/// z-score of a two-sided 95% interval.
pub const Z_95: f64 = 1.96;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// Six percentage scores in [0, 100] and their weighted composite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub completeness: f64,
    pub accuracy: f64,
    pub consistency: f64,
    pub timeliness: f64,
    pub validity: f64,
    pub uniqueness: f64,
    pub overall: f64,
    pub confidence_interval: ConfidenceInterval,
    pub sample_size: usize,
}

impl ConfidenceInterval {
    /// Normal approximation to the standard error of a proportion expressed in percent.
    pub fn normal_approximation(overall: f64, sample_size: usize) -> Self {
        if sample_size == 0 {
            return Self {
                lower: overall,
                upper: overall,
            };
        }
        let variance = (overall * (100.0 - overall)).max(0.0) / sample_size as f64;
        let margin = Z_95 * variance.sqrt();
        Self {
            lower: (overall - margin).clamp(0.0, 100.0),
            upper: (overall + margin).clamp(0.0, 100.0),
        }
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl QualityMetrics {
    /// Degraded result for an empty population.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(
        completeness: f64,
        accuracy: f64,
        consistency: f64,
        timeliness: f64,
        validity: f64,
        uniqueness: f64,
        sample_size: usize,
    ) -> Self {
        let overall = completeness * COMPLETENESS_WEIGHT
            + accuracy * ACCURACY_WEIGHT
            + consistency * CONSISTENCY_WEIGHT
            + timeliness * TIMELINESS_WEIGHT
            + validity * VALIDITY_WEIGHT
            + uniqueness * UNIQUENESS_WEIGHT;

        Self {
            completeness,
            accuracy,
            consistency,
            timeliness,
            validity,
            uniqueness,
            overall,
            confidence_interval: ConfidenceInterval::normal_approximation(overall, sample_size),
            sample_size,
        }
    }
}
