use crate::VesselType;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Confidence reported by a report computed over too few vessels to say anything.
pub const MINIMUM_CONFIDENCE_LEVEL: f64 = 0.0;
pub const MAXIMUM_CONFIDENCE_LEVEL: f64 = 0.99;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryComparison {
    pub vessel_type: VesselType,
    pub expected: f64,
    pub observed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChiSquareResult {
    pub statistic: f64,
    pub degrees_of_freedom: u32,
    pub critical_value: f64,
    pub p_value: f64,
    pub passed: bool,
    pub categories: Vec<CategoryComparison>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KolmogorovSmirnovResult {
    pub statistic: f64,
    pub threshold: f64,
    pub p_value: f64,
    pub passed: bool,
    pub sample_size: usize,
    pub reference_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
pub enum SpatialAutocorrelation {
    Clustered,
    Random,
    Dispersed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialMetrics {
    pub clustering_coefficient: f64,
    pub morans_i: f64,
    pub spatial_autocorrelation: SpatialAutocorrelation,
    /// Percent of the densest cells lying near a lane, port or chokepoint.
    pub hotspot_accuracy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalMetrics {
    /// In [-1, 1]
    pub seasonal_correlation: f64,
    /// Percent
    pub daily_pattern_accuracy: f64,
    pub weekend_effect_t_statistic: f64,
    pub weekend_effect_significant: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMetrics {
    pub mean_great_circle_deviation_km: f64,
    /// Percent
    pub traffic_volume_accuracy: f64,
    /// Percent
    pub chokepoint_congestion_fidelity: f64,
    pub routed_vessels: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticalValidationReport {
    pub vessel_type_distribution: ChiSquareResult,
    pub speed_distribution: KolmogorovSmirnovResult,
    pub spatial_distribution: SpatialMetrics,
    pub temporal_patterns: TemporalMetrics,
    pub route_fidelity: RouteMetrics,
    pub overall_realism_score: f64,
    pub confidence_level: f64,
    pub sample_size: usize,
}

impl SpatialAutocorrelation {
    pub fn from_morans_i(morans_i: f64) -> Self {
        if morans_i > 0.3 {
            SpatialAutocorrelation::Clustered
        } else if morans_i < -0.3 {
            SpatialAutocorrelation::Dispersed
        } else {
            SpatialAutocorrelation::Random
        }
    }
}

impl StatisticalValidationReport {
    pub fn confidence_from_score(overall_realism_score: f64) -> f64 {
        (overall_realism_score / 100.0).clamp(MINIMUM_CONFIDENCE_LEVEL, MAXIMUM_CONFIDENCE_LEVEL)
    }
}
