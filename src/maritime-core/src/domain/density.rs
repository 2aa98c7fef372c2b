use crate::{
    ConfigurationError, Coordinate, VesselType, configuration_error::InvalidResolutionSnafu,
};
use h3o::{CellIndex, Resolution};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::collections::BTreeMap;
use strum::{AsRefStr, Display};

/// Vessels per km² at or below which a cell is still in the given class.
pub const LOW_CONGESTION_MAX_DENSITY: f64 = 0.1;
pub const MODERATE_CONGESTION_MAX_DENSITY: f64 = 0.5;
pub const HIGH_CONGESTION_MAX_DENSITY: f64 = 1.0;

/// Number of vessels at which a cell's confidence saturates.
pub const CELL_CONFIDENCE_SATURATION: u32 = 10;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    AsRefStr,
)]
pub enum CongestionLevel {
    Low,
    Moderate,
    High,
    Severe,
}

/// One hexagonal cell of an aggregated population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct H3DensityCell {
    pub cell: CellIndex,
    pub resolution: u8,
    pub center: Coordinate,
    pub vessel_count: u32,
    pub type_counts: BTreeMap<VesselType, u32>,
    /// Knots, `None` when no vessel in the cell reports speed.
    pub mean_speed: Option<f64>,
    /// Circular mean of reported headings, `None` when they cancel out or are absent.
    pub dominant_heading: Option<f64>,
    pub economic_value: f64,
    pub data_demand_gb_month: f64,
    pub area_km2: f64,
    pub density_per_km2: f64,
    pub congestion: CongestionLevel,
    pub seasonal_multiplier: f64,
    pub confidence: f64,
}

impl CongestionLevel {
    /// Class boundaries are inclusive on the upper end of each class.
    pub fn from_density(vessels_per_km2: f64) -> Self {
        if vessels_per_km2 <= LOW_CONGESTION_MAX_DENSITY {
            CongestionLevel::Low
        } else if vessels_per_km2 <= MODERATE_CONGESTION_MAX_DENSITY {
            CongestionLevel::Moderate
        } else if vessels_per_km2 <= HIGH_CONGESTION_MAX_DENSITY {
            CongestionLevel::High
        } else {
            CongestionLevel::Severe
        }
    }
}

pub fn h3_resolution(value: u8) -> Result<Resolution, ConfigurationError> {
    Resolution::try_from(value).context(InvalidResolutionSnafu { value })
}

pub fn cell_confidence(vessel_count: u32) -> f64 {
    (vessel_count as f64 / CELL_CONFIDENCE_SATURATION as f64).min(1.0)
}
