use crate::{
    ConfigurationError, sha256_hex,
    configuration_error::{
        InvalidBoundingBoxSnafu, InvalidTemporalRangeSnafu, NonPositiveVesselCountSnafu,
    },
};
use chrono::{DateTime, Duration, Utc};
use geo::{Rect, coord};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

const EARTH_RADIUS_KM: f64 = 6_371.0088;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// Inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RealismLevel {
    Basic,
    #[default]
    Standard,
    High,
    ResearchGrade,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticGenerationConfig {
    pub vessel_count_target: u32,
    pub bounds: BoundingBox,
    pub temporal_range: TemporalRange,
    #[serde(default)]
    pub realism_level: RealismLevel,
    #[serde(default = "enabled")]
    pub statistical_validation: bool,
    #[serde(default = "enabled")]
    pub seasonal_modeling: bool,
    #[serde(default = "enabled")]
    pub route_optimization: bool,
    #[serde(default)]
    pub uncertainty_quantification: bool,
}

fn enabled() -> bool {
    true
}

impl BoundingBox {
    pub fn new(
        north: f64,
        south: f64,
        east: f64,
        west: f64,
    ) -> Result<BoundingBox, ConfigurationError> {
        let bounds = BoundingBox {
            north,
            south,
            east,
            west,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let in_range = (-90.0..=90.0).contains(&self.south)
            && (-90.0..=90.0).contains(&self.north)
            && (-180.0..=180.0).contains(&self.west)
            && (-180.0..=180.0).contains(&self.east);

        if !in_range || self.south > self.north || self.west > self.east {
            InvalidBoundingBoxSnafu {
                north: self.north,
                south: self.south,
                east: self.east,
                west: self.west,
            }
            .fail()
        } else {
            Ok(())
        }
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.south..=self.north).contains(&latitude) && (self.west..=self.east).contains(&longitude)
    }

    /// Spherical area enclosed by the box.
    pub fn area_km2(&self) -> f64 {
        let width = (self.east - self.west).to_radians();
        let height = self.north.to_radians().sin() - self.south.to_radians().sin();
        EARTH_RADIUS_KM * EARTH_RADIUS_KM * width * height.abs()
    }

    pub fn rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.west, y: self.south },
            coord! { x: self.east, y: self.north },
        )
    }
}

impl TemporalRange {
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<TemporalRange, ConfigurationError> {
        let range = TemporalRange { start, end };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.start >= self.end {
            InvalidTemporalRangeSnafu {
                start: self.start,
                end: self.end,
            }
            .fail()
        } else {
            Ok(())
        }
    }

    pub fn contains(&self, val: DateTime<Utc>) -> bool {
        val >= self.start && val <= self.end
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl RealismLevel {
    /// Half-width in degrees of the uniform weather-routing deviation applied to course.
    pub fn course_deviation_spread(&self) -> f64 {
        match self {
            RealismLevel::Basic => 25.0,
            RealismLevel::Standard => 15.0,
            RealismLevel::High => 10.0,
            RealismLevel::ResearchGrade => 7.5,
        }
    }

    /// H3 resolution the validator aggregates on when scoring spatial structure.
    pub fn validation_resolution(&self) -> u8 {
        match self {
            RealismLevel::Basic | RealismLevel::Standard => 3,
            RealismLevel::High | RealismLevel::ResearchGrade => 4,
        }
    }
}

impl SyntheticGenerationConfig {
    pub fn new(
        vessel_count_target: u32,
        bounds: BoundingBox,
        temporal_range: TemporalRange,
    ) -> Self {
        Self {
            vessel_count_target,
            bounds,
            temporal_range,
            realism_level: RealismLevel::default(),
            statistical_validation: true,
            seasonal_modeling: true,
            route_optimization: true,
            uncertainty_quantification: false,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.bounds.validate()?;
        self.temporal_range.validate()?;
        if self.vessel_count_target == 0 {
            return NonPositiveVesselCountSnafu {
                value: self.vessel_count_target,
            }
            .fail();
        }
        Ok(())
    }

    /// SHA-256 over the config fields, stable across processes and platforms.
    pub fn config_hash(&self) -> String {
        let mut bytes = Vec::with_capacity(96);
        bytes.extend_from_slice(&(self.vessel_count_target as u64).to_le_bytes());
        for v in [
            self.bounds.north,
            self.bounds.south,
            self.bounds.east,
            self.bounds.west,
        ] {
            bytes.extend_from_slice(&v.to_bits().to_le_bytes());
        }
        bytes.extend_from_slice(&self.temporal_range.start.timestamp_millis().to_le_bytes());
        bytes.extend_from_slice(&self.temporal_range.end.timestamp_millis().to_le_bytes());
        bytes.extend_from_slice(self.realism_level.as_ref().as_bytes());
        bytes.extend([
            0xff,
            self.statistical_validation as u8,
            self.seasonal_modeling as u8,
            self.route_optimization as u8,
            self.uncertainty_quantification as u8,
        ]);
        sha256_hex(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn range() -> TemporalRange {
        TemporalRange::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_inverted_bounding_box_is_rejected() {
        assert!(BoundingBox::new(30.0, 60.0, 0.0, -80.0).is_err());
        assert!(BoundingBox::new(60.0, 30.0, -80.0, 0.0).is_err());
        assert!(BoundingBox::new(95.0, 30.0, 0.0, -80.0).is_err());
        assert!(BoundingBox::new(60.0, 30.0, 0.0, -80.0).is_ok());
    }

    #[test]
    fn test_whole_globe_area() {
        let globe = BoundingBox::new(90.0, -90.0, 180.0, -180.0).unwrap();
        assert!((globe.area_km2() - 510_065_880.97).abs() < 1.0);
    }

    #[test]
    fn test_empty_temporal_range_is_rejected() {
        let t = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert!(TemporalRange::new(t, t).is_err());
        assert!(TemporalRange::new(t, t - Duration::hours(1)).is_err());
    }

    #[test]
    fn test_zero_vessel_target_is_rejected() {
        let bounds = BoundingBox::new(60.0, 30.0, 0.0, -80.0).unwrap();
        let config = SyntheticGenerationConfig::new(0, bounds, range());
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::NonPositiveVesselCount { .. })
        ));
    }

    #[test]
    fn test_config_hash_changes_with_any_field() {
        let bounds = BoundingBox::new(60.0, 30.0, 0.0, -80.0).unwrap();
        let config = SyntheticGenerationConfig::new(100, bounds, range());
        let mut other = config.clone();
        assert_eq!(config.config_hash(), other.config_hash());
        assert_eq!(config.config_hash().len(), 64);

        other.seasonal_modeling = false;
        assert_ne!(config.config_hash(), other.config_hash());
    }
}
