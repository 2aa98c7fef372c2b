use crate::{
    Chokepoint, ReferenceDataError, Season, VesselType,
    reference_data_error::UnknownVesselTypeSnafu,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use tracing::warn;

/// Vessel types missing from a caller supplied library fall back to this type.
pub const FALLBACK_VESSEL_TYPE: VesselType = VesselType::GeneralCargo;

const PEAK_HOURS: [u32; 4] = [8, 9, 14, 15];
const LOW_ACTIVITY_HOURS: [u32; 3] = [2, 3, 4];
const PEAK_MULTIPLIER: f64 = 1.2;
const LOW_ACTIVITY_MULTIPLIER: f64 = 0.7;

/// Knots, the sampled value is clipped to `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedProfile {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Per-type lookup tables the sampler derives correlated fields from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VesselTypeProfile {
    pub length_m: (f64, f64),
    pub length_to_beam: f64,
    pub draft_m: (f64, f64),
    pub gross_tonnage: (f64, f64),
    pub deadweight_ratio: f64,
    pub crew: (u32, u32),
    pub passengers: (u32, u32),
    pub satellite_probability: f64,
    pub data_demand_gb_month: (f64, f64),
    pub hazardous_probability: f64,
    pub imo_probability: f64,
    pub destination_probability: f64,
    /// Standard deviation in km of the lateral offset from a shipping lane.
    pub lane_deviation_km: f64,
    pub cargo: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlagProfile {
    pub name: &'static str,
    /// Maritime Identification Digits
    pub mid: u32,
    pub call_sign_prefix: &'static str,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalMultipliers {
    pub spring: f64,
    pub summer: f64,
    pub autumn: f64,
    pub winter: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TypeReference {
    proportion: f64,
    speed: SpeedProfile,
    profile: VesselTypeProfile,
}

/// Canonical statistical reference tables, injected into every component that samples or
/// validates against them.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionLibrary {
    types: BTreeMap<VesselType, TypeReference>,
    seasonal: SeasonalMultipliers,
    chokepoints: Vec<Chokepoint>,
    flag_states: Vec<FlagProfile>,
}

impl Default for SeasonalMultipliers {
    fn default() -> Self {
        Self {
            spring: 1.05,
            summer: 1.15,
            autumn: 1.0,
            winter: 0.85,
        }
    }
}

impl SeasonalMultipliers {
    pub fn get(&self, season: Season) -> f64 {
        match season {
            Season::Spring => self.spring,
            Season::Summer => self.summer,
            Season::Autumn => self.autumn,
            Season::Winter => self.winter,
        }
    }
}

impl SpeedProfile {
    pub fn clip(&self, speed: f64) -> f64 {
        speed.clamp(self.min, self.max)
    }
}

impl Default for DistributionLibrary {
    fn default() -> Self {
        let types = VesselType::iter()
            .map(|t| {
                let (proportion, speed, profile) = default_type_reference(t);
                (
                    t,
                    TypeReference {
                        proportion,
                        speed,
                        profile,
                    },
                )
            })
            .collect();

        let chokepoints = DEFAULT_CHOKEPOINTS
            .iter()
            .map(|(name, latitude, longitude, daily_transits)| Chokepoint {
                name: name.to_string(),
                latitude: *latitude,
                longitude: *longitude,
                daily_transits: *daily_transits,
                radius_km: 100.0,
            })
            .collect();

        Self {
            types,
            seasonal: SeasonalMultipliers::default(),
            chokepoints,
            flag_states: DEFAULT_FLAG_STATES.to_vec(),
        }
    }
}

impl DistributionLibrary {
    pub fn remove_vessel_type(mut self, vessel_type: VesselType) -> Self {
        self.types.remove(&vessel_type);
        self
    }

    /// Normalized so the proportions always sum to one.
    pub fn type_proportions(&self) -> Vec<(VesselType, f64)> {
        let total: f64 = self.types.values().map(|t| t.proportion).sum();
        if total <= 0.0 {
            return vec![(FALLBACK_VESSEL_TYPE, 1.0)];
        }
        self.types
            .iter()
            .map(|(k, v)| (*k, v.proportion / total))
            .collect()
    }

    pub fn type_proportion(&self, vessel_type: VesselType) -> f64 {
        self.type_proportions()
            .into_iter()
            .find(|(t, _)| *t == vessel_type)
            .map(|(_, p)| p)
            .unwrap_or(0.0)
    }

    pub fn cumulative_type_proportions(&self) -> Vec<(VesselType, f64)> {
        let mut acc = 0.0;
        self.type_proportions()
            .into_iter()
            .map(|(t, p)| {
                acc += p;
                (t, acc)
            })
            .collect()
    }

    /// Inverse CDF over the cumulative type table, `quantile` in [0, 1).
    pub fn vessel_type_at(&self, quantile: f64) -> VesselType {
        let cumulative = self.cumulative_type_proportions();
        cumulative
            .iter()
            .find(|(_, c)| quantile < *c)
            .or(cumulative.last())
            .map(|(t, _)| *t)
            .unwrap_or(FALLBACK_VESSEL_TYPE)
    }

    pub fn speed_profile(&self, vessel_type: VesselType) -> Result<SpeedProfile, ReferenceDataError> {
        self.types
            .get(&vessel_type)
            .map(|t| t.speed)
            .ok_or_else(|| UnknownVesselTypeSnafu { vessel_type }.build())
    }

    pub fn speed_profile_or_fallback(&self, vessel_type: VesselType) -> SpeedProfile {
        match self.speed_profile(vessel_type) {
            Ok(v) => v,
            Err(e) => {
                warn!("falling back to {FALLBACK_VESSEL_TYPE} speed envelope: {e}");
                self.types
                    .get(&FALLBACK_VESSEL_TYPE)
                    .map(|t| t.speed)
                    .unwrap_or_else(|| default_type_reference(FALLBACK_VESSEL_TYPE).1)
            }
        }
    }

    pub fn type_profile(
        &self,
        vessel_type: VesselType,
    ) -> Result<VesselTypeProfile, ReferenceDataError> {
        self.types
            .get(&vessel_type)
            .map(|t| t.profile)
            .ok_or_else(|| UnknownVesselTypeSnafu { vessel_type }.build())
    }

    pub fn type_profile_or_fallback(&self, vessel_type: VesselType) -> VesselTypeProfile {
        match self.type_profile(vessel_type) {
            Ok(v) => v,
            Err(e) => {
                warn!("falling back to {FALLBACK_VESSEL_TYPE} type profile: {e}");
                self.types
                    .get(&FALLBACK_VESSEL_TYPE)
                    .map(|t| t.profile)
                    .unwrap_or_else(|| default_type_reference(FALLBACK_VESSEL_TYPE).2)
            }
        }
    }

    /// Silent variant used by assessors, which check many records against the ceiling.
    pub fn max_speed(&self, vessel_type: VesselType) -> f64 {
        self.types
            .get(&vessel_type)
            .or_else(|| self.types.get(&FALLBACK_VESSEL_TYPE))
            .map(|t| t.speed.max)
            .unwrap_or_else(|| default_type_reference(FALLBACK_VESSEL_TYPE).1.max)
    }

    pub fn seasonal_multiplier(&self, season: Season) -> f64 {
        self.seasonal.get(season)
    }

    pub fn daily_multiplier(&self, hour: u32) -> f64 {
        if PEAK_HOURS.contains(&hour) {
            PEAK_MULTIPLIER
        } else if LOW_ACTIVITY_HOURS.contains(&hour) {
            LOW_ACTIVITY_MULTIPLIER
        } else {
            1.0
        }
    }

    pub fn is_low_activity(&self, hour: u32) -> bool {
        self.daily_multiplier(hour) < 1.0
    }

    pub fn chokepoints(&self) -> &[Chokepoint] {
        &self.chokepoints
    }

    pub fn flag_states(&self) -> &[FlagProfile] {
        &self.flag_states
    }
}

static DEFAULT_CHOKEPOINTS: &[(&str, f64, f64, f64)] = &[
    ("Strait of Gibraltar", 35.95, -5.6, 300.0),
    ("Dover Strait", 51.0, 1.5, 400.0),
    ("Suez Canal", 30.5, 32.35, 55.0),
    ("Bab el-Mandeb", 12.6, 43.3, 60.0),
    ("Strait of Hormuz", 26.57, 56.25, 100.0),
    ("Strait of Malacca", 2.5, 101.2, 230.0),
    ("Panama Canal", 9.08, -79.68, 38.0),
    ("Bosphorus", 41.12, 29.07, 120.0),
    ("Cape of Good Hope", -34.36, 18.47, 45.0),
    ("Oresund", 55.8, 12.7, 170.0),
];

static DEFAULT_FLAG_STATES: &[FlagProfile] = &[
    flag("Panama", 351, "3E", 0.16),
    flag("Liberia", 636, "A8", 0.14),
    flag("Marshall Islands", 538, "V7", 0.12),
    flag("Hong Kong", 477, "VR", 0.08),
    flag("Singapore", 563, "9V", 0.07),
    flag("Malta", 215, "9H", 0.06),
    flag("Bahamas", 311, "C6", 0.05),
    flag("China", 412, "BP", 0.05),
    flag("Greece", 237, "SV", 0.04),
    flag("Norway", 257, "LA", 0.04),
    flag("United States", 366, "WD", 0.04),
    flag("United Kingdom", 232, "GB", 0.03),
    flag("Cyprus", 212, "5B", 0.03),
    flag("Japan", 431, "7J", 0.03),
    flag("Portugal", 255, "CQ", 0.02),
    flag("Denmark", 219, "OZ", 0.02),
    flag("Canada", 316, "CF", 0.02),
];

const fn flag(name: &'static str, mid: u32, call_sign_prefix: &'static str, weight: f64) -> FlagProfile {
    FlagProfile {
        name,
        mid,
        call_sign_prefix,
        weight,
    }
}

const fn speed(mean: f64, std_dev: f64, min: f64, max: f64) -> SpeedProfile {
    SpeedProfile {
        mean,
        std_dev,
        min,
        max,
    }
}

fn default_type_reference(vessel_type: VesselType) -> (f64, SpeedProfile, VesselTypeProfile) {
    use VesselType::*;

    let general_cargo = VesselTypeProfile {
        length_m: (90.0, 190.0),
        length_to_beam: 6.5,
        draft_m: (6.0, 10.5),
        gross_tonnage: (3_000.0, 25_000.0),
        deadweight_ratio: 1.5,
        crew: (12, 22),
        passengers: (0, 0),
        satellite_probability: 0.7,
        data_demand_gb_month: (30.0, 120.0),
        hazardous_probability: 0.08,
        imo_probability: 0.97,
        destination_probability: 0.9,
        lane_deviation_km: 10.0,
        cargo: &["Steel coils", "Project cargo", "Timber", "Bagged cement", "Machinery"],
    };

    match vessel_type {
        BulkCarrier => (
            0.21,
            speed(12.5, 1.5, 6.0, 16.0),
            VesselTypeProfile {
                length_m: (180.0, 300.0),
                length_to_beam: 6.2,
                draft_m: (10.0, 18.0),
                gross_tonnage: (25_000.0, 105_000.0),
                deadweight_ratio: 1.8,
                crew: (18, 25),
                satellite_probability: 0.8,
                data_demand_gb_month: (40.0, 150.0),
                hazardous_probability: 0.05,
                imo_probability: 0.99,
                destination_probability: 0.92,
                lane_deviation_km: 6.0,
                cargo: &["Iron ore", "Coal", "Grain", "Bauxite", "Soybeans"],
                ..general_cargo
            },
        ),
        ContainerShip => (
            0.12,
            speed(18.0, 2.5, 8.0, 25.0),
            VesselTypeProfile {
                length_m: (200.0, 400.0),
                length_to_beam: 7.0,
                draft_m: (10.0, 16.0),
                gross_tonnage: (30_000.0, 230_000.0),
                deadweight_ratio: 1.1,
                crew: (20, 28),
                satellite_probability: 0.95,
                data_demand_gb_month: (150.0, 500.0),
                hazardous_probability: 0.3,
                imo_probability: 0.99,
                destination_probability: 0.97,
                lane_deviation_km: 5.0,
                cargo: &["Containers", "Reefer containers", "Mixed containers"],
                ..general_cargo
            },
        ),
        OilTanker => (
            0.14,
            speed(13.0, 1.5, 6.0, 17.0),
            VesselTypeProfile {
                length_m: (180.0, 380.0),
                length_to_beam: 5.8,
                draft_m: (11.0, 22.0),
                gross_tonnage: (30_000.0, 160_000.0),
                deadweight_ratio: 1.9,
                crew: (20, 30),
                satellite_probability: 0.9,
                data_demand_gb_month: (80.0, 250.0),
                hazardous_probability: 0.85,
                imo_probability: 0.99,
                destination_probability: 0.93,
                lane_deviation_km: 4.0,
                cargo: &["Crude oil", "Fuel oil", "Diesel", "Naphtha"],
                ..general_cargo
            },
        ),
        ChemicalTanker => (
            0.09,
            speed(13.5, 1.5, 6.0, 17.0),
            VesselTypeProfile {
                length_m: (100.0, 200.0),
                length_to_beam: 5.9,
                draft_m: (7.0, 13.0),
                gross_tonnage: (5_000.0, 30_000.0),
                deadweight_ratio: 1.7,
                crew: (18, 26),
                satellite_probability: 0.85,
                data_demand_gb_month: (60.0, 200.0),
                hazardous_probability: 0.95,
                imo_probability: 0.99,
                destination_probability: 0.93,
                lane_deviation_km: 4.0,
                cargo: &["Methanol", "Caustic soda", "Sulphuric acid", "Vegetable oil"],
                ..general_cargo
            },
        ),
        LngTanker => (
            0.03,
            speed(17.0, 1.5, 10.0, 21.0),
            VesselTypeProfile {
                length_m: (250.0, 345.0),
                length_to_beam: 6.5,
                draft_m: (11.0, 12.5),
                gross_tonnage: (90_000.0, 165_000.0),
                deadweight_ratio: 0.8,
                crew: (25, 35),
                satellite_probability: 0.98,
                data_demand_gb_month: (150.0, 400.0),
                hazardous_probability: 1.0,
                imo_probability: 1.0,
                destination_probability: 0.97,
                lane_deviation_km: 3.0,
                cargo: &["LNG", "LPG"],
                ..general_cargo
            },
        ),
        PassengerFerry => (
            0.04,
            speed(18.0, 3.0, 8.0, 30.0),
            VesselTypeProfile {
                length_m: (60.0, 220.0),
                length_to_beam: 6.0,
                draft_m: (3.0, 7.0),
                gross_tonnage: (2_000.0, 60_000.0),
                deadweight_ratio: 0.3,
                crew: (15, 150),
                passengers: (100, 2_500),
                satellite_probability: 0.9,
                data_demand_gb_month: (300.0, 1_500.0),
                hazardous_probability: 0.02,
                imo_probability: 0.95,
                destination_probability: 0.99,
                lane_deviation_km: 8.0,
                cargo: &["Passengers and vehicles", "Ro-ro freight"],
                ..general_cargo
            },
        ),
        CruiseShip => (
            0.01,
            speed(17.0, 2.5, 8.0, 24.0),
            VesselTypeProfile {
                length_m: (200.0, 362.0),
                length_to_beam: 7.5,
                draft_m: (7.0, 9.5),
                gross_tonnage: (50_000.0, 230_000.0),
                deadweight_ratio: 0.1,
                crew: (800, 2_200),
                passengers: (1_500, 6_500),
                satellite_probability: 0.99,
                data_demand_gb_month: (5_000.0, 25_000.0),
                hazardous_probability: 0.0,
                imo_probability: 1.0,
                destination_probability: 0.99,
                lane_deviation_km: 15.0,
                cargo: &["Passengers"],
                ..general_cargo
            },
        ),
        FishingVessel => (
            0.10,
            speed(7.0, 3.0, 0.0, 14.0),
            VesselTypeProfile {
                length_m: (12.0, 90.0),
                length_to_beam: 4.5,
                draft_m: (2.0, 7.0),
                gross_tonnage: (20.0, 4_000.0),
                deadweight_ratio: 0.8,
                crew: (2, 40),
                satellite_probability: 0.35,
                data_demand_gb_month: (2.0, 40.0),
                hazardous_probability: 0.0,
                imo_probability: 0.4,
                destination_probability: 0.3,
                lane_deviation_km: 45.0,
                cargo: &["Fish", "Frozen fish", "Shellfish"],
                ..general_cargo
            },
        ),
        OffshoreSupply => (
            0.04,
            speed(10.0, 3.0, 0.0, 16.0),
            VesselTypeProfile {
                length_m: (50.0, 100.0),
                length_to_beam: 4.6,
                draft_m: (4.5, 8.0),
                gross_tonnage: (1_500.0, 6_000.0),
                deadweight_ratio: 1.2,
                crew: (10, 30),
                satellite_probability: 0.9,
                data_demand_gb_month: (80.0, 300.0),
                hazardous_probability: 0.2,
                imo_probability: 0.98,
                destination_probability: 0.7,
                lane_deviation_km: 30.0,
                cargo: &["Drilling mud", "Pipe", "Fuel", "Provisions"],
                ..general_cargo
            },
        ),
        DrillingRig => (
            0.01,
            speed(1.0, 1.0, 0.0, 6.0),
            VesselTypeProfile {
                length_m: (80.0, 230.0),
                length_to_beam: 1.5,
                draft_m: (8.0, 24.0),
                gross_tonnage: (15_000.0, 60_000.0),
                deadweight_ratio: 1.0,
                crew: (80, 200),
                satellite_probability: 1.0,
                data_demand_gb_month: (1_000.0, 8_000.0),
                hazardous_probability: 0.5,
                imo_probability: 0.95,
                destination_probability: 0.1,
                lane_deviation_km: 60.0,
                cargo: &["Drilling equipment"],
                ..general_cargo
            },
        ),
        GeneralCargo => (0.16, speed(12.0, 2.0, 5.0, 17.0), general_cargo),
        CarCarrier => (
            0.02,
            speed(17.0, 2.0, 10.0, 22.0),
            VesselTypeProfile {
                length_m: (160.0, 240.0),
                length_to_beam: 6.0,
                draft_m: (8.0, 11.0),
                gross_tonnage: (40_000.0, 75_000.0),
                deadweight_ratio: 0.35,
                crew: (20, 26),
                satellite_probability: 0.9,
                data_demand_gb_month: (80.0, 200.0),
                hazardous_probability: 0.1,
                imo_probability: 1.0,
                destination_probability: 0.97,
                lane_deviation_km: 6.0,
                cargo: &["Cars", "Trucks", "Heavy machinery"],
                ..general_cargo
            },
        ),
        Unknown => (
            0.03,
            speed(12.0, 2.0, 5.0, 17.0),
            VesselTypeProfile {
                imo_probability: 0.5,
                destination_probability: 0.4,
                satellite_probability: 0.4,
                lane_deviation_km: 20.0,
                cargo: &["Unknown"],
                ..general_cargo
            },
        ),
    }
}
