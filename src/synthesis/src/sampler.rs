use chrono::{DateTime, Duration, Utc};
use maritime_core::{
    CallSign, Communications, DistributionLibrary, EconomicValue, FlagProfile, ImoNumber,
    KNOTS_TO_KM_PER_HOUR, Mmsi, NavigationStatus, Placement, Position, ReferenceData,
    STATIONARY_SPEED_KNOTS, SatelliteEquipment, SpeedProfile, SyntheticGenerationConfig,
    SyntheticProvenance, ValueTier, VesselRecord, VesselSpecifications, VesselType,
    VesselTypeProfile, Voyage, distance_km, normalize_degrees,
};
use rand::{
    Rng,
    seq::{IndexedRandom, SliceRandom},
};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use std::sync::Arc;
use tracing::{debug, instrument};

/// AIS convention for a vessel awaiting routing instructions.
pub const FOR_ORDERS: &str = "FOR ORDERS";

const FOR_ORDERS_PROBABILITY: f64 = 0.3;
const FISHING_PROBABILITY: f64 = 0.6;
const HEADING_NOISE_DEGREES: f64 = 5.0;
const MAX_RATE_OF_TURN: f64 = 5.0;
/// Multiplier coprime with the station space, keeps station numbers distinct per population.
const STATION_STRIDE: u32 = 7_919;
const STATION_SPACE: u32 = 1_000_000;
const CALL_SIGN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

const NAME_PREFIXES: &[&str] = &[
    "NORDIC", "ATLANTIC", "OCEAN", "PACIFIC", "GOLDEN", "SILVER", "NORTHERN", "EASTERN", "MARE",
    "STELLA", "BLUE", "CAPE",
];
const NAME_SUFFIXES: &[&str] = &[
    "STAR", "SPIRIT", "PRIDE", "TRADER", "VOYAGER", "EXPRESS", "FORTUNE", "HORIZON", "PIONEER",
    "WAVE", "GLORY", "BREEZE",
];

/// Draws a population whose type mix and speeds follow the distribution library. Every field
/// other than type, position and timestamp is derived from the type's lookup tables so that
/// cross-field correlations hold.
#[derive(Debug, Clone)]
pub struct VesselSampler {
    library: Arc<DistributionLibrary>,
    reference: Arc<ReferenceData>,
}

impl VesselSampler {
    pub fn new(library: Arc<DistributionLibrary>, reference: Arc<ReferenceData>) -> Self {
        Self { library, reference }
    }

    #[instrument(skip_all, fields(vessels = config.vessel_count_target))]
    pub fn sample(
        &self,
        config: &SyntheticGenerationConfig,
        rng: &mut ChaCha8Rng,
    ) -> Vec<VesselRecord> {
        let amount = config.vessel_count_target as usize;
        let types = self.vessel_types(amount, rng);
        let station_offset = rng.random_range(0..STATION_SPACE);

        let vessels: Vec<VesselRecord> = types
            .into_iter()
            .enumerate()
            .map(|(i, vessel_type)| {
                let station = station_offset.wrapping_add((i as u32).wrapping_mul(STATION_STRIDE))
                    % STATION_SPACE;
                self.sample_vessel(vessel_type, station, config, rng)
            })
            .collect();

        debug!("sampled {} vessels", vessels.len());
        vessels
    }

    /// Stratified inverse-CDF draws: vessel `i` takes quantile `(i + u) / n` for one shared
    /// uniform `u`, then the order is shuffled. Type counts stay within one vessel of their
    /// expectation, so the chi-square fit of a generated population sits near zero instead of
    /// varying with sampling noise.
    pub fn vessel_types(&self, amount: usize, rng: &mut ChaCha8Rng) -> Vec<VesselType> {
        let offset: f64 = rng.random();
        let mut types: Vec<VesselType> = (0..amount)
            .map(|i| {
                self.library
                    .vessel_type_at((i as f64 + offset) / amount as f64)
            })
            .collect();
        types.shuffle(rng);
        types
    }

    fn sample_vessel(
        &self,
        vessel_type: VesselType,
        station: u32,
        config: &SyntheticGenerationConfig,
        rng: &mut ChaCha8Rng,
    ) -> VesselRecord {
        let profile = self.library.type_profile_or_fallback(vessel_type);
        let speed_profile = self.library.speed_profile_or_fallback(vessel_type);
        let flag = self
            .library
            .flag_states()
            .choose_weighted(rng, |f| f.weight)
            .ok()
            .copied();

        let bounds = &config.bounds;
        let position = Position {
            latitude: rng.random_range(bounds.south..=bounds.north),
            longitude: rng.random_range(bounds.west..=bounds.east),
            horizontal_accuracy: Some(rng.random_range(2.0..=30.0)),
        };
        let range = &config.temporal_range;
        let offset_ms = rng.random_range(0..=range.duration().num_milliseconds().max(0));
        let timestamp = range.start() + Duration::milliseconds(offset_ms);

        let speed = sample_speed(&speed_profile, rng);
        let navigation_status = if speed < STATIONARY_SPEED_KNOTS {
            if rng.random_bool(0.5) {
                NavigationStatus::Moored
            } else {
                NavigationStatus::AtAnchor
            }
        } else if vessel_type == VesselType::FishingVessel && rng.random_bool(FISHING_PROBABILITY)
        {
            NavigationStatus::EngagedInFishing
        } else {
            NavigationStatus::UnderWayUsingEngine
        };

        let course: f64 = rng.random_range(0.0..360.0);
        let heading = normalize_degrees(
            course + rng.random_range(-HEADING_NOISE_DEGREES..=HEADING_NOISE_DEGREES),
        );

        let size = rng.random::<f64>();
        let length_m = lerp(profile.length_m, size);
        let gross_tonnage = lerp(profile.gross_tonnage, size);
        let specifications = VesselSpecifications {
            length_m,
            beam_m: length_m / profile.length_to_beam,
            draft_m: lerp(profile.draft_m, size),
            gross_tonnage,
            deadweight: gross_tonnage * profile.deadweight_ratio,
        };

        let crew = rng.random_range(profile.crew.0..=profile.crew.1);
        let passengers = rng.random_range(profile.passengers.0..=profile.passengers.1);
        let voyage = self.voyage(&profile, &position, timestamp, speed, crew + passengers, rng);

        let satellite_probability = profile.satellite_probability.clamp(0., 1.);
        let satellite = SatelliteEquipment {
            vsat: rng.random_bool(satellite_probability),
            fleet_broadband: rng.random_bool(satellite_probability),
            iridium: rng.random_bool(satellite_probability / 2.),
        };
        let communications = Communications {
            satellite,
            data_demand_gb_month: lerp(profile.data_demand_gb_month, rng.random()),
        };

        VesselRecord {
            mmsi: Mmsi::from_mid(flag.map(|f| f.mid).unwrap_or_default(), station),
            imo_number: rng
                .random_bool(profile.imo_probability.clamp(0., 1.))
                .then(|| ImoNumber::from_serial(rng.random_range(0..900_000))),
            call_sign: flag.map(|f| call_sign(&f, rng)),
            name: Some(vessel_name(rng)),
            flag_state: flag.map(|f| f.name.to_string()),
            position,
            timestamp,
            speed_over_ground: Some(speed),
            course_over_ground: Some(course),
            true_heading: Some(heading),
            rate_of_turn: Some(rng.random_range(-MAX_RATE_OF_TURN..=MAX_RATE_OF_TURN)),
            navigation_status: Some(navigation_status),
            vessel_type,
            specifications: Some(specifications),
            value: Some(economic_value(
                &specifications,
                voyage.persons_aboard.unwrap_or(0),
                &communications,
            )),
            voyage,
            communications: Some(communications),
            provenance: Some(SyntheticProvenance {
                base_speed: speed,
                placement: Placement::Uniform,
            }),
        }
    }

    fn voyage(
        &self,
        profile: &VesselTypeProfile,
        position: &Position,
        timestamp: DateTime<Utc>,
        speed: f64,
        persons_aboard: u32,
        rng: &mut ChaCha8Rng,
    ) -> Voyage {
        let port = if rng.random_bool(profile.destination_probability.clamp(0., 1.)) {
            self.reference.ports.choose(rng)
        } else {
            None
        };

        let destination = match port {
            Some(port) => Some(port.name.clone()),
            None => rng
                .random_bool(FOR_ORDERS_PROBABILITY)
                .then(|| FOR_ORDERS.to_string()),
        };

        let eta = port
            .filter(|_| speed >= STATIONARY_SPEED_KNOTS)
            .map(|port| {
                let km = distance_km(&position.coordinate(), &port.coordinate());
                let hours = km / (speed * KNOTS_TO_KM_PER_HOUR);
                timestamp + Duration::seconds((hours * 3_600.) as i64)
            });

        Voyage {
            destination,
            eta,
            cargo: profile.cargo.choose(rng).map(|c| c.to_string()),
            hazardous_cargo: rng.random_bool(profile.hazardous_probability.clamp(0., 1.)),
            persons_aboard: Some(persons_aboard),
        }
    }
}

/// Normal draw clipped to the type's envelope.
pub fn sample_speed(profile: &SpeedProfile, rng: &mut ChaCha8Rng) -> f64 {
    let raw = Normal::new(profile.mean, profile.std_dev)
        .map(|n| n.sample(rng))
        .unwrap_or(profile.mean);
    profile.clip(raw)
}

/// Scores tonnage, persons aboard, satellite equipment and data demand, 25 points each.
pub fn economic_value(
    specifications: &VesselSpecifications,
    persons_aboard: u32,
    communications: &Communications,
) -> EconomicValue {
    let satellite = &communications.satellite;
    let installed = [satellite.vsat, satellite.fleet_broadband, satellite.iridium]
        .into_iter()
        .filter(|s| *s)
        .count();

    let score = 25. * (specifications.gross_tonnage / 100_000.).min(1.)
        + 25. * (persons_aboard as f64 / 500.).min(1.)
        + 25. * installed as f64 / 3.
        + 25. * (communications.data_demand_gb_month / 400.).min(1.);
    let score = score.clamp(0., 100.);
    let tier = ValueTier::from_score(score);

    let (price_per_gb, base_fee) = match tier {
        ValueTier::Premium => (12., 1_500.),
        ValueTier::Standard => (8., 600.),
        ValueTier::Basic => (5., 150.),
    };

    EconomicValue {
        score,
        tier,
        monthly_revenue_potential: communications.data_demand_gb_month * price_per_gb + base_fee,
    }
}

fn call_sign(flag: &FlagProfile, rng: &mut ChaCha8Rng) -> CallSign {
    let length = rng.random_range(4..=7).max(flag.call_sign_prefix.len() + 1);
    let mut value = flag.call_sign_prefix.to_string();
    while value.len() < length {
        value.push(CALL_SIGN_ALPHABET[rng.random_range(0..CALL_SIGN_ALPHABET.len())] as char);
    }
    CallSign::new_unchecked(value)
}

fn vessel_name(rng: &mut ChaCha8Rng) -> String {
    let prefix = NAME_PREFIXES.choose(rng).copied().unwrap_or("OCEAN");
    let suffix = NAME_SUFFIXES.choose(rng).copied().unwrap_or("STAR");
    format!("{prefix} {suffix}")
}

fn lerp((low, high): (f64, f64), t: f64) -> f64 {
    low + (high - low) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use maritime_core::{BoundingBox, TemporalRange};
    use rand::SeedableRng;
    use std::collections::{BTreeMap, HashSet};

    fn config(amount: u32) -> SyntheticGenerationConfig {
        SyntheticGenerationConfig::new(
            amount,
            BoundingBox::new(60., 30., 0., -80.).unwrap(),
            TemporalRange::new(
                Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap(),
            )
            .unwrap(),
        )
    }

    fn sampler() -> VesselSampler {
        VesselSampler::new(Arc::default(), Arc::new(ReferenceData::default_reference()))
    }

    #[test]
    fn test_type_counts_stay_within_one_of_expectation() {
        let library = DistributionLibrary::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let types = sampler().vessel_types(1_000, &mut rng);

        let mut counts: BTreeMap<VesselType, usize> = BTreeMap::new();
        for t in types {
            *counts.entry(t).or_default() += 1;
        }

        for (vessel_type, p) in library.type_proportions() {
            let observed = counts.get(&vessel_type).copied().unwrap_or(0) as f64;
            assert!((observed - p * 1_000.).abs() <= 1.5, "{vessel_type}: {observed}");
        }
    }

    #[test]
    fn test_sampled_records_respect_config_and_envelopes() {
        let config = config(500);
        let library = DistributionLibrary::default();
        let vessels = sampler().sample(&config, &mut ChaCha8Rng::seed_from_u64(1));

        assert_eq!(vessels.len(), 500);
        for v in &vessels {
            let profile = library.speed_profile(v.vessel_type).unwrap();
            let speed = v.speed_over_ground.unwrap();
            assert!(config.bounds.contains(v.position.latitude, v.position.longitude));
            assert!(config.temporal_range.contains(v.timestamp));
            assert!(speed >= profile.min && speed <= profile.max);
            assert!((0.0..360.).contains(&v.course_over_ground.unwrap()));
            assert!((0.0..360.).contains(&v.true_heading.unwrap()));
            assert!(v.mmsi.is_valid());
            assert!(v.imo_number.is_none_or(|imo| imo.is_valid()));
            assert!(v.call_sign.as_ref().is_some_and(|c| c.is_valid()));
            assert_eq!(v.base_speed(), Some(speed));
        }
    }

    #[test]
    fn test_identities_are_unique() {
        let vessels = sampler().sample(&config(2_000), &mut ChaCha8Rng::seed_from_u64(3));
        let unique: HashSet<_> = vessels.iter().map(|v| v.mmsi).collect();
        assert_eq!(unique.len(), vessels.len());
    }

    #[test]
    fn test_cruise_ships_carry_more_people_than_tankers() {
        let vessels = sampler().sample(&config(2_000), &mut ChaCha8Rng::seed_from_u64(5));
        let persons = |t: VesselType| {
            vessels
                .iter()
                .filter(|v| v.vessel_type == t)
                .filter_map(|v| v.voyage.persons_aboard)
                .min()
        };

        assert!(persons(VesselType::CruiseShip) > persons(VesselType::OilTanker).map(|p| p * 10));
    }

    #[test]
    fn test_value_tier_follows_score() {
        let specifications = VesselSpecifications {
            length_m: 330.,
            beam_m: 45.,
            draft_m: 14.,
            gross_tonnage: 150_000.,
            deadweight: 160_000.,
        };
        let communications = Communications {
            satellite: SatelliteEquipment {
                vsat: true,
                fleet_broadband: true,
                iridium: true,
            },
            data_demand_gb_month: 400.,
        };

        let value = economic_value(&specifications, 20, &communications);

        assert_eq!(value.tier, ValueTier::Premium);
        assert_eq!(value.monthly_revenue_potential, 400. * 12. + 1_500.);
    }
}
