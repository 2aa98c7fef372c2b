use crate::{PopulationStage, PopulationStageId};
use geo::LineString;
use maritime_core::{
    Coordinate, DistributionLibrary, Placement, ReferenceData, SyntheticGenerationConfig,
    VesselRecord, closest_on_line, destination,
};
use rand::{Rng, seq::IndexedRandom};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use std::sync::Arc;
use tracing::{debug, instrument};

pub const LANE_SHARE: f64 = 0.7;
pub const PORT_SHARE: f64 = 0.2;
pub const PORT_MIN_DISTANCE_KM: f64 = 5.0;
pub const PORT_MAX_DISTANCE_KM: f64 = 55.0;
/// Bearings drawn before a vessel is left at its sampled position.
pub const PLACEMENT_ATTEMPTS: usize = 16;

/// Moves sampled vessels onto shipping lanes and into port approaches. Vessels drawn for a lane
/// or a port stay where they were sampled when the bounding box holds no lane or port, or when
/// no placement around it falls inside the box.
#[derive(Debug, Clone)]
pub struct SpatialClusterer {
    library: Arc<DistributionLibrary>,
    reference: Arc<ReferenceData>,
}

impl SpatialClusterer {
    pub fn new(library: Arc<DistributionLibrary>, reference: Arc<ReferenceData>) -> Self {
        Self { library, reference }
    }

    fn to_lane(
        &self,
        vessel: VesselRecord,
        lanes: &[LineString<f64>],
        config: &SyntheticGenerationConfig,
        rng: &mut ChaCha8Rng,
    ) -> VesselRecord {
        let position = vessel.coordinate();
        let Some((_, closest)) = lanes
            .iter()
            .filter_map(|l| closest_on_line(l, &position))
            .min_by(|a, b| a.0.total_cmp(&b.0))
        else {
            return vessel;
        };

        let deviation = self
            .library
            .type_profile_or_fallback(vessel.vessel_type)
            .lane_deviation_km;
        let offset = Normal::new(0., deviation)
            .map(|n| n.sample(rng))
            .unwrap_or(0.)
            .abs();

        place(vessel, &closest, offset, Placement::Lane, config, rng)
    }
}

impl PopulationStage for SpatialClusterer {
    fn stage_id(&self) -> PopulationStageId {
        PopulationStageId::SpatialClustering
    }

    #[instrument(skip_all, fields(stage = %self.stage_id(), vessels = vessels.len()))]
    fn apply(
        &self,
        vessels: Vec<VesselRecord>,
        config: &SyntheticGenerationConfig,
        rng: &mut ChaCha8Rng,
    ) -> Vec<VesselRecord> {
        let lanes: Vec<LineString<f64>> = self
            .reference
            .lanes_within(&config.bounds)
            .into_iter()
            .map(|l| l.line_string())
            .collect();
        let ports = self.reference.ports_within(&config.bounds);
        debug!(
            "clustering around {} lanes and {} ports",
            lanes.len(),
            ports.len()
        );

        vessels
            .into_iter()
            .map(|vessel| {
                let draw: f64 = rng.random();
                if draw < LANE_SHARE {
                    self.to_lane(vessel, &lanes, config, rng)
                } else if draw < LANE_SHARE + PORT_SHARE {
                    match ports.choose(rng) {
                        Some(port) => {
                            let distance =
                                rng.random_range(PORT_MIN_DISTANCE_KM..=PORT_MAX_DISTANCE_KM);
                            place(
                                vessel,
                                &port.coordinate(),
                                distance,
                                Placement::Port,
                                config,
                                rng,
                            )
                        }
                        None => vessel,
                    }
                } else {
                    vessel
                }
            })
            .collect()
    }
}

/// Moves the vessel `distance_km` from `anchor` on a random bearing that lands inside the box.
/// The vessel keeps its sampled position if no drawn bearing does.
fn place(
    vessel: VesselRecord,
    anchor: &Coordinate,
    distance_km: f64,
    placement: Placement,
    config: &SyntheticGenerationConfig,
    rng: &mut ChaCha8Rng,
) -> VesselRecord {
    for _ in 0..PLACEMENT_ATTEMPTS {
        let target = destination(anchor, rng.random_range(0.0..360.), distance_km);
        if config.bounds.contains(target.latitude, target.longitude) {
            return vessel
                .with_position(target.latitude, target.longitude)
                .with_placement(placement);
        }
    }
    vessel
}
