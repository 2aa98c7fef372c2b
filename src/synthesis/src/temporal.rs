use crate::{PopulationStage, PopulationStageId};
use chrono::Timelike;
use maritime_core::{
    DistributionLibrary, NavigationStatus, Season, SyntheticGenerationConfig, VesselRecord,
    normalize_degrees,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Probability that an underway vessel drops anchor during low activity hours.
pub const ANCHORING_PROBABILITY: f64 = 0.65;
pub const ANCHORED_SPEED_FACTOR: f64 = 0.1;

/// Scales speeds by the season and hour of each record's timestamp. Speeds are always recomputed
/// from the sampled base speed and never compound across applications.
#[derive(Debug, Clone)]
pub struct TemporalModulator {
    library: Arc<DistributionLibrary>,
}

impl TemporalModulator {
    pub fn new(library: Arc<DistributionLibrary>) -> Self {
        Self { library }
    }

    /// Combined seasonal and daily factor for the record's timestamp.
    pub fn modulation(&self, vessel: &VesselRecord) -> f64 {
        self.library.seasonal_multiplier(Season::of(vessel.timestamp))
            * self.library.daily_multiplier(vessel.timestamp.hour())
    }

    fn modulate(
        &self,
        mut vessel: VesselRecord,
        config: &SyntheticGenerationConfig,
        rng: &mut ChaCha8Rng,
    ) -> VesselRecord {
        let hour = vessel.timestamp.hour();
        let max_speed = self.library.max_speed(vessel.vessel_type);

        if let Some(base) = vessel.base_speed() {
            let mut speed = base * self.modulation(&vessel);

            if self.library.is_low_activity(hour) {
                let anchored = match vessel.navigation_status {
                    Some(NavigationStatus::AtAnchor) => true,
                    Some(status) if status.is_stationary() => false,
                    _ => rng.random_bool(ANCHORING_PROBABILITY),
                };
                if anchored {
                    vessel.navigation_status = Some(NavigationStatus::AtAnchor);
                    speed *= ANCHORED_SPEED_FACTOR;
                }
            }

            vessel.speed_over_ground = Some(speed.clamp(0., max_speed));
        }

        if config.seasonal_modeling {
            let amplitude = weather_amplitude(Season::of(vessel.timestamp))
                * (0.5 + vessel.position.latitude.abs() / 90.);
            let offset = rng.random_range(-amplitude..=amplitude);
            vessel.course_over_ground = vessel
                .course_over_ground
                .map(|c| normalize_degrees(c + offset));
            vessel.true_heading = vessel.true_heading.map(|h| normalize_degrees(h + offset));
        }

        vessel
    }
}

impl PopulationStage for TemporalModulator {
    fn stage_id(&self) -> PopulationStageId {
        PopulationStageId::TemporalModulation
    }

    #[instrument(skip_all, fields(stage = %self.stage_id(), vessels = vessels.len()))]
    fn apply(
        &self,
        vessels: Vec<VesselRecord>,
        config: &SyntheticGenerationConfig,
        rng: &mut ChaCha8Rng,
    ) -> Vec<VesselRecord> {
        let vessels: Vec<VesselRecord> = vessels
            .into_iter()
            .map(|v| self.modulate(v, config, rng))
            .collect();

        debug!(
            "{} vessels at anchor after modulation",
            vessels
                .iter()
                .filter(|v| v.navigation_status == Some(NavigationStatus::AtAnchor))
                .count()
        );
        vessels
    }
}

/// Half-width in degrees of the weather routing offset at the equator.
fn weather_amplitude(season: Season) -> f64 {
    match season {
        Season::Winter => 10.,
        Season::Autumn => 7.,
        Season::Spring => 5.,
        Season::Summer => 3.,
    }
}
