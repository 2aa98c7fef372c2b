use maritime_core::{SyntheticGenerationConfig, VesselRecord};
use rand_chacha::ChaCha8Rng;
use strum::{AsRefStr, Display};

/// One transformation of a sampled population. Stages consume the population and return a new
/// one, randomness comes only from the generator threaded through `apply`.
pub trait PopulationStage: Send + Sync {
    fn stage_id(&self) -> PopulationStageId;

    fn is_enabled(&self, _config: &SyntheticGenerationConfig) -> bool {
        true
    }

    fn apply(
        &self,
        vessels: Vec<VesselRecord>,
        config: &SyntheticGenerationConfig,
        rng: &mut ChaCha8Rng,
    ) -> Vec<VesselRecord>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, AsRefStr)]
pub enum PopulationStageId {
    SpatialClustering = 1,
    TemporalModulation = 2,
    RouteOptimization = 3,
}
