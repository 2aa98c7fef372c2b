use crate::{
    PopulationStage, Result, RouteOptimizer, SpatialClusterer, TemporalModulator, VesselSampler,
    error::error::ConfigurationSnafu,
};
use maritime_core::{DistributionLibrary, ReferenceData, SyntheticGenerationConfig, VesselRecord};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snafu::ResultExt;
use std::sync::Arc;
use tracing::{info, instrument};

/// Samples a population and runs it through an ordered list of stages. All randomness flows
/// from a single generator seeded by the caller, so a config and seed always yield the same
/// population.
pub struct SyntheticGenerator {
    sampler: VesselSampler,
    stages: Vec<Box<dyn PopulationStage>>,
}

impl SyntheticGenerator {
    /// Clustering, then temporal modulation, then routing.
    pub fn new(library: Arc<DistributionLibrary>, reference: Arc<ReferenceData>) -> Self {
        let stages: Vec<Box<dyn PopulationStage>> = vec![
            Box::new(SpatialClusterer::new(library.clone(), reference.clone())),
            Box::new(TemporalModulator::new(library.clone())),
            Box::new(RouteOptimizer::new(reference.clone())),
        ];
        Self::with_stages(VesselSampler::new(library, reference), stages)
    }

    pub fn with_stages(sampler: VesselSampler, stages: Vec<Box<dyn PopulationStage>>) -> Self {
        Self { sampler, stages }
    }

    #[instrument(skip_all, fields(vessels = config.vessel_count_target, seed = seed))]
    pub fn generate(
        &self,
        config: &SyntheticGenerationConfig,
        seed: u64,
    ) -> Result<Vec<VesselRecord>> {
        config.validate().context(ConfigurationSnafu)?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut vessels = self.sampler.sample(config, &mut rng);

        for stage in &self.stages {
            if stage.is_enabled(config) {
                vessels = stage.apply(vessels, config, &mut rng);
            } else {
                info!("skipping disabled stage {}", stage.stage_id());
            }
        }

        info!("generated {} synthetic vessels", vessels.len());
        Ok(vessels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, PopulationStageId};
    use chrono::{TimeZone, Utc};
    use maritime_core::{BoundingBox, ConfigurationError, TemporalRange};
    use std::sync::Mutex;

    struct Recording {
        id: PopulationStageId,
        log: Arc<Mutex<Vec<PopulationStageId>>>,
    }

    impl PopulationStage for Recording {
        fn stage_id(&self) -> PopulationStageId {
            self.id
        }

        fn is_enabled(&self, config: &SyntheticGenerationConfig) -> bool {
            self.id != PopulationStageId::RouteOptimization || config.route_optimization
        }

        fn apply(
            &self,
            vessels: Vec<VesselRecord>,
            _config: &SyntheticGenerationConfig,
            _rng: &mut ChaCha8Rng,
        ) -> Vec<VesselRecord> {
            self.log.lock().unwrap().push(self.id);
            vessels
        }
    }

    fn config() -> SyntheticGenerationConfig {
        SyntheticGenerationConfig::new(
            10,
            BoundingBox::new(60., 30., 0., -80.).unwrap(),
            TemporalRange::new(
                Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap(),
            )
            .unwrap(),
        )
    }

    fn recording() -> (SyntheticGenerator, Arc<Mutex<Vec<PopulationStageId>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let stages: Vec<Box<dyn PopulationStage>> = [
            PopulationStageId::SpatialClustering,
            PopulationStageId::TemporalModulation,
            PopulationStageId::RouteOptimization,
        ]
        .into_iter()
        .map(|id| {
            Box::new(Recording {
                id,
                log: log.clone(),
            }) as Box<dyn PopulationStage>
        })
        .collect();
        let sampler = VesselSampler::new(Arc::default(), Arc::default());
        (SyntheticGenerator::with_stages(sampler, stages), log)
    }

    #[test]
    fn test_stages_run_in_order() {
        let (generator, log) = recording();
        generator.generate(&config(), 1).unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                PopulationStageId::SpatialClustering,
                PopulationStageId::TemporalModulation,
                PopulationStageId::RouteOptimization,
            ]
        );
    }

    #[test]
    fn test_disabled_stage_is_skipped() {
        let (generator, log) = recording();
        let config = SyntheticGenerationConfig {
            route_optimization: false,
            ..config()
        };
        generator.generate(&config, 1).unwrap();
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_zero_vessels_is_rejected_before_sampling() {
        let (generator, log) = recording();
        let config = SyntheticGenerationConfig {
            vessel_count_target: 0,
            ..config()
        };

        let err = generator.generate(&config, 1).unwrap_err();

        assert!(matches!(
            err,
            Error::Configuration {
                source: ConfigurationError::NonPositiveVesselCount { .. },
                ..
            }
        ));
        assert!(log.lock().unwrap().is_empty());
    }
}
