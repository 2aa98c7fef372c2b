use crate::{
    Result,
    error::error::{DensitySnafu, GenerationSnafu},
    settings::CacheSettings,
};
use chrono::{DateTime, Utc};
use density::{DensityGrid, DensityGridBuilder};
use maritime_core::{
    DistributionLibrary, QualityMetrics, ReferenceData, ResultCache, StatisticalValidationReport,
    SyntheticGenerationConfig, VesselRecord, population_fingerprint,
};
use serde::Serialize;
use snafu::ResultExt;
use std::sync::Arc;
use synthesis::SyntheticGenerator;
use tracing::{debug, instrument};
use validation::{QualityAssessor, StatisticalValidator};

const QUALITY_BUCKET_SECONDS: i64 = 60;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticDataset {
    pub vessels: Vec<VesselRecord>,
    /// Absent when the config disables statistical validation.
    pub validation: Option<StatisticalValidationReport>,
    pub metadata: GenerationMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    pub generation_time: DateTime<Utc>,
    pub seed: u64,
    pub config_hash: String,
    /// Attached when the config asks for uncertainty quantification.
    pub quality: Option<QualityMetrics>,
}

/// Entry point for callers, wires the library and reference data into every component and
/// memoizes the expensive results.
pub struct MaritimeEngine {
    assessor: QualityAssessor,
    validator: StatisticalValidator,
    generator: SyntheticGenerator,
    grid: DensityGridBuilder,
    synthetic_cache: ResultCache<(String, u64), Arc<SyntheticDataset>>,
    quality_cache: ResultCache<(String, i64), QualityMetrics>,
}

impl MaritimeEngine {
    pub fn new(
        library: Arc<DistributionLibrary>,
        reference: Arc<ReferenceData>,
        cache: &CacheSettings,
    ) -> Self {
        let ttl = cache.ttl.and_then(|t| chrono::Duration::from_std(t).ok());
        Self {
            assessor: QualityAssessor::new(library.clone()),
            validator: StatisticalValidator::new(library.clone(), reference.clone()),
            generator: SyntheticGenerator::new(library.clone(), reference),
            grid: DensityGridBuilder::new(library),
            synthetic_cache: ResultCache::new(cache.capacity, ttl),
            quality_cache: ResultCache::new(cache.capacity, ttl),
        }
    }

    pub fn assess_quality(&self, vessels: &[VesselRecord]) -> QualityMetrics {
        self.assess_quality_at(vessels, Utc::now())
    }

    /// Results are memoized per population and minute, timeliness drifts with `now`.
    pub fn assess_quality_at(&self, vessels: &[VesselRecord], now: DateTime<Utc>) -> QualityMetrics {
        let Some(fingerprint) = population_fingerprint(vessels) else {
            return self.assessor.assess_at(vessels, now);
        };
        let key = (fingerprint, now.timestamp().div_euclid(QUALITY_BUCKET_SECONDS));

        if let Some(metrics) = self.quality_cache.get_at(&key, now) {
            debug!("quality cache hit");
            return metrics;
        }

        let metrics = self.assessor.assess_at(vessels, now);
        self.quality_cache.insert_at(key, metrics, now);
        metrics
    }

    #[instrument(skip_all, fields(seed = seed))]
    pub fn generate_synthetic(
        &self,
        config: &SyntheticGenerationConfig,
        seed: u64,
    ) -> Result<Arc<SyntheticDataset>> {
        let key = (config.config_hash(), seed);
        if let Some(dataset) = self.synthetic_cache.get(&key) {
            debug!("synthetic cache hit for {}", key.0);
            return Ok(dataset);
        }

        let generation_time = Utc::now();
        let vessels = self
            .generator
            .generate(config, seed)
            .context(GenerationSnafu)?;

        let validation = config
            .statistical_validation
            .then(|| self.validator.validate(&vessels, config));
        let quality = config
            .uncertainty_quantification
            .then(|| self.assessor.assess_at(&vessels, generation_time));

        let dataset = Arc::new(SyntheticDataset {
            vessels,
            validation,
            metadata: GenerationMetadata {
                generation_time,
                seed,
                config_hash: key.0.clone(),
                quality,
            },
        });

        self.synthetic_cache.insert(key, dataset.clone());
        Ok(dataset)
    }

    pub fn build_density_grid(&self, vessels: &[VesselRecord], resolution: u8) -> Result<DensityGrid> {
        self.grid
            .build_with_resolution(vessels, resolution)
            .context(DensitySnafu)
    }

    pub fn validate(
        &self,
        vessels: &[VesselRecord],
        config: &SyntheticGenerationConfig,
    ) -> StatisticalValidationReport {
        self.validator.validate(vessels, config)
    }
}
