use chrono::{TimeZone, Utc};
use engine::{MaritimeEngine, settings::CacheSettings};
use maritime_core::{BoundingBox, ReferenceData, SyntheticGenerationConfig, TemporalRange};
use std::sync::Arc;

fn engine() -> MaritimeEngine {
    MaritimeEngine::new(
        Arc::default(),
        Arc::new(ReferenceData::default_reference()),
        &CacheSettings::default(),
    )
}

fn scenario() -> SyntheticGenerationConfig {
    SyntheticGenerationConfig::new(
        1_000,
        BoundingBox::new(60., 30., 0., -80.).unwrap(),
        TemporalRange::new(
            Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap(),
        )
        .unwrap(),
    )
}

#[test]
fn test_independent_engines_generate_identical_datasets() {
    let a = engine().generate_synthetic(&scenario(), 77).unwrap();
    let b = engine().generate_synthetic(&scenario(), 77).unwrap();

    assert_eq!(a.vessels, b.vessels);
    assert_eq!(a.metadata.config_hash, b.metadata.config_hash);
    assert_eq!(a.validation, b.validation);
}

#[test]
fn test_generated_scenario_passes_validation() {
    let dataset = engine().generate_synthetic(&scenario(), 5).unwrap();
    let report = dataset.validation.as_ref().unwrap();

    assert!(report.vessel_type_distribution.passed);
    assert!(
        report.overall_realism_score > 60.,
        "{}",
        report.overall_realism_score
    );
}

#[test]
fn test_standalone_validation_matches_generation_report() {
    let engine = engine();
    let dataset = engine.generate_synthetic(&scenario(), 3).unwrap();

    let report = engine.validate(&dataset.vessels, &scenario());

    assert_eq!(Some(report), dataset.validation);
}

#[test]
fn test_density_grid_is_idempotent() {
    let engine = engine();
    let dataset = engine.generate_synthetic(&scenario(), 8).unwrap();

    let first = engine.build_density_grid(&dataset.vessels, 5).unwrap();
    let second = engine.build_density_grid(&dataset.vessels, 5).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first.values().map(|c| c.vessel_count as usize).sum::<usize>(),
        dataset.vessels.len()
    );
}

#[test]
fn test_invalid_resolution_is_rejected() {
    let engine = engine();
    assert!(engine.build_density_grid(&[], 16).is_err());
}

#[test]
fn test_quality_of_generated_population_is_high() {
    let engine = engine();
    let dataset = engine.generate_synthetic(&scenario(), 12).unwrap();

    let metrics = engine.assess_quality(&dataset.vessels);

    assert_eq!(metrics.uniqueness, 100.);
    assert_eq!(metrics.accuracy, 100.);
    assert!(metrics.validity > 99.);
    assert!(metrics.completeness > 80.);
}
