use chrono::{TimeZone, Utc};
use maritime_core::{
    BoundingBox, ConfigurationError, DistributionLibrary, ReferenceData, SyntheticGenerationConfig,
    TemporalRange,
};
use std::sync::Arc;
use synthesis::{Error, SyntheticGenerator};
use validation::StatisticalValidator;

fn config(vessel_count_target: u32) -> SyntheticGenerationConfig {
    SyntheticGenerationConfig::new(
        vessel_count_target,
        BoundingBox::new(60., 30., 0., -80.).unwrap(),
        TemporalRange::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap(),
        )
        .unwrap(),
    )
}

fn generator() -> SyntheticGenerator {
    SyntheticGenerator::new(
        Arc::default(),
        Arc::new(ReferenceData::default_reference()),
    )
}

fn validator() -> StatisticalValidator {
    StatisticalValidator::new(
        Arc::default(),
        Arc::new(ReferenceData::default_reference()),
    )
}

#[test]
fn test_same_seed_yields_identical_population() {
    let config = config(300);
    let first = generator().generate(&config, 42).unwrap();
    let second = generator().generate(&config, 42).unwrap();
    let other = generator().generate(&config, 43).unwrap();

    assert_eq!(first, second);
    assert_ne!(first, other);
}

#[test]
fn test_generated_records_stay_within_bounds_and_envelopes() {
    let config = config(2_000);
    let library = DistributionLibrary::default();
    let vessels = generator().generate(&config, 7).unwrap();

    assert_eq!(vessels.len(), 2_000);
    for v in &vessels {
        assert!(config.bounds.contains(v.position.latitude, v.position.longitude));
        assert!(config.temporal_range.contains(v.timestamp));

        let speed = v.speed_over_ground.unwrap();
        assert!(speed >= 0. && speed <= library.max_speed(v.vessel_type));
        assert!((0.0..360.).contains(&v.course_over_ground.unwrap()));
        assert!((0.0..360.).contains(&v.true_heading.unwrap()));
    }
}

#[test]
fn test_type_mix_converges_to_reference_proportions() {
    let config = config(5_000);
    let vessels = generator().generate(&config, 2024).unwrap();

    let fit = validator().vessel_type_fit(&vessels);

    assert!(fit.passed, "{fit:?}");
    assert!(fit.p_value > 0.05);
}

#[test]
fn test_north_atlantic_scenario_is_realistic() {
    let config = config(1_000);
    let vessels = generator().generate(&config, 1).unwrap();

    let report = validator().validate(&vessels, &config);

    assert_eq!(report.sample_size, 1_000);
    assert!(report.vessel_type_distribution.passed);
    assert!(
        report.overall_realism_score > 60.,
        "{}",
        report.overall_realism_score
    );
    assert!(report.confidence_level > 0.6 && report.confidence_level <= 0.99);
}

#[test]
fn test_invalid_bounds_are_rejected() {
    let config = SyntheticGenerationConfig {
        bounds: BoundingBox {
            north: 10.,
            south: 20.,
            east: 0.,
            west: -10.,
        },
        ..config(10)
    };

    let err = generator().generate(&config, 1).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    assert!(matches!(
        err,
        synthesis::error::Error::Configuration {
            source: ConfigurationError::InvalidBoundingBox { .. },
            ..
        }
    ));
}
