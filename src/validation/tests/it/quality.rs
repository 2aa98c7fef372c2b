use chrono::{Duration, TimeZone, Utc};
use maritime_core::{VesselRecord, VesselRecordBuilder, VesselType};
use std::sync::Arc;
use validation::QualityAssessor;

#[test]
fn test_interval_shrinks_as_population_grows() {
    let assessor = QualityAssessor::new(Arc::default());
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap();

    let small = VesselRecordBuilder::new()
        .add_many(10, |i, v| VesselRecord {
            name: (i % 2 == 0).then(|| "Half Named".into()),
            ..v
        })
        .build();
    let large: Vec<_> = small.iter().cycle().take(1_000).cloned().collect();

    let small = assessor.assess_at(&small, now);
    let large = assessor.assess_at(&large, now);

    assert!((small.completeness - large.completeness).abs() < 1e-9);
    assert!(large.confidence_interval.width() < small.confidence_interval.width());
    assert!(large.uniqueness < small.uniqueness);
}

#[test]
fn test_stale_records_lower_timeliness() {
    let assessor = QualityAssessor::new(Arc::default());
    let vessels = VesselRecordBuilder::new().add_many(4, |_, v| v).build();
    let now = vessels[0].timestamp;

    let fresh = assessor.assess_at(&vessels, now);
    let stale = assessor.assess_at(&vessels, now + Duration::days(2));

    assert_eq!(fresh.timeliness, 100.);
    assert_eq!(stale.timeliness, 20.);
    assert!(stale.overall < fresh.overall);
}

#[test]
fn test_reference_mix_scores_higher_consistency_than_single_type() {
    let assessor = QualityAssessor::new(Arc::default());
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
    let types = [
        VesselType::BulkCarrier,
        VesselType::ContainerShip,
        VesselType::OilTanker,
        VesselType::GeneralCargo,
        VesselType::FishingVessel,
    ];

    let mixed = VesselRecordBuilder::new()
        .add_many(50, |i, v| VesselRecord {
            vessel_type: types[i % types.len()],
            ..v.with_speed(8.)
        })
        .build();
    let single = VesselRecordBuilder::new().add_many(50, |_, v| v).build();

    assert!(
        assessor.assess_at(&mixed, now).consistency > assessor.assess_at(&single, now).consistency
    );
}

#[test]
fn test_assess_measures_timeliness_against_the_clock() {
    let assessor = QualityAssessor::new(Arc::default());
    let vessels = VesselRecordBuilder::new().add_many(3, |_, v| v).build();

    let now = assessor.assess(&vessels);
    let then = assessor.assess_at(&vessels, vessels[0].timestamp);

    assert_eq!(now.timeliness, 20.);
    assert_eq!(then.timeliness, 100.);
    assert_eq!(now.completeness, then.completeness);
    assert_eq!(now.validity, then.validity);
}
