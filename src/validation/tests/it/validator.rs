use chrono::{TimeZone, Utc};
use maritime_core::{
    BoundingBox, NavigationStatus, ReferenceData, SyntheticGenerationConfig, TemporalRange,
    VesselRecord, VesselRecordBuilder,
};
use std::sync::Arc;
use validation::{NEUTRAL_SCORE, StatisticalValidator};

fn config(bounds: BoundingBox) -> SyntheticGenerationConfig {
    SyntheticGenerationConfig::new(
        100,
        bounds,
        TemporalRange::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
        )
        .unwrap(),
    )
}

fn validator() -> StatisticalValidator {
    StatisticalValidator::new(Arc::default(), Arc::new(ReferenceData::default_reference()))
}

#[test]
fn test_chokepoint_shares_matching_transits_are_fully_accurate() {
    let bounds = BoundingBox::new(60., 30., 10., -10.).unwrap();
    let vessels = VesselRecordBuilder::new()
        .add_many(30, |i, v| v.with_position(35.95, -5.6 + i as f64 * 0.01))
        .add_many(40, |i, v| v.with_position(51.0, 1.5 + i as f64 * 0.01))
        .build();

    let report = validator().validate(&vessels, &config(bounds));

    assert!((report.route_fidelity.traffic_volume_accuracy - 100.).abs() < 1e-9);
    assert_eq!(report.route_fidelity.chokepoint_congestion_fidelity, 100.);
    assert_eq!(report.spatial_distribution.hotspot_accuracy, 100.);
    assert_eq!(report.sample_size, 70);
}

#[test]
fn test_bounding_box_without_chokepoints_is_neutral() {
    let bounds = BoundingBox::new(60., 30., -30., -60.).unwrap();
    let vessels = VesselRecordBuilder::new()
        .add_many(10, |i, v| v.with_position(45., -45. + i as f64))
        .build();

    let report = validator().validate(&vessels, &config(bounds));

    assert_eq!(report.route_fidelity.traffic_volume_accuracy, NEUTRAL_SCORE);
    assert_eq!(report.route_fidelity.chokepoint_congestion_fidelity, NEUTRAL_SCORE);
}

#[test]
fn test_anchored_vessels_are_excluded_from_speed_fit() {
    let bounds = BoundingBox::new(60., 30., 10., -10.).unwrap();
    let vessels = VesselRecordBuilder::new()
        .add_many(20, |_, v| v)
        .add_many(5, |_, v| {
            v.with_speed(0.1)
                .with_navigation_status(NavigationStatus::AtAnchor)
        })
        .build();

    let report = validator().validate(&vessels, &config(bounds));

    assert_eq!(report.speed_distribution.sample_size, 20);
    assert_eq!(report.speed_distribution.reference_size, 80);
}

#[test]
fn test_unresolvable_destinations_are_not_routed() {
    let bounds = BoundingBox::new(60., 30., 10., -10.).unwrap();
    let vessels = VesselRecordBuilder::new()
        .add_many(6, |_, v| v)
        .add_many(4, |_, mut v: VesselRecord| {
            v.voyage.destination = Some("FOR ORDERS".into());
            v
        })
        .build();

    let report = validator().validate(&vessels, &config(bounds));

    assert_eq!(report.route_fidelity.routed_vessels, 6);
    assert!(report.overall_realism_score >= 0. && report.overall_realism_score <= 100.);
    assert!(report.confidence_level <= 0.99);
}
