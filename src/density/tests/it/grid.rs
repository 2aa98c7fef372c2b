use chrono::{Duration, TimeZone, Utc};
use density::{DensityGridBuilder, cell_of};
use h3o::Resolution;
use maritime_core::{
    CongestionLevel, DistributionLibrary, VesselRecord, VesselRecordBuilder, VesselType,
};
use std::sync::Arc;

fn builder() -> DensityGridBuilder {
    DensityGridBuilder::new(Arc::new(DistributionLibrary::default()))
}

#[test]
fn test_aggregation_is_idempotent() {
    let start = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
    let vessels = VesselRecordBuilder::new()
        .add_many(200, |i, v| {
            let lat = 40. + (i % 20) as f64 * 0.7;
            let lon = -60. + (i / 20) as f64 * 1.3;
            VesselRecordBuilder::at(lat, lon, start + Duration::minutes(i as i64))(v)
                .with_heading((i * 37 % 360) as f64)
        })
        .build();

    let first = builder().build(&vessels, Resolution::Four);
    let second = builder().build(&vessels, Resolution::Four);

    assert_eq!(first, second);
    assert_eq!(
        first.values().map(|c| c.vessel_count).sum::<u32>(),
        vessels.len() as u32
    );
}

#[test]
fn test_cell_aggregates_type_counts_and_value() {
    let vessels = VesselRecordBuilder::new()
        .add(|v| v)
        .add(|v| VesselRecord {
            vessel_type: VesselType::OilTanker,
            ..v
        })
        .add(|v| v.with_speed(9.))
        .build();

    let grid = builder().build(&vessels, Resolution::Two);
    assert_eq!(grid.len(), 1);

    let cell = grid.values().next().unwrap();
    let expected_cell = cell_of(&vessels[0], Resolution::Two).unwrap();

    assert_eq!(cell.cell, expected_cell);
    assert_eq!(cell.vessel_count, 3);
    assert_eq!(cell.type_counts[&VesselType::ContainerShip], 2);
    assert_eq!(cell.type_counts[&VesselType::OilTanker], 1);
    assert_eq!(cell.mean_speed, Some(13.));
    assert_eq!(cell.economic_value, 3. * 4_500.);
    assert_eq!(cell.data_demand_gb_month, 3. * 250.);
    assert_eq!(cell.confidence, 0.3);
    // Summer
    assert_eq!(cell.seasonal_multiplier, 1.15);
}

#[test]
fn test_dense_cluster_is_severely_congested() {
    let vessels = VesselRecordBuilder::new()
        .add_many(50, |_, v| v)
        .build();

    let grid = builder().build(&vessels, Resolution::Ten);
    let cell = grid.values().next().unwrap();

    // Resolution ten cells are roughly 0.015 km²
    assert_eq!(cell.congestion, CongestionLevel::Severe);
    assert_eq!(cell.confidence, 1.);
}

#[test]
fn test_invalid_resolution_is_a_configuration_error() {
    assert!(builder().build_with_resolution(&[], 16).is_err());
    assert!(builder().build_with_resolution(&[], 5).unwrap().is_empty());
}
