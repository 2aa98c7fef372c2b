use crate::total_variation_distance;
use chrono::{DateTime, Duration, Utc};
use itertools::Itertools;
use maritime_core::{DistributionLibrary, NavigationStatus, QualityMetrics, VesselRecord, VesselType};
use std::{collections::BTreeMap, sync::Arc};
use tracing::{debug, instrument};

/// Number of fields checked when scoring completeness.
pub const REQUIRED_FIELDS: usize = 15;

const TYPE_AGREEMENT_WEIGHT: f64 = 0.6;
const SPEED_CEILING_WEIGHT: f64 = 0.4;

/// Scores any vessel population, observed or synthetic, on six quality dimensions.
#[derive(Debug, Clone)]
pub struct QualityAssessor {
    library: Arc<DistributionLibrary>,
}

impl QualityAssessor {
    pub fn new(library: Arc<DistributionLibrary>) -> Self {
        Self { library }
    }

    pub fn assess(&self, vessels: &[VesselRecord]) -> QualityMetrics {
        self.assess_at(vessels, Utc::now())
    }

    /// Timeliness is measured relative to `now`.
    #[instrument(skip_all, fields(vessels = vessels.len()))]
    pub fn assess_at(&self, vessels: &[VesselRecord], now: DateTime<Utc>) -> QualityMetrics {
        if vessels.is_empty() {
            debug!("empty population, returning degraded quality metrics");
            return QualityMetrics::empty();
        }

        let completeness = percent_mean(vessels, |v| {
            populated_fields(v) as f64 / REQUIRED_FIELDS as f64
        });
        let accuracy = percent_mean(vessels, |v| self.is_accurate(v) as u8 as f64);
        let consistency = self.consistency(vessels);
        let timeliness = vessels.iter().map(|v| timeliness(v, now)).sum::<f64>()
            / vessels.len() as f64;
        let validity = percent_mean(vessels, identity_validity);
        let uniqueness = vessels.iter().map(|v| v.mmsi).unique().count() as f64
            / vessels.len() as f64
            * 100.;

        QualityMetrics::new(
            completeness,
            accuracy,
            consistency,
            timeliness,
            validity,
            uniqueness,
            vessels.len(),
        )
    }

    fn is_accurate(&self, vessel: &VesselRecord) -> bool {
        let in_degrees = |v: Option<f64>| v.is_none_or(|v| (0.0..360.).contains(&v));

        vessel.position.is_valid()
            && vessel
                .speed_over_ground
                .is_none_or(|s| s >= 0. && s <= self.library.max_speed(vessel.vessel_type))
            && in_degrees(vessel.course_over_ground)
            && in_degrees(vessel.true_heading)
    }

    fn consistency(&self, vessels: &[VesselRecord]) -> f64 {
        let mut counts: BTreeMap<VesselType, usize> = BTreeMap::new();
        for v in vessels {
            *counts.entry(v.vessel_type).or_default() += 1;
        }

        let reference: BTreeMap<VesselType, f64> =
            self.library.type_proportions().into_iter().collect();
        let types: Vec<VesselType> = counts.keys().chain(reference.keys()).copied().unique().collect();

        let n = vessels.len() as f64;
        let observed: Vec<f64> = types
            .iter()
            .map(|t| counts.get(t).copied().unwrap_or(0) as f64 / n)
            .collect();
        let expected: Vec<f64> = types
            .iter()
            .map(|t| reference.get(t).copied().unwrap_or(0.))
            .collect();
        let type_agreement = (1. - total_variation_distance(&observed, &expected)) * 100.;

        let (within, reported) = vessels
            .iter()
            .filter_map(|v| v.speed_over_ground.map(|s| (v.vessel_type, s)))
            .fold((0, 0), |(within, reported), (t, s)| {
                (
                    within + (s <= self.library.max_speed(t)) as usize,
                    reported + 1,
                )
            });
        let speed_conformance = if reported == 0 {
            100.
        } else {
            within as f64 / reported as f64 * 100.
        };

        TYPE_AGREEMENT_WEIGHT * type_agreement + SPEED_CEILING_WEIGHT * speed_conformance
    }
}

/// Count of populated fields out of [`REQUIRED_FIELDS`].
pub fn populated_fields(vessel: &VesselRecord) -> usize {
    let non_empty = |s: &Option<String>| s.as_deref().is_some_and(|s| !s.trim().is_empty());

    [
        vessel.mmsi.into_inner() != 0,
        vessel.imo_number.is_some(),
        vessel.call_sign.is_some(),
        non_empty(&vessel.name),
        non_empty(&vessel.flag_state),
        vessel.position.latitude.is_finite() && vessel.position.longitude.is_finite(),
        vessel.timestamp.timestamp() != 0,
        vessel.speed_over_ground.is_some(),
        vessel.course_over_ground.is_some(),
        vessel.true_heading.is_some(),
        vessel
            .navigation_status
            .is_some_and(|s| s != NavigationStatus::NotDefined),
        vessel.vessel_type != VesselType::Unknown,
        vessel.specifications.is_some(),
        non_empty(&vessel.voyage.destination),
        vessel.value.is_some(),
    ]
    .into_iter()
    .filter(|populated| *populated)
    .count()
}

fn timeliness(vessel: &VesselRecord, now: DateTime<Utc>) -> f64 {
    let age = now - vessel.timestamp;
    if age <= Duration::minutes(5) {
        100.
    } else if age <= Duration::minutes(30) {
        80.
    } else if age <= Duration::hours(1) {
        60.
    } else if age <= Duration::hours(3) {
        40.
    } else {
        20.
    }
}

/// Share of the identity fields present on the record that are well formed.
fn identity_validity(vessel: &VesselRecord) -> f64 {
    let checks = [
        Some(vessel.mmsi.is_valid()),
        vessel.imo_number.map(|v| v.is_valid()),
        vessel.call_sign.as_ref().map(|v| v.is_valid()),
    ];
    let (valid, present) = checks
        .iter()
        .flatten()
        .fold((0, 0), |(valid, present), ok| (valid + *ok as u32, present + 1));

    valid as f64 / present as f64
}

fn percent_mean(vessels: &[VesselRecord], score: impl Fn(&VesselRecord) -> f64) -> f64 {
    vessels.iter().map(score).sum::<f64>() / vessels.len() as f64 * 100.
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use maritime_core::{CallSign, ImoNumber, Mmsi, VesselRecordBuilder};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn assessor() -> QualityAssessor {
        QualityAssessor::new(Arc::default())
    }

    #[test]
    fn test_empty_population_is_degraded_not_an_error() {
        let metrics = assessor().assess_at(&[], now());
        assert_eq!(metrics, QualityMetrics::empty());
        assert_eq!(metrics.confidence_interval.width(), 0.);
    }

    #[test]
    fn test_fully_populated_record_is_complete() {
        assert_eq!(populated_fields(&VesselRecord::test_default(257_000_000)), REQUIRED_FIELDS);
    }

    #[test]
    fn test_removing_any_field_decreases_completeness() {
        let full = VesselRecord::test_default(257_000_000);
        let baseline = assessor().assess_at(&[full.clone()], now()).completeness;

        let removals: Vec<fn(VesselRecord) -> VesselRecord> = vec![
            |v| VesselRecord { imo_number: None, ..v },
            |v| VesselRecord { call_sign: None, ..v },
            |v| VesselRecord { name: None, ..v },
            |v| VesselRecord { flag_state: None, ..v },
            |v| VesselRecord { speed_over_ground: None, ..v },
            |v| VesselRecord { course_over_ground: None, ..v },
            |v| VesselRecord { true_heading: None, ..v },
            |v| VesselRecord { navigation_status: None, ..v },
            |v| VesselRecord { vessel_type: VesselType::Unknown, ..v },
            |v| VesselRecord { specifications: None, ..v },
            |v| VesselRecord { value: None, ..v },
            |mut v| {
                v.voyage.destination = None;
                v
            },
            |v| VesselRecord { mmsi: Mmsi::new(0), ..v },
            |v| v.with_position(f64::NAN, 0.),
            |v| VesselRecord {
                timestamp: Utc.timestamp_opt(0, 0).unwrap(),
                ..v
            },
        ];

        for remove in removals {
            let reduced = assessor().assess_at(&[remove(full.clone())], now()).completeness;
            assert!(reduced < baseline, "{reduced} >= {baseline}");
        }
    }

    #[test]
    fn test_timeliness_steps_with_age() {
        let ages = [0, 10, 45, 120, 600];
        let expected = [100., 80., 60., 40., 20.];
        for (age, expected) in ages.into_iter().zip(expected) {
            let v = VesselRecord::test_default(257_000_000);
            assert_eq!(timeliness(&v, v.timestamp + Duration::minutes(age)), expected);
        }
    }

    #[test]
    fn test_timeliness_step_boundaries_are_inclusive_to_the_second() {
        let v = VesselRecord::test_default(257_000_000);
        let at = |seconds: i64| timeliness(&v, v.timestamp + Duration::seconds(seconds));

        assert_eq!(at(300), 100.);
        assert_eq!(at(301), 80.);
        assert_eq!(at(359), 80.);
        assert_eq!(at(1_800), 80.);
        assert_eq!(at(1_859), 60.);
        assert_eq!(at(3_659), 40.);
        assert_eq!(at(10_800), 40.);
        assert_eq!(at(10_859), 20.);
    }

    #[test]
    fn test_speed_above_type_ceiling_is_inaccurate() {
        let vessels = VesselRecordBuilder::new()
            .add(|v| v)
            .add(|v| v.with_speed(60.))
            .add(|v| v.with_course(360.))
            .add(|v| v.with_position(-91., 0.))
            .build();

        let metrics = assessor().assess_at(&vessels, now());

        assert_eq!(metrics.accuracy, 25.);
    }

    #[test]
    fn test_duplicate_identities_reduce_uniqueness() {
        let vessels = VesselRecordBuilder::new()
            .add_many(4, |_, v| VesselRecord { mmsi: Mmsi::new(257_000_001), ..v })
            .build();

        assert_eq!(assessor().assess_at(&vessels, now()).uniqueness, 25.);
    }

    #[test]
    fn test_malformed_identities_reduce_validity() {
        let vessels = VesselRecordBuilder::new()
            .add(|v| v)
            .add(|v| VesselRecord {
                imo_number: Some(ImoNumber::new(9074728)),
                call_sign: Some(CallSign::new_unchecked("L")),
                ..v
            })
            .build();

        let metrics = assessor().assess_at(&vessels, now());

        assert!((metrics.validity - (100. + 100. / 3.) / 2.).abs() < 1e-9);
    }

    #[test]
    fn test_overall_is_weighted_composite() {
        let vessels = VesselRecordBuilder::new().add_many(10, |_, v| v).build();
        let m = assessor().assess_at(&vessels, now());

        let expected = m.completeness * 0.25
            + m.accuracy * 0.25
            + m.consistency * 0.15
            + m.timeliness * 0.15
            + m.validity * 0.10
            + m.uniqueness * 0.10;
        assert!((m.overall - expected).abs() < 1e-9);
        assert!(m.confidence_interval.lower <= m.overall && m.overall <= m.confidence_interval.upper);
    }
}
