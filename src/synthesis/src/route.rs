use crate::{PopulationStage, PopulationStageId};
use chrono::Duration;
use maritime_core::{
    KNOTS_TO_KM_PER_HOUR, ReferenceData, STATIONARY_SPEED_KNOTS, SyntheticGenerationConfig,
    VesselRecord, distance_km, initial_bearing, normalize_degrees,
    reference_data_error::UnresolvableDestinationSnafu,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

const HEADING_NOISE_DEGREES: f64 = 5.0;

/// Points vessels along the great-circle bearing to their declared destination, with a uniform
/// deviation whose width is set by the realism level.
#[derive(Debug, Clone)]
pub struct RouteOptimizer {
    reference: Arc<ReferenceData>,
}

impl RouteOptimizer {
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self { reference }
    }
}

impl PopulationStage for RouteOptimizer {
    fn stage_id(&self) -> PopulationStageId {
        PopulationStageId::RouteOptimization
    }

    fn is_enabled(&self, config: &SyntheticGenerationConfig) -> bool {
        config.route_optimization
    }

    #[instrument(skip_all, fields(stage = %self.stage_id(), vessels = vessels.len()))]
    fn apply(
        &self,
        vessels: Vec<VesselRecord>,
        config: &SyntheticGenerationConfig,
        rng: &mut ChaCha8Rng,
    ) -> Vec<VesselRecord> {
        let spread = config.realism_level.course_deviation_spread();
        let mut routed = 0;
        let mut unresolved: Vec<String> = Vec::new();

        let vessels = vessels
            .into_iter()
            .map(|mut vessel| {
                let Some(name) = vessel.voyage.destination.as_deref() else {
                    return vessel;
                };
                let Some(port) = self.reference.port_by_name(name) else {
                    unresolved.push(name.to_string());
                    return vessel;
                };

                let from = vessel.coordinate();
                let to = port.coordinate();
                let course =
                    normalize_degrees(initial_bearing(&from, &to) + rng.random_range(-spread..=spread));
                vessel.course_over_ground = Some(course);
                vessel.true_heading = Some(normalize_degrees(
                    course + rng.random_range(-HEADING_NOISE_DEGREES..=HEADING_NOISE_DEGREES),
                ));

                vessel.voyage.eta = vessel
                    .speed_over_ground
                    .filter(|s| *s >= STATIONARY_SPEED_KNOTS)
                    .map(|speed| {
                        let hours = distance_km(&from, &to) / (speed * KNOTS_TO_KM_PER_HOUR);
                        vessel.timestamp + Duration::seconds((hours * 3_600.) as i64)
                    });

                routed += 1;
                vessel
            })
            .collect();

        if let Some(first) = unresolved.first() {
            let e = UnresolvableDestinationSnafu {
                destination: first.clone(),
            }
            .build();
            warn!(
                "left {} vessels on their sampled course: {e}",
                unresolved.len()
            );
        }
        debug!("routed {routed} vessels");

        vessels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FOR_ORDERS;
    use chrono::{TimeZone, Utc};
    use maritime_core::{
        BoundingBox, Port, RealismLevel, TemporalRange, VesselRecordBuilder, angular_difference,
    };
    use rand::SeedableRng;

    fn config(realism_level: RealismLevel) -> SyntheticGenerationConfig {
        SyntheticGenerationConfig {
            realism_level,
            ..SyntheticGenerationConfig::new(
                1,
                BoundingBox::new(60., 30., 0., -80.).unwrap(),
                TemporalRange::new(
                    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
                    Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap(),
                )
                .unwrap(),
            )
        }
    }

    fn optimizer() -> RouteOptimizer {
        RouteOptimizer::new(Arc::new(ReferenceData::new(
            vec![],
            vec![Port {
                name: "Rotterdam".into(),
                latitude: 51.95,
                longitude: 4.14,
            }],
        )))
    }

    #[test]
    fn test_course_stays_within_realism_spread() {
        let vessels = VesselRecordBuilder::new().add_many(300, |_, v| v).build();
        let from = vessels[0].coordinate();
        let bearing = initial_bearing(&from, &optimizer().reference.ports[0].coordinate());

        for level in [RealismLevel::Basic, RealismLevel::ResearchGrade] {
            let routed = optimizer().apply(
                vessels.clone(),
                &config(level),
                &mut ChaCha8Rng::seed_from_u64(1),
            );
            let spread = level.course_deviation_spread();
            assert!(routed.iter().all(|v| {
                angular_difference(v.course_over_ground.unwrap(), bearing) <= spread + 1e-9
                    && angular_difference(v.true_heading.unwrap(), v.course_over_ground.unwrap())
                        <= HEADING_NOISE_DEGREES + 1e-9
            }));
        }
    }

    #[test]
    fn test_unresolvable_destinations_keep_their_course() {
        let vessels = VesselRecordBuilder::new()
            .add(|mut v| {
                v.voyage.destination = Some(FOR_ORDERS.into());
                v
            })
            .add(|mut v| {
                v.voyage.destination = None;
                v
            })
            .build();

        let routed = optimizer().apply(
            vessels.clone(),
            &config(RealismLevel::Standard),
            &mut ChaCha8Rng::seed_from_u64(1),
        );

        assert_eq!(vessels, routed);
    }

    #[test]
    fn test_eta_follows_distance_and_speed() {
        let vessels = VesselRecordBuilder::new().add(|v| v).build();
        let routed = optimizer().apply(
            vessels,
            &config(RealismLevel::Standard),
            &mut ChaCha8Rng::seed_from_u64(1),
        );

        let v = &routed[0];
        let km = distance_km(&v.coordinate(), &optimizer().reference.ports[0].coordinate());
        let hours = (v.voyage.eta.unwrap() - v.timestamp).num_seconds() as f64 / 3_600.;
        assert!((hours - km / (15. * KNOTS_TO_KM_PER_HOUR)).abs() < 0.01);
    }
}
