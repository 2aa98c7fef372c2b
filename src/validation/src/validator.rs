use crate::statistics::*;
use chrono::{Datelike, Timelike, Weekday};
use density::{DensityGrid, DensityGridBuilder, hotspots};
use h3o::{CellIndex, Resolution};
use maritime_core::{
    CategoryComparison, ChiSquareResult, Chokepoint, Coordinate, DistributionLibrary,
    FALLBACK_VESSEL_TYPE, KNOTS_TO_KM_PER_HOUR, KolmogorovSmirnovResult, MINIMUM_CONFIDENCE_LEVEL,
    Mean, ReferenceData, RouteMetrics, STATIONARY_SPEED_KNOTS, Season, SpatialAutocorrelation,
    SpatialMetrics, StatisticalValidationReport, SyntheticGenerationConfig, TemporalMetrics,
    VesselRecord, VesselType, closest_on_line, destination, distance_km, h3_resolution,
    initial_bearing,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    f64::consts::PI,
    sync::Arc,
};
use tracing::{debug, info, instrument, warn};

/// Upper bound on the speed KS statistic for the speed distribution to pass.
pub const KS_SIMILARITY_THRESHOLD: f64 = 0.1;
pub const KS_PASSED_SCORE: f64 = 100.;
pub const KS_FAILED_SCORE: f64 = 30.;
/// Share of occupied cells treated as hotspots.
pub const HOTSPOT_SHARE: f64 = 0.1;
/// A hotspot is aligned when its center lies this close to a lane, port or chokepoint.
pub const HOTSPOT_PROXIMITY_KM: f64 = 150.;
/// Score reported for metrics that have nothing to compare against in the bounding box.
pub const NEUTRAL_SCORE: f64 = 50.;
/// Two-sided 5% critical value for the weekday/weekend t statistic.
pub const WEEKEND_EFFECT_CRITICAL_T: f64 = 1.96;

const REFERENCE_POINTS_PER_VESSEL: usize = 4;
const EXPECTED_SPEED_POINTS: usize = 256;
const ROUTE_HORIZON_HOURS: f64 = 24.;

/// Compares a vessel population against the distribution library and reference geography.
/// Never fails, an empty population produces the lowest-confidence report.
#[derive(Debug, Clone)]
pub struct StatisticalValidator {
    library: Arc<DistributionLibrary>,
    reference: Arc<ReferenceData>,
    grid: DensityGridBuilder,
}

/// Expected speed under the library's speed envelopes, memoized per type and modulation.
struct SpeedModel<'a> {
    library: &'a DistributionLibrary,
    means: BTreeMap<(VesselType, u64), f64>,
}

impl StatisticalValidator {
    pub fn new(library: Arc<DistributionLibrary>, reference: Arc<ReferenceData>) -> Self {
        Self {
            grid: DensityGridBuilder::new(library.clone()),
            library,
            reference,
        }
    }

    #[instrument(skip_all, fields(vessels = vessels.len()))]
    pub fn validate(
        &self,
        vessels: &[VesselRecord],
        config: &SyntheticGenerationConfig,
    ) -> StatisticalValidationReport {
        let vessel_type_distribution = self.vessel_type_fit(vessels);

        if vessels.is_empty() {
            warn!("validation invoked on an empty population");
            return degraded_report(vessel_type_distribution);
        }

        let mut model = SpeedModel::new(&self.library);
        let underway: Vec<&VesselRecord> = vessels
            .iter()
            .filter(|v| v.is_underway() && v.speed_over_ground.is_some())
            .collect();

        let speed_distribution = self.speed_fit(&underway, &model);
        let spatial_distribution = self.spatial_fit(vessels, config);
        let temporal_patterns = self.temporal_fit(&underway, &mut model);
        let route_fidelity = self.route_fidelity(vessels, config);

        let ks_score = if speed_distribution.passed {
            KS_PASSED_SCORE
        } else {
            KS_FAILED_SCORE
        };
        let components = [
            type_fit_score(&vessel_type_distribution),
            spatial_distribution.hotspot_accuracy,
            (temporal_patterns.seasonal_correlation * 100.).max(0.),
            route_fidelity.traffic_volume_accuracy,
            ks_score,
        ];
        let overall_realism_score = components.into_iter().mean().unwrap_or(0.);

        info!(
            overall_realism_score,
            chi_square = vessel_type_distribution.statistic,
            ks = speed_distribution.statistic,
            "validated population"
        );

        StatisticalValidationReport {
            vessel_type_distribution,
            speed_distribution,
            spatial_distribution,
            temporal_patterns,
            route_fidelity,
            overall_realism_score,
            confidence_level: StatisticalValidationReport::confidence_from_score(
                overall_realism_score,
            ),
            sample_size: vessels.len(),
        }
    }

    pub fn vessel_type_fit(&self, vessels: &[VesselRecord]) -> ChiSquareResult {
        let proportions = self.library.type_proportions();
        let known: BTreeSet<VesselType> = proportions.iter().map(|(t, _)| *t).collect();

        let mut counts: BTreeMap<VesselType, u32> = BTreeMap::new();
        for v in vessels {
            let vessel_type = if known.contains(&v.vessel_type) {
                v.vessel_type
            } else {
                FALLBACK_VESSEL_TYPE
            };
            *counts.entry(vessel_type).or_default() += 1;
        }

        let n = vessels.len() as f64;
        let categories: Vec<CategoryComparison> = proportions
            .iter()
            .map(|(vessel_type, p)| CategoryComparison {
                vessel_type: *vessel_type,
                expected: p * n,
                observed: counts.get(vessel_type).copied().unwrap_or(0),
            })
            .collect();

        let observed: Vec<f64> = categories.iter().map(|c| c.observed as f64).collect();
        let expected: Vec<f64> = categories.iter().map(|c| c.expected).collect();

        let statistic = chi_square_statistic(&observed, &expected);
        let degrees_of_freedom = (categories.len() as u32).saturating_sub(1).max(1);
        let critical_value = chi_square_critical_value(degrees_of_freedom);

        let (p_value, passed) = if vessels.is_empty() {
            (0., false)
        } else {
            (
                chi_square_p_value(statistic, degrees_of_freedom),
                statistic < critical_value,
            )
        };

        ChiSquareResult {
            statistic,
            degrees_of_freedom,
            critical_value,
            p_value,
            passed,
            categories,
        }
    }

    /// Observed speeds of underway vessels against a reference sample drawn from the library's
    /// envelopes under each vessel's expected seasonal and daily modulation.
    fn speed_fit(
        &self,
        underway: &[&VesselRecord],
        model: &SpeedModel<'_>,
    ) -> KolmogorovSmirnovResult {
        let mut groups: BTreeMap<(VesselType, u64), usize> = BTreeMap::new();
        let sample: Vec<f64> = underway
            .iter()
            .filter_map(|v| {
                let speed = v.speed_over_ground?;
                let modulation = self.expected_modulation(v);
                *groups
                    .entry((v.vessel_type, modulation.to_bits()))
                    .or_default() += 1;
                Some(speed)
            })
            .collect();

        let reference: Vec<f64> = groups
            .into_iter()
            .flat_map(|((vessel_type, modulation), count)| {
                model.quantiles(
                    vessel_type,
                    f64::from_bits(modulation),
                    count * REFERENCE_POINTS_PER_VESSEL,
                )
            })
            .collect();

        match kolmogorov_smirnov_statistic(&sample, &reference) {
            Some(statistic) => KolmogorovSmirnovResult {
                statistic,
                threshold: KS_SIMILARITY_THRESHOLD,
                p_value: kolmogorov_smirnov_p_value(statistic, sample.len(), reference.len()),
                passed: statistic < KS_SIMILARITY_THRESHOLD,
                sample_size: sample.len(),
                reference_size: reference.len(),
            },
            None => {
                debug!("no underway vessels reporting speed");
                failed_speed_fit(reference.len())
            }
        }
    }

    fn spatial_fit(
        &self,
        vessels: &[VesselRecord],
        config: &SyntheticGenerationConfig,
    ) -> SpatialMetrics {
        let resolution = h3_resolution(config.realism_level.validation_resolution())
            .unwrap_or(Resolution::Three);
        let grid = self.grid.build(vessels, resolution);

        let morans_i = grid_morans_i(&grid).unwrap_or(0.);
        let hot = hotspots(&grid, HOTSPOT_SHARE);
        let hotspot_accuracy = if hot.is_empty() {
            0.
        } else {
            let aligned = hot
                .iter()
                .filter(|c| self.is_near_traffic(&c.center))
                .count();
            aligned as f64 / hot.len() as f64 * 100.
        };

        SpatialMetrics {
            clustering_coefficient: clustering_coefficient(&grid),
            morans_i,
            spatial_autocorrelation: SpatialAutocorrelation::from_morans_i(morans_i),
            hotspot_accuracy,
        }
    }

    fn is_near_traffic(&self, center: &Coordinate) -> bool {
        self.reference.lanes.iter().any(|lane| {
            closest_on_line(&lane.line_string(), center)
                .is_some_and(|(km, _)| km <= HOTSPOT_PROXIMITY_KM)
        }) || self
            .reference
            .ports
            .iter()
            .any(|p| distance_km(center, &p.coordinate()) <= HOTSPOT_PROXIMITY_KM)
            || self.library.chokepoints().iter().any(|c| {
                distance_km(center, &c.coordinate()) <= HOTSPOT_PROXIMITY_KM + c.radius_km
            })
    }

    /// Seasonal and daily shapes are compared as ratios of observed speed to the speed expected
    /// with the factor under test held neutral, so clipping at type maxima affects both sides.
    fn temporal_fit(
        &self,
        underway: &[&VesselRecord],
        model: &mut SpeedModel<'_>,
    ) -> TemporalMetrics {
        let lib = &self.library;

        let mut by_season: BTreeMap<Season, Vec<&VesselRecord>> = BTreeMap::new();
        let mut by_hour: BTreeMap<u32, Vec<&VesselRecord>> = BTreeMap::new();
        for v in underway {
            by_season.entry(Season::of(v.timestamp)).or_default().push(v);
            by_hour.entry(v.timestamp.hour()).or_default().push(v);
        }

        let seasonal: Vec<(f64, f64)> = by_season
            .values()
            .filter_map(|group| {
                self.modulation_ratio(group, model, |v| lib.daily_multiplier(v.timestamp.hour()))
            })
            .collect();
        let (observed, expected): (Vec<f64>, Vec<f64>) = seasonal.iter().copied().unzip();
        let seasonal_correlation = pearson_correlation(&observed, &expected)
            .or_else(|| {
                observed
                    .iter()
                    .zip(&expected)
                    .map(|(o, e)| agreement(*o, *e))
                    .mean()
            })
            .unwrap_or(0.);

        let daily_errors: Vec<f64> = by_hour
            .values()
            .filter_map(|group| {
                self.modulation_ratio(group, model, |v| {
                    lib.seasonal_multiplier(Season::of(v.timestamp))
                })
            })
            .filter(|(_, e)| *e > 0.)
            .map(|(o, e)| (o - e).abs() / e)
            .collect();
        let daily_pattern_accuracy = daily_errors
            .into_iter()
            .mean()
            .map(|error| ((1. - error) * 100.).clamp(0., 100.))
            .unwrap_or(0.);

        let (weekend, weekday): (Vec<f64>, Vec<f64>) = {
            let mut weekend = Vec::new();
            let mut weekday = Vec::new();
            for v in underway {
                let Some(speed) = v.speed_over_ground else {
                    continue;
                };
                let expected = model.mean(v.vessel_type, self.expected_modulation(v));
                if expected <= 0. {
                    continue;
                }
                match v.timestamp.weekday() {
                    Weekday::Sat | Weekday::Sun => weekend.push(speed / expected),
                    _ => weekday.push(speed / expected),
                }
            }
            (weekend, weekday)
        };
        let weekend_effect_t_statistic = welch_t_statistic(&weekend, &weekday).unwrap_or(0.);

        TemporalMetrics {
            seasonal_correlation,
            daily_pattern_accuracy,
            weekend_effect_t_statistic,
            weekend_effect_significant: weekend_effect_t_statistic.abs() > WEEKEND_EFFECT_CRITICAL_T,
        }
    }

    /// `(observed, expected)` speed ratios of a group against the expectation with one
    /// modulation factor replaced by `neutral`.
    fn modulation_ratio(
        &self,
        group: &[&VesselRecord],
        model: &mut SpeedModel<'_>,
        neutral: impl Fn(&VesselRecord) -> f64,
    ) -> Option<(f64, f64)> {
        let (mut observed, mut expected, mut baseline) = (0., 0., 0.);
        for v in group {
            let Some(speed) = v.speed_over_ground else {
                continue;
            };
            observed += speed;
            expected += model.mean(v.vessel_type, self.expected_modulation(v));
            baseline += model.mean(v.vessel_type, neutral(v));
        }
        (baseline > 0.).then(|| (observed / baseline, expected / baseline))
    }

    fn route_fidelity(
        &self,
        vessels: &[VesselRecord],
        config: &SyntheticGenerationConfig,
    ) -> RouteMetrics {
        let deviations: Vec<f64> = vessels
            .iter()
            .filter(|v| v.is_underway())
            .filter_map(|v| self.great_circle_deviation(v))
            .collect();

        let chokepoints: Vec<&Chokepoint> = self
            .library
            .chokepoints()
            .iter()
            .filter(|c| config.bounds.contains(c.latitude, c.longitude))
            .collect();
        let transits: Vec<usize> = chokepoints
            .iter()
            .map(|c| {
                vessels
                    .iter()
                    .filter(|v| distance_km(&v.coordinate(), &c.coordinate()) <= c.radius_km)
                    .count()
            })
            .collect();

        let traffic_volume_accuracy = if chokepoints.is_empty() {
            NEUTRAL_SCORE
        } else {
            let observed_total = transits.iter().sum::<usize>() as f64;
            let expected_total: f64 = chokepoints.iter().map(|c| c.daily_transits).sum();
            if observed_total == 0. || expected_total <= 0. {
                0.
            } else {
                let observed: Vec<f64> =
                    transits.iter().map(|t| *t as f64 / observed_total).collect();
                let expected: Vec<f64> = chokepoints
                    .iter()
                    .map(|c| c.daily_transits / expected_total)
                    .collect();
                (1. - total_variation_distance(&observed, &expected)) * 100.
            }
        };

        let mean_density = vessels.len() as f64 / config.bounds.area_km2().max(f64::EPSILON);
        let chokepoint_congestion_fidelity = if chokepoints.is_empty() {
            NEUTRAL_SCORE
        } else {
            let congested = chokepoints
                .iter()
                .zip(&transits)
                .filter(|(c, t)| **t as f64 / (PI * c.radius_km * c.radius_km) >= mean_density)
                .count();
            congested as f64 / chokepoints.len() as f64 * 100.
        };

        RouteMetrics {
            mean_great_circle_deviation_km: deviations.iter().copied().mean().unwrap_or(0.),
            traffic_volume_accuracy,
            chokepoint_congestion_fidelity,
            routed_vessels: deviations.len(),
        }
    }

    /// Distance between where a day on the reported course and a day on the great-circle bearing
    /// to the declared destination would take the vessel.
    fn great_circle_deviation(&self, vessel: &VesselRecord) -> Option<f64> {
        let course = vessel.course_over_ground?;
        let speed = vessel.speed_over_ground?;
        let port = self
            .reference
            .port_by_name(vessel.voyage.destination.as_deref()?)?;

        let from = vessel.coordinate();
        let to = port.coordinate();
        let horizon =
            (speed * KNOTS_TO_KM_PER_HOUR * ROUTE_HORIZON_HOURS).min(distance_km(&from, &to));
        if horizon <= 0. {
            return Some(0.);
        }

        let bearing = initial_bearing(&from, &to);
        Some(distance_km(
            &destination(&from, course, horizon),
            &destination(&from, bearing, horizon),
        ))
    }

    fn expected_modulation(&self, vessel: &VesselRecord) -> f64 {
        self.library.seasonal_multiplier(Season::of(vessel.timestamp))
            * self.library.daily_multiplier(vessel.timestamp.hour())
    }
}

impl<'a> SpeedModel<'a> {
    fn new(library: &'a DistributionLibrary) -> Self {
        Self {
            library,
            means: BTreeMap::new(),
        }
    }

    /// Stratified quantiles of the clipped normal envelope conditioned on the vessel moving,
    /// scaled by `modulation` and capped at the type maximum.
    fn quantiles(&self, vessel_type: VesselType, modulation: f64, points: usize) -> Vec<f64> {
        let profile = self.library.speed_profile_or_fallback(vessel_type);
        if points == 0 {
            return Vec::new();
        }

        let floor = if profile.min < STATIONARY_SPEED_KNOTS && profile.std_dev > 0. {
            normal_cdf((STATIONARY_SPEED_KNOTS - profile.mean) / profile.std_dev)
        } else {
            0.
        };

        (0..points)
            .map(|i| {
                let q = floor + (1. - floor) * (i as f64 + 0.5) / points as f64;
                let base = profile.clip(profile.mean + profile.std_dev * normal_quantile(q));
                (base * modulation).min(profile.max)
            })
            .collect()
    }

    fn mean(&mut self, vessel_type: VesselType, modulation: f64) -> f64 {
        if let Some(mean) = self.means.get(&(vessel_type, modulation.to_bits())) {
            return *mean;
        }
        let mean = self
            .quantiles(vessel_type, modulation, EXPECTED_SPEED_POINTS)
            .into_iter()
            .mean()
            .unwrap_or(0.);
        self.means.insert((vessel_type, modulation.to_bits()), mean);
        mean
    }
}

/// Chi-square fit scaled to [0, 100], a statistic at twice the critical value scores zero.
pub fn type_fit_score(result: &ChiSquareResult) -> f64 {
    if result.critical_value <= 0. || result.categories.iter().all(|c| c.expected <= 0.) {
        return 0.;
    }
    (1. - result.statistic / (2. * result.critical_value)).clamp(0., 1.) * 100.
}

/// Moran's I of cell vessel counts over occupied cells and their empty first ring.
fn grid_morans_i(grid: &DensityGrid) -> Option<f64> {
    let mut index: BTreeMap<CellIndex, usize> = BTreeMap::new();
    let mut values = Vec::new();

    for (cell, density) in grid {
        index.insert(*cell, values.len());
        values.push(density.vessel_count as f64);
    }
    for cell in grid.keys() {
        for neighbor in ring(*cell) {
            index.entry(neighbor).or_insert_with(|| {
                values.push(0.);
                values.len() - 1
            });
        }
    }

    let mut pairs = Vec::new();
    for (cell, i) in &index {
        for neighbor in ring(*cell) {
            if let Some(j) = index.get(&neighbor) {
                if cell < &neighbor {
                    pairs.push((*i, *j));
                }
            }
        }
    }

    morans_i(&values, &pairs)
}

/// Mean local clustering coefficient of the occupied-cell adjacency graph, over cells with at
/// least two occupied neighbors.
fn clustering_coefficient(grid: &DensityGrid) -> f64 {
    let neighbors: BTreeMap<CellIndex, BTreeSet<CellIndex>> = grid
        .keys()
        .map(|cell| {
            (
                *cell,
                ring(*cell).filter(|n| grid.contains_key(n)).collect(),
            )
        })
        .collect();

    neighbors
        .values()
        .filter(|adjacent| adjacent.len() >= 2)
        .map(|adjacent| {
            let k = adjacent.len() as f64;
            let links = adjacent
                .iter()
                .map(|a| {
                    neighbors
                        .get(a)
                        .map(|n| n.intersection(adjacent).count())
                        .unwrap_or(0)
                })
                .sum::<usize>() as f64
                / 2.;
            links / (k * (k - 1.) / 2.)
        })
        .mean()
        .unwrap_or(0.)
}

fn ring(cell: CellIndex) -> impl Iterator<Item = CellIndex> {
    cell.grid_disk_safe(1).filter(move |n| *n != cell)
}

/// One minus the relative error, in [0, 1].
fn agreement(observed: f64, expected: f64) -> f64 {
    if expected <= 0. {
        return 0.;
    }
    (1. - (observed - expected).abs() / expected).clamp(0., 1.)
}

fn failed_speed_fit(reference_size: usize) -> KolmogorovSmirnovResult {
    KolmogorovSmirnovResult {
        statistic: 1.,
        threshold: KS_SIMILARITY_THRESHOLD,
        p_value: 0.,
        passed: false,
        sample_size: 0,
        reference_size,
    }
}

fn degraded_report(vessel_type_distribution: ChiSquareResult) -> StatisticalValidationReport {
    StatisticalValidationReport {
        vessel_type_distribution,
        speed_distribution: failed_speed_fit(0),
        spatial_distribution: SpatialMetrics {
            clustering_coefficient: 0.,
            morans_i: 0.,
            spatial_autocorrelation: SpatialAutocorrelation::Random,
            hotspot_accuracy: 0.,
        },
        temporal_patterns: TemporalMetrics {
            seasonal_correlation: 0.,
            daily_pattern_accuracy: 0.,
            weekend_effect_t_statistic: 0.,
            weekend_effect_significant: false,
        },
        route_fidelity: RouteMetrics {
            mean_great_circle_deviation_km: 0.,
            traffic_volume_accuracy: 0.,
            chokepoint_congestion_fidelity: 0.,
            routed_vessels: 0,
        },
        overall_realism_score: 0.,
        confidence_level: MINIMUM_CONFIDENCE_LEVEL,
        sample_size: 0,
    }
}
