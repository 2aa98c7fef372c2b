use crate::{Result, error::error::ConfigurationSnafu};
use h3o::{CellIndex, LatLng, Resolution};
use maritime_core::{
    CircularMean, CongestionLevel, Coordinate, DistributionLibrary, H3DensityCell, Mean, Season,
    VesselRecord, VesselType, cell_confidence, h3_resolution,
};
use snafu::ResultExt;
use std::{collections::BTreeMap, sync::Arc};
use tracing::{instrument, warn};

/// Cells keyed by index, iteration order is stable across runs.
pub type DensityGrid = BTreeMap<CellIndex, H3DensityCell>;

/// Aggregates a vessel population into hexagonal cells. Aggregation is a pure function of the
/// population and resolution, every call recomputes the grid from scratch.
#[derive(Debug, Clone)]
pub struct DensityGridBuilder {
    library: Arc<DistributionLibrary>,
}

impl DensityGridBuilder {
    pub fn new(library: Arc<DistributionLibrary>) -> Self {
        Self { library }
    }

    pub fn build_with_resolution(&self, vessels: &[VesselRecord], resolution: u8) -> Result<DensityGrid> {
        let resolution = h3_resolution(resolution).context(ConfigurationSnafu)?;
        Ok(self.build(vessels, resolution))
    }

    #[instrument(skip_all, fields(vessels = vessels.len(), resolution = u8::from(resolution)))]
    pub fn build(&self, vessels: &[VesselRecord], resolution: Resolution) -> DensityGrid {
        let mut members: BTreeMap<CellIndex, Vec<&VesselRecord>> = BTreeMap::new();
        let mut skipped = 0;

        for v in vessels {
            match cell_of(v, resolution) {
                Some(cell) => members.entry(cell).or_default().push(v),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!("skipped {skipped} vessels with invalid coordinates");
        }

        members
            .into_iter()
            .map(|(cell, vessels)| (cell, self.aggregate(cell, &vessels)))
            .collect()
    }

    fn aggregate(&self, cell: CellIndex, vessels: &[&VesselRecord]) -> H3DensityCell {
        let center = LatLng::from(cell);
        let area_km2 = cell.area_km2();
        let vessel_count = vessels.len() as u32;

        let mut type_counts: BTreeMap<VesselType, u32> = BTreeMap::new();
        for v in vessels {
            *type_counts.entry(v.vessel_type).or_default() += 1;
        }

        let mean_speed = vessels.iter().filter_map(|v| v.speed_over_ground).mean();
        let dominant_heading = vessels
            .iter()
            .filter_map(|v| v.true_heading.or(v.course_over_ground))
            .circular_mean();

        let economic_value: f64 = vessels
            .iter()
            .filter_map(|v| v.value)
            .map(|v| v.monthly_revenue_potential)
            .sum();
        let data_demand_gb_month: f64 = vessels
            .iter()
            .filter_map(|v| v.communications)
            .map(|c| c.data_demand_gb_month)
            .sum();

        let density_per_km2 = if area_km2 > 0. {
            vessel_count as f64 / area_km2
        } else {
            0.
        };

        // The latest observation in the cell decides which season the cell is in
        let seasonal_multiplier = vessels
            .iter()
            .map(|v| v.timestamp)
            .max()
            .map(|t| self.library.seasonal_multiplier(Season::of(t)))
            .unwrap_or(1.);

        H3DensityCell {
            cell,
            resolution: u8::from(cell.resolution()),
            center: Coordinate::new(center.lat(), center.lng()),
            vessel_count,
            type_counts,
            mean_speed,
            dominant_heading,
            economic_value,
            data_demand_gb_month,
            area_km2,
            density_per_km2,
            congestion: CongestionLevel::from_density(density_per_km2),
            seasonal_multiplier,
            confidence: cell_confidence(vessel_count),
        }
    }
}

pub fn cell_of(vessel: &VesselRecord, resolution: Resolution) -> Option<CellIndex> {
    if !vessel.position.is_valid() {
        return None;
    }
    LatLng::new(vessel.position.latitude, vessel.position.longitude)
        .ok()
        .map(|ll| ll.to_cell(resolution))
}

/// The densest `share` of occupied cells, at least one when the grid is not empty. Ties are
/// broken on cell index so the selection is deterministic.
pub fn hotspots(grid: &DensityGrid, share: f64) -> Vec<&H3DensityCell> {
    let mut cells: Vec<&H3DensityCell> = grid.values().collect();
    cells.sort_by(|a, b| {
        b.vessel_count
            .cmp(&a.vessel_count)
            .then_with(|| a.cell.cmp(&b.cell))
    });

    let take = ((cells.len() as f64 * share.clamp(0., 1.)).ceil() as usize)
        .max(1)
        .min(cells.len());
    cells.truncate(take);
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use maritime_core::VesselRecordBuilder;

    #[test]
    fn test_opposite_sides_of_north_average_to_north() {
        let vessels = VesselRecordBuilder::new()
            .add(|v| v.with_heading(350.))
            .add(|v| v.with_heading(10.))
            .build();

        let grid = DensityGridBuilder::new(Arc::default()).build(&vessels, Resolution::Five);

        assert_eq!(grid.len(), 1);
        let heading = grid.values().next().unwrap().dominant_heading.unwrap();
        assert!(heading.min(360. - heading) < 1e-6, "{heading}");
    }

    #[test]
    fn test_invalid_positions_are_skipped() {
        let vessels = VesselRecordBuilder::new()
            .add(|v| v.with_position(95., 10.))
            .add(|v| v)
            .build();

        let grid = DensityGridBuilder::new(Arc::default()).build(&vessels, Resolution::Three);

        assert_eq!(grid.values().map(|c| c.vessel_count).sum::<u32>(), 1);
    }

    #[test]
    fn test_hotspots_take_at_least_one_cell() {
        let vessels = VesselRecordBuilder::new().add(|v| v).build();
        let grid = DensityGridBuilder::new(Arc::default()).build(&vessels, Resolution::Three);
        assert_eq!(hotspots(&grid, 0.1).len(), 1);
        assert!(hotspots(&DensityGrid::new(), 0.1).is_empty());
    }
}
