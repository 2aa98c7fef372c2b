use crate::*;
use chrono::{DateTime, TimeZone, Utc};

impl VesselRecord {
    /// A fully populated, format-valid container ship in the English Channel.
    pub fn test_default(mmsi: u32) -> Self {
        VesselRecord {
            mmsi: Mmsi::new(mmsi),
            imo_number: Some(ImoNumber::new(9074729)),
            call_sign: Some(CallSign::new_unchecked("LA2B3")),
            name: Some("Test Vessel".into()),
            flag_state: Some("Norway".into()),
            position: Position {
                latitude: 50.2,
                longitude: -1.5,
                horizontal_accuracy: Some(10.0),
            },
            timestamp: Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
            speed_over_ground: Some(15.0),
            course_over_ground: Some(90.0),
            true_heading: Some(92.0),
            rate_of_turn: Some(0.0),
            navigation_status: Some(NavigationStatus::UnderWayUsingEngine),
            vessel_type: VesselType::ContainerShip,
            specifications: Some(VesselSpecifications {
                length_m: 300.0,
                beam_m: 43.0,
                draft_m: 14.0,
                gross_tonnage: 150_000.0,
                deadweight: 165_000.0,
            }),
            voyage: Voyage {
                destination: Some("Rotterdam".into()),
                eta: Some(Utc.with_ymd_and_hms(2024, 6, 16, 6, 0, 0).unwrap()),
                cargo: Some("Containers".into()),
                hazardous_cargo: false,
                persons_aboard: Some(24),
            },
            communications: Some(Communications {
                satellite: SatelliteEquipment {
                    vsat: true,
                    fleet_broadband: true,
                    iridium: false,
                },
                data_demand_gb_month: 250.0,
            }),
            value: Some(EconomicValue {
                score: 75.0,
                tier: ValueTier::Premium,
                monthly_revenue_potential: 4_500.0,
            }),
            provenance: None,
        }
    }
}

/// Builds a population of test records, each call to `add` appends one vessel derived from
/// [`VesselRecord::test_default`] with a unique identity.
#[derive(Debug, Default)]
pub struct VesselRecordBuilder {
    vessels: Vec<VesselRecord>,
}

impl VesselRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, modify: impl FnOnce(VesselRecord) -> VesselRecord) -> Self {
        let mmsi = 257_000_000 + self.vessels.len() as u32;
        self.vessels.push(modify(VesselRecord::test_default(mmsi)));
        self
    }

    pub fn add_many(
        mut self,
        amount: usize,
        modify: impl Fn(usize, VesselRecord) -> VesselRecord,
    ) -> Self {
        for i in 0..amount {
            self = self.add(|v| modify(i, v));
        }
        self
    }

    pub fn at(
        latitude: f64,
        longitude: f64,
        timestamp: DateTime<Utc>,
    ) -> impl FnOnce(VesselRecord) -> VesselRecord {
        move |v| VesselRecord {
            timestamp,
            ..v.with_position(latitude, longitude)
        }
    }

    pub fn build(self) -> Vec<VesselRecord> {
        self.vessels
    }
}
