use crate::{CallSign, Coordinate, ImoNumber, Mmsi};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Reported speeds below this are treated as a vessel at rest.
pub const STATIONARY_SPEED_KNOTS: f64 = 0.5;

/// One tracked or synthesized vessel at an instant in time.
///
/// Records are snapshots: the `with_*` methods consume the record and return a new one, they
/// never update a record that has already been handed to an aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselRecord {
    pub mmsi: Mmsi,
    pub imo_number: Option<ImoNumber>,
    pub call_sign: Option<CallSign>,
    pub name: Option<String>,
    pub flag_state: Option<String>,
    pub position: Position,
    pub timestamp: DateTime<Utc>,
    /// Knots
    pub speed_over_ground: Option<f64>,
    /// Degrees in [0, 360)
    pub course_over_ground: Option<f64>,
    /// Degrees in [0, 360)
    pub true_heading: Option<f64>,
    /// Degrees per minute
    pub rate_of_turn: Option<f64>,
    pub navigation_status: Option<NavigationStatus>,
    pub vessel_type: VesselType,
    pub specifications: Option<VesselSpecifications>,
    pub voyage: Voyage,
    pub communications: Option<Communications>,
    pub value: Option<EconomicValue>,
    pub provenance: Option<SyntheticProvenance>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters
    pub horizontal_accuracy: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselSpecifications {
    pub length_m: f64,
    pub beam_m: f64,
    pub draft_m: f64,
    pub gross_tonnage: f64,
    pub deadweight: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voyage {
    pub destination: Option<String>,
    pub eta: Option<DateTime<Utc>>,
    pub cargo: Option<String>,
    pub hazardous_cargo: bool,
    pub persons_aboard: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteEquipment {
    pub vsat: bool,
    pub fleet_broadband: bool,
    pub iridium: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Communications {
    pub satellite: SatelliteEquipment,
    pub data_demand_gb_month: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicValue {
    /// In [0, 100]
    pub score: f64,
    pub tier: ValueTier,
    pub monthly_revenue_potential: f64,
}

/// Where a synthetic record came from, absent on observed records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticProvenance {
    /// The speed drawn by the sampler before any temporal modulation.
    pub base_speed: f64,
    pub placement: Placement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
pub enum Placement {
    Uniform,
    Lane,
    Port,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
pub enum VesselType {
    BulkCarrier,
    ContainerShip,
    OilTanker,
    ChemicalTanker,
    LngTanker,
    PassengerFerry,
    CruiseShip,
    FishingVessel,
    OffshoreSupply,
    DrillingRig,
    GeneralCargo,
    CarCarrier,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
pub enum ValueTier {
    Premium,
    Standard,
    Basic,
}

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
pub enum NavigationStatus {
    UnderWayUsingEngine,
    AtAnchor,
    NotUnderCommand,
    RestrictedManoeuverability,
    ConstrainedByDraught,
    Moored,
    Aground,
    EngagedInFishing,
    UnderWaySailing,
    NotDefined,
}

impl ValueTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            ValueTier::Premium
        } else if score >= 40.0 {
            ValueTier::Standard
        } else {
            ValueTier::Basic
        }
    }
}

impl NavigationStatus {
    /// Stationary by declaration, regardless of reported speed.
    pub fn is_stationary(&self) -> bool {
        matches!(
            self,
            NavigationStatus::AtAnchor | NavigationStatus::Moored | NavigationStatus::Aground
        )
    }
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            horizontal_accuracy: None,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl VesselRecord {
    pub fn coordinate(&self) -> Coordinate {
        self.position.coordinate()
    }

    pub fn is_underway(&self) -> bool {
        !self
            .navigation_status
            .is_some_and(|status| status.is_stationary())
    }

    pub fn with_position(self, latitude: f64, longitude: f64) -> Self {
        Self {
            position: Position {
                latitude,
                longitude,
                ..self.position
            },
            ..self
        }
    }

    pub fn with_speed(self, speed: f64) -> Self {
        Self {
            speed_over_ground: Some(speed),
            ..self
        }
    }

    pub fn with_course(self, course: f64) -> Self {
        Self {
            course_over_ground: Some(course),
            ..self
        }
    }

    pub fn with_heading(self, heading: f64) -> Self {
        Self {
            true_heading: Some(heading),
            ..self
        }
    }

    pub fn with_navigation_status(self, status: NavigationStatus) -> Self {
        Self {
            navigation_status: Some(status),
            ..self
        }
    }

    pub fn with_placement(self, placement: Placement) -> Self {
        let provenance = self.provenance.map(|p| SyntheticProvenance { placement, ..p });
        Self { provenance, ..self }
    }

    /// The speed before temporal modulation, observed records fall back to their reported speed.
    pub fn base_speed(&self) -> Option<f64> {
        self.provenance
            .map(|p| p.base_speed)
            .or(self.speed_over_ground)
    }
}
