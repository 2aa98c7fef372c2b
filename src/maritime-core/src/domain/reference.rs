use crate::BoundingBox;
use geo::{Intersects, LineString, Point, point};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// An ordered polyline with traffic metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingLane {
    pub name: String,
    pub waypoints: Vec<Coordinate>,
    pub daily_vessel_traffic: f64,
    /// Relative commercial value of the cargo moved along the lane, 0 to 1.
    pub value_index: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chokepoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub daily_transits: f64,
    pub radius_km: f64,
}

/// Static reference datasets supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    pub lanes: Vec<ShippingLane>,
    pub ports: Vec<Port>,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn point(&self) -> Point<f64> {
        point!(x: self.longitude, y: self.latitude)
    }

    pub fn from_point(point: Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}

impl ShippingLane {
    pub fn line_string(&self) -> LineString<f64> {
        self.waypoints
            .iter()
            .map(|c| (c.longitude, c.latitude))
            .collect::<Vec<_>>()
            .into()
    }

    pub fn intersects(&self, bounds: &BoundingBox) -> bool {
        self.line_string().intersects(&bounds.rect())
    }
}

impl Port {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

impl Chokepoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

impl ReferenceData {
    pub fn new(lanes: Vec<ShippingLane>, ports: Vec<Port>) -> Self {
        Self { lanes, ports }
    }

    /// Case-insensitive lookup of a declared AIS destination.
    pub fn port_by_name(&self, name: &str) -> Option<&Port> {
        let name = name.trim();
        self.ports
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn lanes_within(&self, bounds: &BoundingBox) -> Vec<&ShippingLane> {
        self.lanes.iter().filter(|l| l.intersects(bounds)).collect()
    }

    pub fn ports_within(&self, bounds: &BoundingBox) -> Vec<&Port> {
        self.ports
            .iter()
            .filter(|p| bounds.contains(p.latitude, p.longitude))
            .collect()
    }

    /// Major global lanes and ports.
    pub fn default_reference() -> Self {
        let lanes = DEFAULT_LANES
            .iter()
            .map(|(name, traffic, value, waypoints)| ShippingLane {
                name: name.to_string(),
                waypoints: waypoints
                    .iter()
                    .map(|(lat, lon)| Coordinate::new(*lat, *lon))
                    .collect(),
                daily_vessel_traffic: *traffic,
                value_index: *value,
            })
            .collect();

        let ports = DEFAULT_PORTS
            .iter()
            .map(|(name, latitude, longitude)| Port {
                name: name.to_string(),
                latitude: *latitude,
                longitude: *longitude,
            })
            .collect();

        Self { lanes, ports }
    }
}

type LaneRow = (&'static str, f64, f64, &'static [(f64, f64)]);

static DEFAULT_LANES: &[LaneRow] = &[
    (
        "North Atlantic",
        180.0,
        0.85,
        &[
            (40.5, -73.8),
            (41.0, -69.0),
            (42.5, -50.0),
            (46.0, -30.0),
            (49.0, -10.0),
            (49.8, -5.0),
            (50.5, 0.5),
        ],
    ),
    (
        "North Atlantic - Mediterranean",
        120.0,
        0.75,
        &[
            (40.5, -73.8),
            (39.0, -60.0),
            (37.5, -40.0),
            (36.5, -20.0),
            (36.0, -8.0),
            (35.95, -5.6),
            (36.2, -2.0),
        ],
    ),
    (
        "Halifax - Rotterdam",
        60.0,
        0.7,
        &[
            (44.5, -63.5),
            (46.5, -50.0),
            (49.0, -30.0),
            (49.5, -6.0),
            (50.5, 0.5),
            (51.9, 4.0),
        ],
    ),
    (
        "US Gulf - Europe",
        90.0,
        0.8,
        &[
            (29.0, -89.0),
            (24.5, -81.5),
            (27.0, -79.5),
            (35.0, -72.0),
            (38.0, -50.0),
            (43.5, -20.0),
            (49.5, -5.5),
        ],
    ),
    (
        "Panama - US East Coast",
        110.0,
        0.8,
        &[
            (9.3, -79.9),
            (18.0, -75.5),
            (24.0, -74.0),
            (32.0, -76.5),
            (40.5, -73.8),
        ],
    ),
    (
        "West Africa - Europe",
        70.0,
        0.65,
        &[
            (-34.4, 18.5),
            (-30.0, 15.0),
            (-15.0, 5.0),
            (5.0, -10.0),
            (25.0, -18.0),
            (36.0, -9.5),
            (43.0, -9.8),
            (48.5, -5.5),
        ],
    ),
    (
        "Mediterranean",
        200.0,
        0.8,
        &[
            (35.95, -5.6),
            (37.2, 3.0),
            (37.5, 11.0),
            (35.5, 15.0),
            (33.5, 25.0),
            (31.5, 32.3),
        ],
    ),
    (
        "Suez - Bab el-Mandeb",
        55.0,
        0.95,
        &[
            (31.3, 32.4),
            (29.9, 32.6),
            (27.0, 34.5),
            (20.0, 38.5),
            (12.6, 43.3),
            (12.0, 45.5),
        ],
    ),
    (
        "Indian Ocean",
        150.0,
        0.9,
        &[
            (12.0, 45.5),
            (13.0, 53.0),
            (8.0, 70.0),
            (5.8, 80.5),
            (6.0, 95.0),
            (2.5, 101.5),
            (1.25, 103.8),
        ],
    ),
    (
        "South China Sea",
        250.0,
        0.9,
        &[
            (1.25, 103.8),
            (5.0, 106.0),
            (12.0, 110.5),
            (22.2, 114.2),
            (26.0, 121.0),
            (31.2, 122.5),
        ],
    ),
    (
        "Transpacific West",
        140.0,
        0.9,
        &[(31.2, 122.5), (35.0, 140.0), (42.0, 160.0), (45.5, 179.9)],
    ),
    (
        "Transpacific East",
        140.0,
        0.9,
        &[
            (45.5, -179.9),
            (45.0, -160.0),
            (40.0, -140.0),
            (33.7, -118.3),
        ],
    ),
    (
        "North Sea",
        160.0,
        0.6,
        &[(51.9, 4.0), (54.0, 5.5), (57.5, 8.0), (59.0, 10.5)],
    ),
];

static DEFAULT_PORTS: &[(&str, f64, f64)] = &[
    ("Rotterdam", 51.95, 4.14),
    ("Antwerp", 51.26, 4.40),
    ("Hamburg", 53.54, 9.97),
    ("Felixstowe", 51.95, 1.33),
    ("Southampton", 50.90, -1.40),
    ("Le Havre", 49.48, 0.11),
    ("Algeciras", 36.13, -5.45),
    ("Lisbon", 38.70, -9.14),
    ("Valencia", 39.45, -0.32),
    ("Piraeus", 37.94, 23.64),
    ("Oslo", 59.90, 10.74),
    ("Bergen", 60.39, 5.32),
    ("Reykjavik", 64.15, -21.94),
    ("Ponta Delgada", 37.74, -25.67),
    ("New York", 40.67, -74.04),
    ("Boston", 42.35, -71.05),
    ("Halifax", 44.64, -63.57),
    ("St. John's", 47.56, -52.71),
    ("Savannah", 32.08, -81.09),
    ("Houston", 29.73, -95.27),
    ("Santos", -23.96, -46.31),
    ("Los Angeles", 33.74, -118.27),
    ("Vancouver", 49.29, -123.11),
    ("Shanghai", 31.23, 121.49),
    ("Singapore", 1.26, 103.84),
    ("Hong Kong", 22.29, 114.17),
    ("Busan", 35.10, 129.04),
    ("Tokyo", 35.62, 139.78),
    ("Jebel Ali", 25.01, 55.06),
    ("Durban", -29.87, 31.03),
];
