use crate::Coordinate;
use geo::{Bearing, Closest, ClosestPoint, Destination, Distance, Haversine, LineString};

pub const KNOTS_TO_KM_PER_HOUR: f64 = 1.852;

pub fn distance_km(from: &Coordinate, to: &Coordinate) -> f64 {
    Haversine.distance(from.point(), to.point()) / 1_000.
}

/// Initial great-circle bearing in [0, 360).
pub fn initial_bearing(from: &Coordinate, to: &Coordinate) -> f64 {
    normalize_degrees(Haversine.bearing(from.point(), to.point()))
}

pub fn destination(from: &Coordinate, bearing: f64, distance_km: f64) -> Coordinate {
    let point = Haversine.destination(from.point(), bearing, distance_km * 1_000.);
    Coordinate::new(
        point.y().clamp(-90., 90.),
        normalize_longitude(point.x()),
    )
}

/// Wraps into [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= 360. { 0. } else { wrapped }
}

pub fn normalize_longitude(longitude: f64) -> f64 {
    if (-180.0..=180.0).contains(&longitude) {
        longitude
    } else {
        (longitude + 180.).rem_euclid(360.) - 180.
    }
}

/// Smallest absolute difference between two angles, in [0, 180].
pub fn angular_difference(a: f64, b: f64) -> f64 {
    let diff = normalize_degrees(a - b);
    if diff > 180. { 360. - diff } else { diff }
}

/// Closest point on a lane polyline together with its great-circle distance. The projection is
/// planar in degrees which is accurate enough for the segment lengths lanes are drawn with.
pub fn closest_on_line(line: &LineString<f64>, coordinate: &Coordinate) -> Option<(f64, Coordinate)> {
    match line.closest_point(&coordinate.point()) {
        Closest::Intersection(p) | Closest::SinglePoint(p) => {
            let closest = Coordinate::from_point(p);
            Some((distance_km(coordinate, &closest), closest))
        }
        Closest::Indeterminate => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearing_due_east_on_equator() {
        let from = Coordinate::new(0., 0.);
        let to = Coordinate::new(0., 10.);
        assert!((initial_bearing(&from, &to) - 90.).abs() < 1e-6);
    }

    #[test]
    fn test_destination_round_trips_distance() {
        let from = Coordinate::new(51.95, 4.14);
        let to = destination(&from, 45., 50.);
        assert!((distance_km(&from, &to) - 50.).abs() < 0.01);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(360.), 0.);
        assert_eq!(normalize_degrees(-10.), 350.);
        assert_eq!(normalize_degrees(725.), 5.);
        assert!(normalize_degrees(-1e-15) < 360.);
    }

    #[test]
    fn test_angular_difference_wraps() {
        assert_eq!(angular_difference(350., 10.), 20.);
        assert_eq!(angular_difference(10., 350.), 20.);
        assert_eq!(angular_difference(90., 270.), 180.);
    }
}
