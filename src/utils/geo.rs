//! Great-circle distance helpers used to rank listings around a point.
//!
//! All distances are in kilometres and use the Haversine formula on a sphere
//! of radius 6371 km.

use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Anything that may sit on the map.
pub trait HasCoordinates {
    fn coordinates(&self) -> Option<GeoPoint>;
}

impl HasCoordinates for GeoPoint {
    fn coordinates(&self) -> Option<GeoPoint> {
        Some(*self)
    }
}

/// An item paired with its distance from some origin.
#[derive(Debug, Clone, PartialEq)]
pub struct WithDistance<T> {
    pub item: T,
    /// `f64::INFINITY` when the item has no coordinates.
    pub distance_km: f64,
}

pub fn distance_km(p1: GeoPoint, p2: GeoPoint) -> f64 {
    let d_lat = (p2.lat - p1.lat).to_radians();
    let d_lng = (p2.lng - p1.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + p1.lat.to_radians().cos() * p2.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Items within `radius_km` of `origin`, in input order. Items without
/// coordinates are dropped.
pub fn filter_by_distance<T>(items: Vec<T>, origin: GeoPoint, radius_km: f64) -> Vec<T>
where
    T: HasCoordinates,
{
    items
        .into_iter()
        .filter(|item| {
            item.coordinates()
                .map_or(false, |point| distance_km(origin, point) <= radius_km)
        })
        .collect()
}

/// Every item annotated with its distance from `origin`, nearest first.
/// Items without coordinates go last; ties keep their input order.
pub fn sort_by_distance<T>(items: Vec<T>, origin: GeoPoint) -> Vec<WithDistance<T>>
where
    T: HasCoordinates,
{
    let mut ranked: Vec<WithDistance<T>> = items
        .into_iter()
        .map(|item| {
            let distance_km = item
                .coordinates()
                .map_or(f64::INFINITY, |point| distance_km(origin, point));
            WithDistance { item, distance_km }
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

/// "500 m" below one kilometre, "2.5 km" otherwise.
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{} m", (distance_km * 1000.0).round() as i64)
    } else {
        format!("{:.1} km", distance_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELHI: GeoPoint = GeoPoint { lat: 28.6139, lng: 77.2090 };
    const GURUGRAM: GeoPoint = GeoPoint { lat: 28.4595, lng: 77.0266 };
    const NOIDA: GeoPoint = GeoPoint { lat: 28.5355, lng: 77.3910 };
    const MUMBAI: GeoPoint = GeoPoint { lat: 19.0760, lng: 72.8777 };

    #[derive(Debug, Clone, PartialEq)]
    struct Room {
        name: &'static str,
        at: Option<GeoPoint>,
    }

    impl HasCoordinates for Room {
        fn coordinates(&self) -> Option<GeoPoint> {
            self.at
        }
    }

    fn room(name: &'static str, at: Option<GeoPoint>) -> Room {
        Room { name, at }
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(distance_km(DELHI, DELHI), 0.0);
        assert_eq!(distance_km(MUMBAI, MUMBAI), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        for (a, b) in [(DELHI, GURUGRAM), (NOIDA, MUMBAI), (GURUGRAM, NOIDA)] {
            assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_delhi_to_gurugram() {
        let d = distance_km(DELHI, GURUGRAM);
        assert!((d - 24.74).abs() < 0.5, "got {}", d);
    }

    #[test]
    fn test_delhi_to_mumbai() {
        let d = distance_km(DELHI, MUMBAI);
        assert!((d - 1148.1).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_filter_keeps_order_and_drops_unlocated() {
        let rooms = vec![
            room("mumbai", Some(MUMBAI)),
            room("noida", Some(NOIDA)),
            room("unknown", None),
            room("gurugram", Some(GURUGRAM)),
        ];

        let near: Vec<&str> = filter_by_distance(rooms.clone(), DELHI, 30.0)
            .iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(near, vec!["noida", "gurugram"]);

        let everything = filter_by_distance(rooms, DELHI, f64::MAX);
        assert_eq!(everything.len(), 3);
    }

    #[test]
    fn test_filter_radius_is_inclusive() {
        let exact = distance_km(DELHI, NOIDA);
        let kept = filter_by_distance(vec![room("noida", Some(NOIDA))], DELHI, exact);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_sort_puts_unlocated_last_and_is_stable() {
        let rooms = vec![
            room("lost-1", None),
            room("mumbai", Some(MUMBAI)),
            room("noida-a", Some(NOIDA)),
            room("lost-2", None),
            room("gurugram", Some(GURUGRAM)),
            room("noida-b", Some(NOIDA)),
        ];

        let ranked = sort_by_distance(rooms, DELHI);
        let names: Vec<&str> = ranked.iter().map(|r| r.item.name).collect();
        assert_eq!(
            names,
            vec!["noida-a", "noida-b", "gurugram", "mumbai", "lost-1", "lost-2"]
        );
        assert!(ranked[4].distance_km.is_infinite());
        assert!(ranked[0].distance_km <= ranked[1].distance_km);
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.5), "500 m");
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(2.54), "2.5 km");
        assert_eq!(format_distance(24.74), "24.7 km");
    }
}
