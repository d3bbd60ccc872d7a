//! Reachable-area polygons around shelters.
//!
//! Each shelter is buffered by a geodesic circle of the requested radius and
//! the circles are dissolved into one (multi-)polygon. Overlapping circles
//! merge into a single part; disjoint ones stay separate parts.
//!
//! The input points are whatever shelters the map currently has loaded,
//! which is incomplete when zoomed out. Callers should only run this at
//! [`REACH_MIN_ZOOM`] or closer; the builder does not check.

use geo::{BooleanOps, GeodesicDestination, LineString, MultiPolygon, Point, Polygon};
use serde_json::{json, Value};
use tracing::debug;

use crate::coord::LonLat;

/// Zoom level from which reach areas should be computed.
pub const REACH_MIN_ZOOM: f64 = 13.0;

/// Vertices per buffer circle.
pub const DEFAULT_CIRCLE_STEPS: usize = 64;

/// Dissolved buffer geometry. Empty when cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct ReachPolygon {
    geometry: MultiPolygon<f64>,
}

impl ReachPolygon {
    pub fn empty() -> Self {
        Self {
            geometry: MultiPolygon::new(Vec::new()),
        }
    }

    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }

    /// Number of disjoint polygon parts.
    pub fn part_count(&self) -> usize {
        self.geometry.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.0.is_empty()
    }

    /// The "buffer" source: a FeatureCollection holding zero or one
    /// MultiPolygon feature.
    pub fn to_geojson(&self) -> Value {
        if self.is_empty() {
            return json!({ "type": "FeatureCollection", "features": [] });
        }

        let polygons = self
            .geometry
            .0
            .iter()
            .map(|polygon| {
                std::iter::once(polygon.exterior())
                    .chain(polygon.interiors())
                    .map(ring_coordinates)
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "MultiPolygon", "coordinates": polygons },
                "properties": {},
            }],
        })
    }
}

fn ring_coordinates(ring: &LineString<f64>) -> Vec<[f64; 2]> {
    ring.coords().map(|c| [c.x, c.y]).collect()
}

/// Builds dissolved buffer polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReachAreaBuilder {
    steps: usize,
}

impl Default for ReachAreaBuilder {
    fn default() -> Self {
        Self {
            steps: DEFAULT_CIRCLE_STEPS,
        }
    }
}

impl ReachAreaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder drawing circles with `steps` vertices (minimum 8).
    pub fn with_steps(steps: usize) -> Self {
        Self {
            steps: steps.max(8),
        }
    }

    /// Dissolved buffers of `radius_m` metres around `points`.
    ///
    /// - radius 0 (or any non-positive / non-finite radius): the empty
    ///   polygon, regardless of `points`
    /// - no points: `None`, meaning the caller keeps whatever it shows now
    pub fn compute_reach(&self, points: &[Point<f64>], radius_m: f64) -> Option<ReachPolygon> {
        if !(radius_m.is_finite() && radius_m > 0.0) {
            debug!(radius_m, "reach cleared");
            return Some(ReachPolygon::empty());
        }
        if points.is_empty() {
            debug!("no points loaded; reach left unchanged");
            return None;
        }

        let buffers = points
            .iter()
            .map(|point| MultiPolygon::new(vec![self.buffer(*point, radius_m)]))
            .collect::<Vec<_>>();
        let geometry = dissolve(buffers);
        debug!(
            points = points.len(),
            radius_m,
            parts = geometry.0.len(),
            "reach computed"
        );
        Some(ReachPolygon { geometry })
    }

    /// [`ReachAreaBuilder::compute_reach`] over dataset positions.
    pub fn compute_reach_at(&self, positions: &[LonLat], radius_m: f64) -> Option<ReachPolygon> {
        let points = positions.iter().copied().map(Point::from).collect::<Vec<_>>();
        self.compute_reach(&points, radius_m)
    }

    /// Geodesic circle of `radius_m` metres around `center`.
    pub fn buffer(&self, center: Point<f64>, radius_m: f64) -> Polygon<f64> {
        let ring = (0..self.steps)
            .map(|step| {
                let bearing = 360.0 * step as f64 / self.steps as f64;
                center.geodesic_destination(bearing, radius_m).0
            })
            .collect::<Vec<_>>();
        Polygon::new(LineString::from(ring), Vec::new())
    }
}

/// Union all parts, pairing neighbours each round so intermediate
/// geometries stay small.
fn dissolve(mut parts: Vec<MultiPolygon<f64>>) -> MultiPolygon<f64> {
    while parts.len() > 1 {
        let mut merged = Vec::with_capacity(parts.len().div_ceil(2));
        let mut iter = parts.into_iter();
        while let Some(first) = iter.next() {
            match iter.next() {
                Some(second) => merged.push(first.union(&second)),
                None => merged.push(first),
            }
        }
        parts = merged;
    }
    parts
        .pop()
        .unwrap_or_else(|| MultiPolygon::new(Vec::new()))
}

#[cfg(test)]
mod tests {
    use geo::{Contains, HaversineDistance};

    use super::*;

    const SHINJUKU: (f64, f64) = (139.7003, 35.6896);

    fn offset_east(origin: (f64, f64), metres: f64) -> Point<f64> {
        Point::new(origin.0, origin.1).geodesic_destination(90.0, metres)
    }

    #[test]
    fn zero_radius_is_empty_even_with_points() {
        let builder = ReachAreaBuilder::new();
        let points = vec![Point::new(SHINJUKU.0, SHINJUKU.1)];
        let result = builder.compute_reach(&points, 0.0).expect("cleared");
        assert!(result.is_empty());
        assert_eq!(result.to_geojson()["features"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn zero_radius_without_points_is_still_a_clear() {
        let result = ReachAreaBuilder::new().compute_reach(&[], 0.0);
        assert_eq!(result, Some(ReachPolygon::empty()));
    }

    #[test]
    fn no_points_means_no_update() {
        assert!(ReachAreaBuilder::new().compute_reach(&[], 500.0).is_none());
    }

    #[test]
    fn buffer_vertices_sit_on_the_radius() {
        let builder = ReachAreaBuilder::new();
        let center = Point::new(SHINJUKU.0, SHINJUKU.1);
        let circle = builder.buffer(center, 1000.0);
        for coord in circle.exterior().coords() {
            let d = center.haversine_distance(&Point::from(*coord));
            assert!((d - 1000.0).abs() < 5.0, "vertex at {d} m");
        }
        assert!(circle.contains(&center));
    }

    #[test]
    fn nearby_points_merge_into_one_part() {
        let builder = ReachAreaBuilder::new();
        let a = Point::new(SHINJUKU.0, SHINJUKU.1);
        let b = offset_east(SHINJUKU, 600.0);
        let reach = builder.compute_reach(&[a, b], 500.0).expect("computed");
        assert_eq!(reach.part_count(), 1);
        assert!(reach.geometry().contains(&a));
        assert!(reach.geometry().contains(&b));
    }

    #[test]
    fn distant_points_stay_separate_parts() {
        let builder = ReachAreaBuilder::new();
        let a = Point::new(SHINJUKU.0, SHINJUKU.1);
        let b = offset_east(SHINJUKU, 5000.0);
        let reach = builder.compute_reach(&[a, b], 500.0).expect("computed");
        assert_eq!(reach.part_count(), 2);
        let value = reach.to_geojson();
        assert_eq!(value["features"][0]["geometry"]["type"], "MultiPolygon");
        assert_eq!(
            value["features"][0]["geometry"]["coordinates"]
                .as_array()
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn many_points_in_a_row_merge() {
        let builder = ReachAreaBuilder::with_steps(32);
        let points = (0..7)
            .map(|i| offset_east(SHINJUKU, i as f64 * 400.0))
            .collect::<Vec<_>>();
        let reach = builder.compute_reach(&points, 250.0).unwrap();
        assert_eq!(reach.part_count(), 1);
    }
}
