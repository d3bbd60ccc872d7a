//! Multi-point distance measurement.
//!
//! A [`DistanceMeasurer`] is owned by one map session. Secondary clicks add a
//! vertex, or delete the vertex that was hit. After every change the labels
//! are rebuilt from the first vertex: vertex `i` carries the length of the
//! path `0..=i`, vertex 0 carries an empty label, and a line exists only when
//! there are at least two vertices.

use std::fmt;
use std::str::FromStr;

use geo::{HaversineDistance, Point};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use crate::coord::LonLat;

/// Identifier of a measurement vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PointId(Uuid);

impl PointId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for PointId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A user-placed vertex and its cumulative distance label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementPoint {
    pub id: PointId,
    pub position: LonLat,
    pub distance: String,
}

/// Polyline through all vertices, in placement order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementLine {
    pub coordinates: Vec<LonLat>,
}

/// What a [`DistanceMeasurer::toggle_vertex`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexChange {
    Added(PointId),
    Removed(PointId),
    /// The hit vertex was not part of the current measurement.
    Unchanged,
}

/// Copy of the measurement state, ready to render as the "distance" source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeasurementSnapshot {
    pub points: Vec<MeasurementPoint>,
    pub line: Option<MeasurementLine>,
}

impl MeasurementSnapshot {
    /// FeatureCollection of the vertices followed by the line, if any.
    pub fn to_geojson(&self) -> Value {
        let mut features = self
            .points
            .iter()
            .map(|point| {
                json!({
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": point.position.to_array() },
                    "properties": { "id": point.id.to_string(), "distance": point.distance },
                })
            })
            .collect::<Vec<_>>();

        if let Some(line) = &self.line {
            let coordinates = line
                .coordinates
                .iter()
                .map(|c| c.to_array())
                .collect::<Vec<_>>();
            features.push(json!({
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": coordinates },
                "properties": { "distance": "" },
            }));
        }

        json!({ "type": "FeatureCollection", "features": features })
    }
}

/// Session-scoped measurement state.
#[derive(Debug, Clone, Default)]
pub struct DistanceMeasurer {
    points: Vec<MeasurementPoint>,
    line: Option<MeasurementLine>,
}

impl DistanceMeasurer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every vertex and the line.
    pub fn reset(&mut self) {
        self.points.clear();
        self.line = None;
    }

    /// Delete the vertex `hit`, or append a new vertex at `position` when
    /// nothing was hit.
    pub fn toggle_vertex(&mut self, position: LonLat, hit: Option<PointId>) -> VertexChange {
        let change = match hit {
            Some(id) => {
                let before = self.points.len();
                self.points.retain(|point| point.id != id);
                if self.points.len() == before {
                    VertexChange::Unchanged
                } else {
                    VertexChange::Removed(id)
                }
            }
            None => {
                let id = PointId::generate();
                self.points.push(MeasurementPoint {
                    id,
                    position,
                    distance: String::new(),
                });
                VertexChange::Added(id)
            }
        };
        self.recompute();
        debug!(?change, vertices = self.points.len(), "measurement updated");
        change
    }

    pub fn points(&self) -> &[MeasurementPoint] {
        &self.points
    }

    pub fn line(&self) -> Option<&MeasurementLine> {
        self.line.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Length of the whole path in kilometres.
    pub fn total_km(&self) -> f64 {
        path_length_km(&self.points.iter().map(|p| p.position).collect::<Vec<_>>())
    }

    pub fn snapshot(&self) -> MeasurementSnapshot {
        MeasurementSnapshot {
            points: self.points.clone(),
            line: self.line.clone(),
        }
    }

    fn recompute(&mut self) {
        if self.points.len() < 2 {
            self.line = None;
            for point in &mut self.points {
                point.distance.clear();
            }
            return;
        }

        let mut cumulative_km = 0.0;
        let mut previous: Option<Point<f64>> = None;
        for (index, point) in self.points.iter_mut().enumerate() {
            let current: Point<f64> = point.position.into();
            if let Some(prev) = previous {
                cumulative_km += prev.haversine_distance(&current) / 1000.0;
            }
            point.distance = if index == 0 {
                String::new()
            } else {
                format_distance(cumulative_km)
            };
            previous = Some(current);
        }

        self.line = Some(MeasurementLine {
            coordinates: self.points.iter().map(|p| p.position).collect(),
        });
    }
}

/// Great-circle length of a path in kilometres.
pub fn path_length_km(path: &[LonLat]) -> f64 {
    path.windows(2)
        .map(|pair| {
            let a: Point<f64> = pair[0].into();
            let b: Point<f64> = pair[1].into();
            a.haversine_distance(&b) / 1000.0
        })
        .sum()
}

/// Distance label with two decimals and a unit suffix, e.g. `"1.25km"`.
pub fn format_distance(km: f64) -> String {
    format!("{:.2}km", km)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn label_km(label: &str) -> f64 {
        label
            .strip_suffix("km")
            .and_then(|v| v.parse().ok())
            .expect("label is <number>km")
    }

    #[test]
    fn single_point_has_no_line_or_label() {
        let mut m = DistanceMeasurer::new();
        m.toggle_vertex(LonLat::new(0.0, 0.0), None);
        assert!(m.line().is_none());
        assert_eq!(m.points()[0].distance, "");
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let mut m = DistanceMeasurer::new();
        m.toggle_vertex(LonLat::new(0.0, 0.0), None);
        m.toggle_vertex(LonLat::new(0.0, 1.0), None);
        assert_eq!(m.points()[0].distance, "");
        assert_relative_eq!(label_km(&m.points()[1].distance), 111.19, epsilon = 0.02);
        assert_eq!(m.line().unwrap().coordinates.len(), 2);
    }

    #[test]
    fn labels_are_cumulative_along_the_path() {
        let mut m = DistanceMeasurer::new();
        m.toggle_vertex(LonLat::new(0.0, 0.0), None);
        m.toggle_vertex(LonLat::new(0.0, 1.0), None);
        m.toggle_vertex(LonLat::new(0.0, 0.0), None);
        let third = label_km(&m.points()[2].distance);
        assert_relative_eq!(third, 2.0 * 111.195, epsilon = 0.02);
        assert_relative_eq!(m.total_km(), 222.39, epsilon = 0.01);
    }

    #[test]
    fn removing_a_vertex_recomputes_remaining_path() {
        let mut m = DistanceMeasurer::new();
        m.toggle_vertex(LonLat::new(0.0, 0.0), None);
        let middle = match m.toggle_vertex(LonLat::new(0.0, 1.0), None) {
            VertexChange::Added(id) => id,
            other => panic!("expected Added, got {other:?}"),
        };
        m.toggle_vertex(LonLat::new(0.0, 2.0), None);

        assert_eq!(
            m.toggle_vertex(LonLat::new(0.0, 1.0), Some(middle)),
            VertexChange::Removed(middle)
        );
        assert_eq!(m.points().len(), 2);
        assert_relative_eq!(label_km(&m.points()[1].distance), 222.39, epsilon = 0.02);
        assert_eq!(m.line().unwrap().coordinates.len(), 2);
    }

    #[test]
    fn removing_down_to_one_vertex_clears_line_and_label() {
        let mut m = DistanceMeasurer::new();
        let first = match m.toggle_vertex(LonLat::new(0.0, 0.0), None) {
            VertexChange::Added(id) => id,
            other => panic!("expected Added, got {other:?}"),
        };
        m.toggle_vertex(LonLat::new(0.0, 1.0), None);
        m.toggle_vertex(LonLat::new(0.0, 0.0), Some(first));
        assert_eq!(m.points().len(), 1);
        assert!(m.line().is_none());
        assert_eq!(m.points()[0].distance, "");
    }

    #[test]
    fn unknown_hit_changes_nothing() {
        let mut m = DistanceMeasurer::new();
        m.toggle_vertex(LonLat::new(0.0, 0.0), None);
        let stray = PointId::generate();
        assert_eq!(
            m.toggle_vertex(LonLat::new(5.0, 5.0), Some(stray)),
            VertexChange::Unchanged
        );
        assert_eq!(m.points().len(), 1);
    }

    #[test]
    fn reset_clears_everything() {
        let mut m = DistanceMeasurer::new();
        m.toggle_vertex(LonLat::new(0.0, 0.0), None);
        m.toggle_vertex(LonLat::new(1.0, 0.0), None);
        m.reset();
        assert!(m.is_empty());
        assert!(m.line().is_none());
    }

    #[test]
    fn ids_are_unique() {
        let mut m = DistanceMeasurer::new();
        m.toggle_vertex(LonLat::new(0.0, 0.0), None);
        m.toggle_vertex(LonLat::new(0.0, 0.0), None);
        assert_ne!(m.points()[0].id, m.points()[1].id);
    }

    #[test]
    fn geojson_lists_points_then_line() {
        let mut m = DistanceMeasurer::new();
        m.toggle_vertex(LonLat::new(0.0, 0.0), None);
        m.toggle_vertex(LonLat::new(0.0, 1.0), None);
        let value = m.snapshot().to_geojson();
        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[0]["geometry"]["type"], "Point");
        assert_eq!(features[2]["geometry"]["type"], "LineString");
        assert_eq!(features[1]["properties"]["distance"], m.points()[1].distance);
    }

    #[test]
    fn point_id_round_trips_through_text() {
        let id = PointId::generate();
        assert_eq!(id.to_string().parse::<PointId>().unwrap(), id);
    }

    #[test]
    fn point_id_serializes_as_plain_uuid_string() {
        let id = PointId::generate();
        let value = serde_json::to_value(id).expect("serialize id");
        assert_eq!(value, Value::String(id.to_string()));
    }

    #[test]
    fn distance_format_has_two_decimals() {
        assert_eq!(format_distance(1.0), "1.00km");
        assert_eq!(format_distance(0.125_1), "0.13km");
    }
}
