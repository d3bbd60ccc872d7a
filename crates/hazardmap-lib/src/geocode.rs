//! Geocoder backend for the shelter search box.
//!
//! Forward geocoding runs the fuzzy shelter search; reverse geocoding turns a
//! raw pair of numbers into map positions without knowing which one is the
//! latitude.

use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::coord::LonLat;
use crate::search::FuzzySearchIndex;

/// Valid latitude range in degrees.
const LATITUDE_LIMIT: f64 = 90.0;

/// A displayable geocoder result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceResult {
    pub label: String,
    pub center: LonLat,
}

impl PlaceResult {
    fn coordinate(lon: f64, lat: f64) -> Self {
        Self {
            label: format!("緯度: {} 経度: {}", lat, lon),
            center: LonLat::new(lon, lat),
        }
    }

    /// GeoJSON point feature carrying `place_name` and `center`, the shape
    /// geocoder controls expect.
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": self.center.to_array(),
            },
            "place_name": self.label,
            "center": self.center.to_array(),
        })
    }
}

/// Adapter between a geocoding control and the shelter index.
#[derive(Debug, Clone)]
pub struct GeocodeAdapter {
    index: FuzzySearchIndex,
}

impl GeocodeAdapter {
    pub fn new(index: FuzzySearchIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &FuzzySearchIndex {
        &self.index
    }

    /// Shelters matching `query`, labelled `"name,address"`.
    pub fn forward_geocode(&self, query: &str) -> Vec<PlaceResult> {
        self.index
            .search(query)
            .into_iter()
            .map(|record| PlaceResult {
                label: format!("{},{}", record.name, record.address),
                center: record.position,
            })
            .collect()
    }

    /// Interpret a pair of numbers whose lat/lon order is unknown.
    ///
    /// A value outside `[-90, 90]` can only be a longitude, which fixes the
    /// order. When both values fit either role, both orderings are returned.
    /// Always yields at least one result.
    pub fn reverse_geocode(&self, pair: (f64, f64)) -> Vec<PlaceResult> {
        reverse_geocode(pair)
    }
}

/// Free-standing form of [`GeocodeAdapter::reverse_geocode`]; needs no index.
pub fn reverse_geocode((first, second): (f64, f64)) -> Vec<PlaceResult> {
    let mut results = Vec::with_capacity(2);

    if !is_latitude(first) {
        results.push(PlaceResult::coordinate(first, second));
    }
    if !is_latitude(second) {
        results.push(PlaceResult::coordinate(second, first));
    }
    if results.is_empty() {
        results.push(PlaceResult::coordinate(first, second));
        results.push(PlaceResult::coordinate(second, first));
    }

    debug!(first, second, results = results.len(), "reverse geocode");
    results
}

fn is_latitude(value: f64) -> bool {
    (-LATITUDE_LIMIT..=LATITUDE_LIMIT).contains(&value)
}
