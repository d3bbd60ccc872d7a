//! Shelter dataset loading.
//!
//! The dataset is a GeoJSON `FeatureCollection` of points, one per shelter,
//! keyed by the property names used in the Tokyo open data release. Records
//! are loaded once and never mutated; a record's identity is its position in
//! the collection.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::coord::LonLat;
use crate::error::{Error, Result};

/// Value used by the dataset to mark an accessibility feature as present.
const PRESENT_MARKER: &str = "○";

/// Index of a shelter within its source collection.
pub type ShelterId = usize;

/// Accessibility attributes recorded for a shelter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Accessibility {
    pub elevator_or_ground_floor: bool,
    pub slope: bool,
    pub tactile_paving: bool,
    pub accessible_toilet: bool,
    pub other: bool,
}

/// A single accessibility feature, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessibilityFeature {
    ElevatorOrGroundFloor,
    Slope,
    TactilePaving,
    AccessibleToilet,
    Other,
}

impl AccessibilityFeature {
    /// Label shown in the shelter popup.
    pub fn label(self) -> &'static str {
        match self {
            AccessibilityFeature::ElevatorOrGroundFloor => "エレベーター有り/避難スペースが1階",
            AccessibilityFeature::Slope => "スロープ等有り",
            AccessibilityFeature::TactilePaving => "点字ブロック有り",
            AccessibilityFeature::AccessibleToilet => "車椅子使用者対応トイレ有り",
            AccessibilityFeature::Other => "その他",
        }
    }
}

/// Immutable shelter record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelterRecord {
    pub name: String,
    pub address: String,
    pub admin_code: i64,
    pub prefecture: Option<String>,
    pub municipality: Option<String>,
    pub position: LonLat,
    pub accessibility: Accessibility,
}

impl ShelterRecord {
    /// Accessibility features marked present, in display order.
    pub fn accessibility_features(&self) -> Vec<AccessibilityFeature> {
        let a = &self.accessibility;
        [
            (a.elevator_or_ground_floor, AccessibilityFeature::ElevatorOrGroundFloor),
            (a.slope, AccessibilityFeature::Slope),
            (a.tactile_paving, AccessibilityFeature::TactilePaving),
            (a.accessible_toilet, AccessibilityFeature::AccessibleToilet),
            (a.other, AccessibilityFeature::Other),
        ]
        .into_iter()
        .filter_map(|(present, feature)| present.then_some(feature))
        .collect()
    }

    /// Popup content for this shelter.
    pub fn details(&self) -> ShelterDetails {
        ShelterDetails {
            name: self.name.clone(),
            address: self.address.clone(),
            position: self.position,
            accessibility: self.accessibility_features(),
        }
    }
}

/// Data shown when a shelter is clicked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelterDetails {
    pub name: String,
    pub address: String,
    pub position: LonLat,
    pub accessibility: Vec<AccessibilityFeature>,
}

#[derive(Debug, Deserialize)]
struct RawCollection {
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    properties: RawProperties,
    geometry: RawPoint,
}

#[derive(Debug, Deserialize)]
struct RawPoint {
    coordinates: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct RawProperties {
    #[serde(rename = "避難所_施設名称")]
    name: String,
    #[serde(rename = "所在地住所")]
    address: String,
    #[serde(rename = "地方公共団体コード")]
    admin_code: i64,
    #[serde(rename = "都道府県", default)]
    prefecture: Option<String>,
    #[serde(rename = "指定市区町村名", default)]
    municipality: Option<String>,
    #[serde(rename = "エレベーター有/\n避難スペースが１階", default)]
    elevator: Option<String>,
    #[serde(rename = "スロープ等", default)]
    slope: Option<String>,
    #[serde(rename = "点字ブロック", default)]
    tactile_paving: Option<String>,
    #[serde(rename = "車椅子使用者対応トイレ", default)]
    toilet: Option<String>,
    #[serde(rename = "その他", default)]
    other: Option<String>,
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim) == Some(PRESENT_MARKER)
}

impl From<RawFeature> for ShelterRecord {
    fn from(feature: RawFeature) -> Self {
        let props = feature.properties;
        let [lon, lat] = feature.geometry.coordinates;
        Self {
            name: props.name,
            address: props.address,
            admin_code: props.admin_code,
            prefecture: props.prefecture,
            municipality: props.municipality,
            position: LonLat::new(lon, lat),
            accessibility: Accessibility {
                elevator_or_ground_floor: is_present(&props.elevator),
                slope: is_present(&props.slope),
                tactile_paving: is_present(&props.tactile_paving),
                accessible_toilet: is_present(&props.toilet),
                other: is_present(&props.other),
            },
        }
    }
}

/// Load shelter records from a GeoJSON file.
pub fn load_shelters(path: &Path) -> Result<Vec<ShelterRecord>> {
    if !path.exists() {
        return Err(Error::DatasetNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = fs::File::open(path)?;
    let records = parse_shelters(file).map_err(|source| Error::DatasetParse {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), count = records.len(), "loaded shelter dataset");
    Ok(records)
}

/// Parse shelter records from any reader yielding GeoJSON.
pub fn parse_shelters<R: Read>(reader: R) -> std::result::Result<Vec<ShelterRecord>, serde_json::Error> {
    let collection: RawCollection = serde_json::from_reader(reader)?;
    let records: Vec<ShelterRecord> = collection
        .features
        .into_iter()
        .map(ShelterRecord::from)
        .collect();
    debug!(count = records.len(), "parsed shelter features");
    Ok(records)
}
