//! Hazard raster layer catalog.
//!
//! Mirrors the raster sources of the hazard map portal
//! (<https://disaportal.gsi.go.jp/hazardmap/copyright/opendata.html>).

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::tile::TileCoord;

/// Highest zoom level the hazard rasters are published at.
pub const HAZARD_MAX_ZOOM: u8 = 17;

/// Lowest zoom level the hazard rasters are published at.
pub const HAZARD_MIN_ZOOM: u8 = 2;

/// Side length of the hazard raster tiles in pixels.
pub const HAZARD_TILE_SIZE: u32 = 256;

const PORTAL_BASE: &str = "https://disaportaldata.gsi.go.jp/raster";

/// Minimum similarity for "did you mean" layer suggestions.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// A raster hazard layer and its backing tile source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HazardLayer {
    /// Layer id, also the key into the legend dataset.
    pub id: String,
    /// Raster source id.
    pub source: String,
    /// Display name.
    pub name: String,
    /// Tile URL templates containing `{z}`, `{x}` and `{y}`.
    pub tiles: Vec<String>,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub tile_size: u32,
}

impl HazardLayer {
    fn portal(id: &str, source: &str, name: &str, dataset: &str) -> Self {
        Self {
            id: id.to_string(),
            source: source.to_string(),
            name: name.to_string(),
            tiles: vec![format!("{PORTAL_BASE}/{dataset}/{{z}}/{{x}}/{{y}}.png")],
            min_zoom: HAZARD_MIN_ZOOM,
            max_zoom: HAZARD_MAX_ZOOM,
            tile_size: HAZARD_TILE_SIZE,
        }
    }

    /// URL of `tile` from the first template, if the source has one.
    pub fn tile_url(&self, tile: &TileCoord) -> Option<String> {
        self.tiles.first().map(|template| tile.fill_template(template))
    }

    /// Round `zoom` to an integer level no higher than this layer's maximum.
    pub fn clamp_zoom(&self, zoom: f64) -> u8 {
        if !zoom.is_finite() || zoom <= 0.0 {
            return 0;
        }
        (zoom.round() as u64).min(self.max_zoom as u64) as u8
    }
}

static BUILTIN_LAYERS: Lazy<Vec<HazardLayer>> = Lazy::new(|| {
    vec![
        HazardLayer::portal("flood_layer", "flood", "洪水浸水想定区域", "01_flood_l2_shinsuishin_data"),
        HazardLayer::portal("hightide_layer", "hightide", "高潮浸水想定区域", "03_hightide_l2_shinsuishin_data"),
        HazardLayer::portal("tsunami_layer", "tsunami", "津波浸水想定", "04_tsunami_newlegend_data"),
        HazardLayer::portal("doseki_layer", "doseki", "土石流", "05_dosekiryukeikaikuiki"),
        HazardLayer::portal("kyukeisha_layer", "kyukeisha", "急傾斜地", "05_kyukeishakeikaikuiki"),
        HazardLayer::portal("jisuberi_layer", "jisuberi", "地滑り", "05_jisuberikeikaikuiki"),
    ]
});

/// Ordered set of hazard layers.
#[derive(Debug, Clone, Default)]
pub struct HazardCatalog {
    layers: Vec<HazardLayer>,
}

impl HazardCatalog {
    pub fn new(layers: Vec<HazardLayer>) -> Self {
        Self { layers }
    }

    /// The six hazard rasters of the portal.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_LAYERS.clone())
    }

    pub fn layer(&self, id: &str) -> Option<&HazardLayer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    /// Like [`HazardCatalog::layer`], but an unknown id becomes an error
    /// carrying close matches.
    pub fn require(&self, id: &str) -> Result<&HazardLayer> {
        self.layer(id).ok_or_else(|| Error::UnknownHazardLayer {
            id: id.to_string(),
            suggestions: self.suggestions(id, 3),
        })
    }

    /// Layer ids similar to `id`, best first.
    pub fn suggestions(&self, id: &str, limit: usize) -> Vec<String> {
        let mut scored = self
            .layers
            .iter()
            .map(|layer| (strsim::jaro_winkler(id, &layer.id), &layer.id))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect::<Vec<_>>();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, id)| id.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HazardLayer> {
        self.layers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_six_layers() {
        let catalog = HazardCatalog::builtin();
        assert_eq!(catalog.iter().count(), 6);
        let flood = catalog.layer("flood_layer").expect("flood layer");
        assert_eq!(flood.max_zoom, 17);
        assert_eq!(
            flood.tiles[0],
            "https://disaportaldata.gsi.go.jp/raster/01_flood_l2_shinsuishin_data/{z}/{x}/{y}.png"
        );
    }

    #[test]
    fn tile_url_uses_first_template() {
        let catalog = HazardCatalog::builtin();
        let layer = catalog.layer("tsunami_layer").unwrap();
        let url = layer.tile_url(&TileCoord { z: 14, x: 14552, y: 6451 }).unwrap();
        assert!(url.ends_with("/04_tsunami_newlegend_data/14/14552/6451.png"));
    }

    #[test]
    fn layer_without_templates_has_no_url() {
        let mut layer = HazardCatalog::builtin().layer("doseki_layer").unwrap().clone();
        layer.tiles.clear();
        assert!(layer.tile_url(&TileCoord { z: 1, x: 0, y: 0 }).is_none());
    }

    #[test]
    fn zoom_is_rounded_and_clamped() {
        let catalog = HazardCatalog::builtin();
        let layer = catalog.layer("flood_layer").unwrap();
        assert_eq!(layer.clamp_zoom(12.4), 12);
        assert_eq!(layer.clamp_zoom(12.5), 13);
        assert_eq!(layer.clamp_zoom(19.2), 17);
        assert_eq!(layer.clamp_zoom(-1.0), 0);
    }

    #[test]
    fn unknown_layer_suggests_close_ids() {
        let catalog = HazardCatalog::builtin();
        let err = catalog.require("flod_layer").expect_err("unknown layer");
        let message = err.to_string();
        assert!(message.contains("unknown hazard layer: flod_layer"));
        assert!(message.contains("flood_layer"));
    }
}
