//! Click-to-category classification of hazard rasters.
//!
//! A click position is mapped to the hazard tile under it, the tile pixel is
//! sampled, and the pixel colour is resolved to the nearest legend entry of
//! the active layer. Every failure (unknown layer, missing legend, fetch
//! error, timeout, transparent pixel) yields `None`.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::coord::LonLat;
use crate::hazard::HazardCatalog;
use crate::legend::{LegendCatalog, Rgb};
use crate::sampler::PixelSampler;
use crate::tile::TileCoord;

/// Default bound on a single pixel sample.
pub const DEFAULT_SAMPLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Classifier tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierConfig {
    pub timeout: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_SAMPLE_TIMEOUT,
        }
    }
}

/// Legend category found under a click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub layer_id: String,
    pub layer_name: String,
    pub label: String,
    pub color: Rgb,
}

/// Resolves raster clicks against the hazard and legend catalogs.
#[derive(Debug, Clone)]
pub struct PixelClassifier<S> {
    layers: HazardCatalog,
    legends: LegendCatalog,
    sampler: S,
    config: ClassifierConfig,
}

impl<S: PixelSampler> PixelClassifier<S> {
    pub fn new(layers: HazardCatalog, legends: LegendCatalog, sampler: S) -> Self {
        Self::with_config(layers, legends, sampler, ClassifierConfig::default())
    }

    pub fn with_config(
        layers: HazardCatalog,
        legends: LegendCatalog,
        sampler: S,
        config: ClassifierConfig,
    ) -> Self {
        Self {
            layers,
            legends,
            sampler,
            config,
        }
    }

    pub fn layers(&self) -> &HazardCatalog {
        &self.layers
    }

    pub fn legends(&self) -> &LegendCatalog {
        &self.legends
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    pub fn config(&self) -> ClassifierConfig {
        self.config
    }

    /// Classify the hazard raster of `layer_id` at `point`.
    pub async fn classify(&self, point: LonLat, layer_id: &str, zoom: f64) -> Option<Classification> {
        let Some(layer) = self.layers.layer(layer_id) else {
            warn!(layer_id, "classification requested for unknown hazard layer");
            return None;
        };

        let tile = TileCoord::containing(point, layer.clamp_zoom(zoom));
        let Some(url) = layer.tile_url(&tile) else {
            debug!(layer_id, "hazard layer has no tile templates");
            return None;
        };
        let (col, row) = tile.bounds().pixel_at(point, layer.tile_size);
        debug!(%url, col, row, "sampling hazard tile");

        let pixel = match tokio::time::timeout(self.config.timeout, self.sampler.sample(&url, col, row)).await {
            Ok(Some(pixel)) => pixel,
            Ok(None) => return None,
            Err(_) => {
                warn!(%url, timeout_ms = self.config.timeout.as_millis() as u64, "tile sample timed out");
                return None;
            }
        };

        if pixel.is_transparent() {
            debug!(%url, "transparent pixel; nothing to classify");
            return None;
        }

        let Some(legend) = self.legends.get(layer_id) else {
            warn!(layer_id, "no legend configured for hazard layer");
            return None;
        };
        let entry = legend.nearest(pixel.rgb())?;

        Some(Classification {
            layer_id: layer.id.clone(),
            layer_name: legend.name.clone(),
            label: entry.label.clone(),
            color: entry.color,
        })
    }
}
