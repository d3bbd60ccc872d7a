//! Interactive map session.
//!
//! [`MapSession`] owns the state one map view accumulates (active hazard
//! layer, measurement vertices) and routes click and viewport events to the
//! components. Nothing here is global; two sessions never share state.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::classify::{ClassifierConfig, PixelClassifier};
use crate::coord::LonLat;
use crate::dataset::Dataset;
use crate::geocode::GeocodeAdapter;
use crate::hazard::HazardCatalog;
use crate::legend::{HazardLegend, Rgb};
use crate::measure::{DistanceMeasurer, MeasurementSnapshot, PointId};
use crate::reach::{ReachAreaBuilder, ReachPolygon, REACH_MIN_ZOOM};
use crate::sampler::PixelSampler;
use crate::search::FuzzySearchIndex;
use crate::shelter::{ShelterDetails, ShelterId, ShelterRecord};

/// Popup content for a classified hazard pixel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HazardPopup {
    pub layer_name: String,
    pub label: String,
    pub color: Rgb,
}

/// Result of a primary click.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClickOutcome {
    Shelter(ShelterDetails),
    Hazard(HazardPopup),
    Nothing,
}

/// What the "buffer" source should do after a viewport change.
#[derive(Debug, Clone, PartialEq)]
pub enum ReachUpdate {
    /// Zoomed out too far; the reach layer is hidden.
    Hidden,
    /// Replace the source with this polygon.
    Set(ReachPolygon),
    /// Empty the source.
    Clear,
    /// Keep whatever is shown.
    Unchanged,
}

/// Session-scoped state and event routing for one map view.
pub struct MapSession<S> {
    shelters: Arc<Vec<ShelterRecord>>,
    geocoder: GeocodeAdapter,
    classifier: PixelClassifier<S>,
    measurer: DistanceMeasurer,
    reach: ReachAreaBuilder,
    active_hazard: Option<String>,
}

impl<S: PixelSampler> MapSession<S> {
    pub fn new(dataset: Dataset, sampler: S) -> Self {
        Self::with_config(dataset, sampler, ClassifierConfig::default())
    }

    pub fn with_config(dataset: Dataset, sampler: S, config: ClassifierConfig) -> Self {
        let index = FuzzySearchIndex::build(Arc::clone(&dataset.shelters));
        Self {
            shelters: dataset.shelters,
            geocoder: GeocodeAdapter::new(index),
            classifier: PixelClassifier::with_config(
                HazardCatalog::builtin(),
                dataset.legends,
                sampler,
                config,
            ),
            measurer: DistanceMeasurer::new(),
            reach: ReachAreaBuilder::new(),
            active_hazard: None,
        }
    }

    pub fn shelters(&self) -> &[ShelterRecord] {
        &self.shelters
    }

    pub fn geocoder(&self) -> &GeocodeAdapter {
        &self.geocoder
    }

    pub fn classifier(&self) -> &PixelClassifier<S> {
        &self.classifier
    }

    pub fn measurer(&self) -> &DistanceMeasurer {
        &self.measurer
    }

    pub fn active_hazard(&self) -> Option<&str> {
        self.active_hazard.as_deref()
    }

    /// Make `layer_id` the layer primary clicks classify against and return
    /// its legend. An unknown id leaves the active layer as it was.
    pub fn select_hazard(&mut self, layer_id: &str) -> Option<&HazardLegend> {
        if self.classifier.layers().layer(layer_id).is_none() {
            warn!(layer_id, "ignoring selection of unknown hazard layer");
            return None;
        }
        self.active_hazard = Some(layer_id.to_string());
        debug!(layer_id, "active hazard layer changed");
        self.classifier.legends().get(layer_id)
    }

    /// Handle a primary click at `point`.
    ///
    /// `hit` is the shelter the map's hit-test found under the cursor, if
    /// any. The measurement is discarded on every primary click.
    pub async fn primary_click(&mut self, point: LonLat, hit: Option<ShelterId>, zoom: f64) -> ClickOutcome {
        self.measurer.reset();

        if let Some(id) = hit {
            match self.shelters.get(id) {
                Some(record) => return ClickOutcome::Shelter(record.details()),
                None => warn!(id, "hit-test reported an unknown shelter"),
            }
        }

        let Some(layer_id) = self.active_hazard.as_deref() else {
            debug!("no active hazard layer; click ignored");
            return ClickOutcome::Nothing;
        };

        match self.classifier.classify(point, layer_id, zoom).await {
            Some(found) => ClickOutcome::Hazard(HazardPopup {
                layer_name: found.layer_name,
                label: found.label,
                color: found.color,
            }),
            None => ClickOutcome::Nothing,
        }
    }

    /// Handle a secondary click: remove the hit vertex or add one at `point`.
    pub fn secondary_click(&mut self, point: LonLat, hit_point: Option<PointId>) -> MeasurementSnapshot {
        self.measurer.toggle_vertex(point, hit_point);
        self.measurer.snapshot()
    }

    /// Recompute the reach area after the viewport or radius changed.
    ///
    /// `points` are the shelters currently loaded in the view.
    pub fn update_reach(&self, zoom: f64, radius_m: f64, points: &[LonLat]) -> ReachUpdate {
        if zoom < REACH_MIN_ZOOM {
            return ReachUpdate::Hidden;
        }
        match self.reach.compute_reach_at(points, radius_m) {
            Some(polygon) if polygon.is_empty() => ReachUpdate::Clear,
            Some(polygon) => ReachUpdate::Set(polygon),
            None => ReachUpdate::Unchanged,
        }
    }
}
