//! Hazard map library entry points.
//!
//! This crate holds the non-rendering core of the disaster-prep map: shelter
//! search and geocoding, hazard raster classification, distance measurement
//! and shelter reach areas. Front ends (the CLI, a map UI) drive it through
//! [`MapSession`] or the individual components exported here.

pub mod classify;
pub mod coord;
pub mod dataset;
pub mod error;
pub mod geocode;
pub mod hazard;
pub mod legend;
pub mod measure;
pub mod normalize;
pub mod reach;
pub mod sampler;
pub mod search;
pub mod session;
pub mod shelter;
pub mod tile;

pub use classify::{Classification, ClassifierConfig, PixelClassifier};
pub use coord::LonLat;
pub use dataset::{classifier_config_from_env, default_data_dir, DataPaths, Dataset};
pub use error::{Error, Result};
pub use geocode::{reverse_geocode, GeocodeAdapter, PlaceResult};
pub use hazard::{HazardCatalog, HazardLayer};
pub use legend::{HazardLegend, LegendCatalog, LegendEntry, Rgb, Rgba};
pub use measure::{DistanceMeasurer, MeasurementSnapshot, PointId, VertexChange};
pub use normalize::normalize;
pub use reach::{ReachAreaBuilder, ReachPolygon, REACH_MIN_ZOOM};
pub use sampler::{HttpTileSampler, PixelSampler};
pub use search::{FuzzySearchIndex, SearchHit, SearchOptions};
pub use session::{ClickOutcome, HazardPopup, MapSession, ReachUpdate};
pub use shelter::{load_shelters, AccessibilityFeature, ShelterDetails, ShelterId, ShelterRecord};
pub use tile::TileCoord;
