//! Shared fixture helpers for integration tests.

use std::path::PathBuf;
use std::sync::Arc;

use hazardmap_lib::{DataPaths, Dataset, FuzzySearchIndex, LegendCatalog, Rgba, PixelSampler};

/// Path to the checked-in fixture datasets.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

#[allow(dead_code)]
pub fn fixture_paths() -> DataPaths {
    DataPaths::in_dir(&fixtures_dir())
}

#[allow(dead_code)]
pub fn fixture_dataset() -> Dataset {
    Dataset::load(&fixture_paths()).expect("load fixture datasets")
}

#[allow(dead_code)]
pub fn fixture_index() -> FuzzySearchIndex {
    FuzzySearchIndex::build(Arc::clone(&fixture_dataset().shelters))
}

#[allow(dead_code)]
pub fn fixture_legends() -> LegendCatalog {
    fixture_dataset().legends
}

/// Sampler answering every request with the same pixel.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub struct FixedSampler(pub Option<Rgba>);

impl PixelSampler for FixedSampler {
    async fn sample(&self, _url: &str, _col: u32, _row: u32) -> Option<Rgba> {
        self.0
    }
}
