//! Subcommand handlers.
//!
//! `main.rs` parses arguments and dispatches here; each module owns one
//! subcommand.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use hazardmap_lib::{DataPaths, Dataset, FuzzySearchIndex, GeocodeAdapter};

use crate::output::OutputFormat;

pub mod classify;
pub mod legend;
pub mod measure;
pub mod reach;
pub mod reverse;
pub mod search;
pub mod shelter;

/// Global options every handler receives.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    pub data_dir: Option<PathBuf>,
    pub format: OutputFormat,
}

impl AppContext {
    pub fn new(data_dir: Option<PathBuf>, format: OutputFormat) -> Self {
        Self { data_dir, format }
    }

    pub fn data_paths(&self) -> Result<DataPaths> {
        DataPaths::resolve(self.data_dir.as_deref()).context("failed to resolve the data directory")
    }

    pub fn load_dataset(&self) -> Result<Dataset> {
        let paths = self.data_paths()?;
        debug!(shelters = %paths.shelters.display(), legend = %paths.legend.display(), "loading datasets");
        Dataset::load(&paths).with_context(|| {
            format!(
                "failed to load datasets ({} / {})",
                paths.shelters.display(),
                paths.legend.display()
            )
        })
    }

    pub fn geocoder(&self) -> Result<GeocodeAdapter> {
        let dataset = self.load_dataset()?;
        Ok(GeocodeAdapter::new(FuzzySearchIndex::build(Arc::clone(
            &dataset.shelters,
        ))))
    }
}
