use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use once_cell::sync::Lazy;
use tracing::{debug, info, warn};

use crate::classify::{ClassifierConfig, DEFAULT_SAMPLE_TIMEOUT};
use crate::error::{Error, Result};
use crate::legend::LegendCatalog;
use crate::shelter::{load_shelters, ShelterRecord};

/// File name of the shelter point dataset.
pub const SHELTER_FILENAME: &str = "shelter_point.json";

/// File name of the hazard legend dataset.
pub const LEGEND_FILENAME: &str = "hazard_legend.json";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "HAZARDMAP_DATA_DIR";

/// Environment variable overriding the sampler timeout, in whole seconds.
pub const SAMPLER_TIMEOUT_ENV: &str = "HAZARDMAP_SAMPLER_TIMEOUT_SECS";

/// Checked-in fixture directory, when the source tree is available.
static FIXTURE_DATA_DIR: Lazy<Option<PathBuf>> = Lazy::new(|| {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures");
    path.canonicalize().ok()
});

/// Locations of the two datasets the map needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub shelters: PathBuf,
    pub legend: PathBuf,
}

impl DataPaths {
    /// Both datasets inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            shelters: dir.join(SHELTER_FILENAME),
            legend: dir.join(LEGEND_FILENAME),
        }
    }

    /// Resolve the data directory in this order:
    ///
    /// 1. `explicit` (the CLI `--data-dir` flag).
    /// 2. `HAZARDMAP_DATA_DIR` environment variable.
    /// 3. Platform-specific project data directory.
    /// 4. In debug builds, `docs/fixtures` when step 3 holds no datasets.
    ///
    /// Files are not required to exist yet; loading reports
    /// [`Error::DatasetNotFound`].
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        resolve_with(explicit, env::var_os(DATA_DIR_ENV))
    }

    pub fn exists(&self) -> bool {
        self.shelters.exists() && self.legend.exists()
    }
}

fn resolve_with(explicit: Option<&Path>, env_dir: Option<OsString>) -> Result<DataPaths> {
    if let Some(dir) = explicit {
        debug!(dir = %dir.display(), "using explicit data directory");
        return Ok(DataPaths::in_dir(dir));
    }

    if let Some(dir) = env_dir.filter(|value| !value.is_empty()) {
        let dir = PathBuf::from(dir);
        debug!(dir = %dir.display(), "using {DATA_DIR_ENV}");
        return Ok(DataPaths::in_dir(&dir));
    }

    let default = DataPaths::in_dir(&default_data_dir()?);
    if default.exists() {
        return Ok(default);
    }

    if cfg!(debug_assertions) {
        if let Some(fixtures) = FIXTURE_DATA_DIR.as_ref() {
            info!(dir = %fixtures.display(), "no installed datasets; falling back to fixtures");
            return Ok(DataPaths::in_dir(fixtures));
        }
    }

    Ok(default)
}

/// Platform-specific data directory for the datasets.
pub fn default_data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("jp", "hazardmap", "hazardmap").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Shelter records and legends, loaded once and shared by the components.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub shelters: Arc<Vec<ShelterRecord>>,
    pub legends: LegendCatalog,
}

impl Dataset {
    pub fn load(paths: &DataPaths) -> Result<Self> {
        let shelters = load_shelters(&paths.shelters)?;
        let legends = LegendCatalog::from_path(&paths.legend)?;
        info!(
            shelters = shelters.len(),
            legends = legends.len(),
            "datasets loaded"
        );
        Ok(Self {
            shelters: Arc::new(shelters),
            legends,
        })
    }
}

/// Classifier configuration with the timeout taken from the environment.
pub fn classifier_config_from_env() -> ClassifierConfig {
    ClassifierConfig {
        timeout: parse_timeout(env::var(SAMPLER_TIMEOUT_ENV).ok().as_deref()),
    }
}

fn parse_timeout(value: Option<&str>) -> Duration {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return DEFAULT_SAMPLE_TIMEOUT;
    };
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Duration::from_secs(secs),
        _ => {
            warn!(value = raw, "ignoring invalid {SAMPLER_TIMEOUT_ENV}");
            DEFAULT_SAMPLE_TIMEOUT
        }
    }
}
