use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the hazard map library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Only raised while loading datasets or configuration. Interactive
/// operations (search, classification, measurement, reach) degrade to empty
/// results instead of returning these.
#[derive(Debug, Error)]
pub enum Error {
    /// Dataset could not be located at the resolved path.
    #[error("dataset not found at {path}")]
    DatasetNotFound { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the dataset location")]
    ProjectDirsUnavailable,

    /// Raised when a dataset file could not be parsed.
    #[error("failed to parse {path}: {source}")]
    DatasetParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Raised when a legend colour string is not a recognised colour.
    #[error("invalid legend colour: {value}")]
    InvalidColor { value: String },

    /// Raised when a hazard layer id is not part of the catalog.
    #[error("unknown hazard layer: {id}{}", format_suggestions(.suggestions))]
    UnknownHazardLayer {
        id: String,
        suggestions: Vec<String>,
    },

    /// Raised when a coordinate pair cannot be interpreted.
    #[error("invalid coordinate: {message}")]
    InvalidCoordinate { message: String },

    /// Raised when a tile image could not be fetched.
    #[error("failed to fetch tile {url}: status {status}")]
    TileFetch { url: String, status: u16 },

    /// Raised when a tile image could not be decoded.
    #[error(transparent)]
    TileDecode(#[from] image::ImageError),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
