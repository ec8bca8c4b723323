//! Error types for the palm reader.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, PalmError>;

#[derive(Error, Debug)]
pub enum PalmError {
    /// Raster dimensions or buffer size cannot describe an image.
    #[error("invalid raster image: {reason}")]
    InvalidImage { reason: String },

    /// Rules document is not a `{"linhas": {...}}` object.
    #[error("malformed rules table: {reason}")]
    MalformedRules { reason: String },

    #[error("image codec error on {}: {source}", path.display())]
    ImageCodec {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PalmError {
    pub(crate) fn invalid_image(reason: impl Into<String>) -> Self {
        Self::InvalidImage {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_rules(reason: impl Into<String>) -> Self {
        Self::MalformedRules {
            reason: reason.into(),
        }
    }
}
