//! Error types for asset-core

use std::path::PathBuf;

use asset_meta::Platform;

/// Result type for asset-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while linking
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The platform has no usable project; it is skipped, not failed
    #[error("No {platform} project: {message}")]
    Configuration { platform: Platform, message: String },

    /// The manifest exists but is not a manifest
    #[error("Failed to parse manifest at {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// The discovery task did not complete
    #[error("Asset discovery failed: {message}")]
    Discovery { message: String },

    #[error(transparent)]
    Fs(#[from] asset_fs::Error),

    #[error(transparent)]
    Meta(#[from] asset_meta::Error),

    #[error(transparent)]
    Platforms(#[from] asset_platforms::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the platform should be reported as skipped.
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::Configuration { .. } => true,
            Self::Platforms(err) => err.is_configuration(),
            _ => false,
        }
    }
}
