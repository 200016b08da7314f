//! Error types for asset-platforms

use std::path::PathBuf;

use asset_meta::Platform;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] asset_fs::Error),

    #[error(transparent)]
    Content(#[from] asset_content::Error),

    #[error("No {platform} project configured: {message}")]
    Configuration { platform: Platform, message: String },

    #[error("{platform} project not found at {path}")]
    ProjectNotFound { platform: Platform, path: PathBuf },
}

impl Error {
    /// Whether the platform should be skipped rather than reported as failed.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::ProjectNotFound { .. })
    }
}
