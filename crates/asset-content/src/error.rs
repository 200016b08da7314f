//! Error types for asset-content

/// Result type for asset-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in asset-content operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse {format} content at line {line}: {message}")]
    Parse {
        format: String,
        line: usize,
        message: String,
    },

    #[error("Malformed {format} document: {message}")]
    Structure { format: String, message: String },

    #[error(transparent)]
    Fs(#[from] asset_fs::Error),
}

impl Error {
    pub fn parse(format: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            format: format.into(),
            line,
            message: message.into(),
        }
    }

    pub fn structure(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Structure {
            format: format.into(),
            message: message.into(),
        }
    }
}

/// 1-based line number of a byte offset.
pub(crate) fn line_at(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}
