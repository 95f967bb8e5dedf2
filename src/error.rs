use std::io;
use std::path::PathBuf;

use jsonselect_parser::ParseError;
use thiserror::Error;

/// Result type alias for jsonselect operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for jsonselect operations
#[derive(Debug, Error)]
pub enum Error {
    /// A document file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The file that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The document text is not valid JSON
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// The selector text is not a valid selector
    #[error("invalid selector: {0}")]
    Parse(#[from] ParseError),
}

impl Error {
    /// Wrap an I/O error with the path it concerns
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
