//! Error types for meshdescent

use thiserror::Error;

/// Main error type for meshdescent operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load mesh from {path}: {message}")]
    Load { path: String, message: String },

    #[error("No geometry found: {0}")]
    EmptyGeometry(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Failed to export mesh to {path}: {message}")]
    Export { path: String, message: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl Error {
    /// Build a load error for `path`
    pub fn load(path: impl AsRef<std::path::Path>, message: impl ToString) -> Self {
        Error::Load {
            path: path.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }

    /// Build an export error for `path`
    pub fn export(path: impl AsRef<std::path::Path>, message: impl ToString) -> Self {
        Error::Export {
            path: path.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for meshdescent operations
pub type Result<T> = std::result::Result<T, Error>;
