//! Error types for mdslides library.
//!
//! Compilation itself is total and never produces these errors; they cover
//! the surrounding I/O, configuration and serialization surfaces.

use std::io;
use thiserror::Error;

/// Result type alias for mdslides operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur outside the compile pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A theme identifier outside the supported set (strict parsing only).
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// A save was requested without a destination path.
    #[error("No file path given for save")]
    MissingPath,

    /// Error during rendering (JSON serialization, export).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Invalid configuration file or value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingPath;
        assert_eq!(err.to_string(), "No file path given for save");

        let err = Error::UnknownTheme("neon".to_string());
        assert_eq!(err.to_string(), "Unknown theme: neon");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
