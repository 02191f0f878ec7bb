//! Error types for the wordspan library.

use std::io;
use thiserror::Error;

/// Result type alias for wordspan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading or exporting documents.
///
/// Structural defects inside a document (a version without pages, an empty
/// version list) are not errors: the store filters them and downstream
/// consumers degrade to empty outputs. Only genuinely fatal conditions
/// surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading a document file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document JSON could not be deserialized. A word object lacking
    /// an `id` lands here; ids are a precondition of the whole engine.
    #[error("document parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A timestamp string could not be interpreted.
    #[error("invalid timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),

    /// Error serializing derived series for the rendering layer.
    #[error("serialization error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Serialize("boom".to_string());
        assert_eq!(err.to_string(), "serialization error: boom");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_parse_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Parse(_)));
    }
}
