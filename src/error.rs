//! Error types for ocrlayout library.

use std::io;
use thiserror::Error;

/// Result type alias for ocrlayout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reconstructing a layout.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not valid JSON or does not match the analysis schema.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A structure required by the layout pass is absent.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (analysis has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Error during rendering (HTML, Markdown, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingField("analyzeResult".to_string());
        assert_eq!(err.to_string(), "Missing required field: analyzeResult");

        let err = Error::PageOutOfRange(3, 1);
        assert_eq!(
            err.to_string(),
            "Page 3 is out of range (analysis has 1 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().starts_with("JSON parsing error"));
    }
}
