//! Error types for PPTX URL validation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting URLs or writing the report.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read an input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// ZIP archive error (the package could not be unpacked).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// The report file could not be written.
    #[error("Report error: {0}")]
    ReportError(String),
}
