//! Error types for the saoke library.
//!
//! Extraction itself is total and never fails; errors exist only at the
//! edges (configuration loading/validation and the OCR adapter boundary).

use thiserror::Error;

/// Main error type for the saoke library.
#[derive(Error, Debug)]
pub enum SaokeError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// OCR collaborator adapter error.
    #[error("OCR adapter error: {0}")]
    Ocr(#[from] OcrError),
}

/// Errors related to engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A field was configured with no label variants.
    #[error("field {0} has no label variants")]
    EmptyVariants(&'static str),

    /// No currency suffix tokens configured.
    #[error("no currency suffix tokens configured")]
    EmptySuffixes,

    /// No time or date separators configured.
    #[error("no {0} separators configured")]
    EmptySeparators(&'static str),

    /// Identity threshold outside the accepted score range.
    #[error("identity threshold {0} is outside [0, 100]")]
    ThresholdOutOfRange(f64),

    /// Identity measure set is empty.
    #[error("no similarity measures configured")]
    EmptyMeasures,

    /// Diagnostic line echo cap must be at least 1.
    #[error("echo limit must be at least 1")]
    ZeroEchoLimit,

    /// A configured token produced an invalid pattern.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Failed to read a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a configuration file.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors at the OCR collaborator boundary.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The recognizer payload matches none of the known result shapes.
    #[error("recognizer payload matches no known result shape")]
    UnknownShape,

    /// The recognizer itself reported a failure.
    #[error("recognizer failed: {0}")]
    Recognizer(String),
}

/// Result type for the saoke library.
pub type Result<T> = std::result::Result<T, SaokeError>;
