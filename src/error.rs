//! Error handling for Replaycheck
//!
//! All fatal conditions surface here; degenerate numeric cases
//! (zero-variance correlation, all-silent recordings) are defined
//! outputs of the analysis functions and never become errors.

use thiserror::Error;

/// Result type alias for Replaycheck operations
pub type Result<T> = std::result::Result<T, ReplaycheckError>;

/// Main error type for Replaycheck operations
#[derive(Error, Debug)]
pub enum ReplaycheckError {
    // File Errors
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Decode Errors
    #[error("Truncated frame: {byte_len} bytes is not a multiple of the {frame_bytes}-byte frame size")]
    TruncatedFrame { byte_len: usize, frame_bytes: usize },

    #[error("Unsupported sample width: {bits} bits (only 16-bit signed PCM supported)")]
    UnsupportedWidth { bits: u16 },

    // Parameter Errors
    #[error("Invalid threshold: {value} (must be a non-negative integer)")]
    InvalidThreshold { value: i64 },

    #[error("Channel count mismatch: {left_channels} vs {right_channels}")]
    ShapeMismatch {
        left_channels: usize,
        right_channels: usize,
    },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReplaycheckError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            ReplaycheckError::FileNotFound { .. } => "FILE_NOT_FOUND",
            ReplaycheckError::InvalidAudio { .. } => "INVALID_AUDIO",
            ReplaycheckError::TruncatedFrame { .. } => "TRUNCATED_FRAME",
            ReplaycheckError::UnsupportedWidth { .. } => "UNSUPPORTED_WIDTH",
            ReplaycheckError::InvalidThreshold { .. } => "INVALID_THRESHOLD",
            ReplaycheckError::ShapeMismatch { .. } => "SHAPE_MISMATCH",
            ReplaycheckError::Io(_) => "IO_ERROR",
            ReplaycheckError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}
