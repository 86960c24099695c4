//! Error types for the expression game library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Frame carried no landmark set
    #[error("No face detected")]
    NoFaceDetected,

    /// Landmark set present but unusable (missing indices, non-finite coordinates)
    #[error("Malformed landmark set: {0}")]
    MalformedLandmarkSet(String),

    /// Configuration rejected before a session could start
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Operation not allowed in the current game state
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Landmark recording could not be decoded
    #[error("Replay format error: {0}")]
    ReplayFormat(String),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is a per-frame condition that degrades to the `no-face` label
    #[must_use]
    pub fn is_frame_failure(&self) -> bool {
        matches!(self, Self::NoFaceDetected | Self::MalformedLandmarkSet(_))
    }
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
