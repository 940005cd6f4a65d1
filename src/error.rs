//! Error types for the push-up counter library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// `OpenCV` operation failed
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// `ONNX` Runtime inference failed
    #[error("ONNX Runtime error: {0}")]
    OnnxRuntime(#[from] ort::OrtError),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Reference segment or angle vectors collapsed to zero length
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Pose model returned no person, or a keypoint is absent or not finite
    #[error("Missing detection: {0}")]
    MissingDetection(String),

    /// Video folder, video file or camera could not be acquired
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model input configuration error
    #[error("Model input error: {0}")]
    ModelInputError(String),

    /// Model output processing error
    #[error("Model output error: {0}")]
    ModelOutputError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Whether the error only invalidates the current frame
    #[must_use]
    pub fn is_frame_local(&self) -> bool {
        matches!(self, Self::DegenerateGeometry(_) | Self::MissingDetection(_))
    }
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
