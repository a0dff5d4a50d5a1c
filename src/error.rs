//! Error types for the squat critique library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// `OpenCV` operation failed
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// `ONNX` Runtime inference failed
    #[error("ONNX Runtime error: {0}")]
    OnnxRuntime(#[from] ort::Error),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input video unreadable or unopenable
    #[error("Input error: {0}")]
    Input(String),

    /// No person was detected in any frame of the video
    #[error("No person detected in any frame of the video")]
    NoDetection,

    /// Angle computation over coincident points
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Pose detector or critique service failure, surfaced without retry
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
