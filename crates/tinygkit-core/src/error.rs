//! Error handling for TinyGKit
//!
//! Provides the error types used across the workspace:
//! - Frame errors (decoding a single line received from the device)
//! - The unified `Error` used by public APIs that touch I/O
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Frame decoding error type
///
/// Describes why a received line could not be turned into a JSON object.
/// These are expected on a noisy serial link and are absorbed by the
/// controller rather than propagated to callers.
#[derive(Error, Debug)]
pub enum FrameError {
    /// The line was empty after trimming
    #[error("Empty frame")]
    Empty,

    /// The line does not start with `{`
    #[error("Not a JSON frame: {line}")]
    NotJson {
        /// The offending line.
        line: String,
    },

    /// The line looked like JSON but failed to decode
    #[error("Malformed JSON frame: {0}")]
    Json(#[from] serde_json::Error),
}

impl FrameError {
    /// Check if this error is caused by a corrupted JSON payload
    pub fn is_corrupted(&self) -> bool {
        matches!(self, FrameError::Json(_))
    }
}

/// Main error type for TinyGKit
///
/// A unified error type for operations that read from external sources.
#[derive(Error, Debug)]
pub enum Error {
    /// Frame error
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
