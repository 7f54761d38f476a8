//! Error types for sfxmix
//!
//! Defines module-specific error types using thiserror for clear error propagation.
//!
//! Nothing in this crate is fatal to the host process: decode and device
//! failures are reported at the call boundary where they occur, and the
//! engine degrades to a silent no-op rather than unwinding.

use thiserror::Error;

/// Main error type for sfxmix
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Audio decoding errors (bad path, unsupported format)
    #[error("Audio decode error: {0}")]
    Decode(String),

    /// Audio output device errors
    #[error("Audio output error: {0}")]
    AudioOutput(String),

    /// Playback engine errors
    #[error("Playback error: {0}")]
    Playback(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using sfxmix Error
pub type Result<T> = std::result::Result<T, Error>;
