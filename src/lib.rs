//! # sfxmix
//!
//! Minimal real-time audio mixing engine for overlapping sound effects and
//! a single looping music track.
//!
//! **Purpose:** decode WAV clips, keep them in a playback queue, and mix
//! them into the audio device's output buffer once per buffer period.
//! Queueing a new music track fades out the old one; finished clips are
//! reclaimed by the mixer tick itself.
//!
//! **Architecture:** symphonia for decoding, cpal for device output, one
//! mutex-guarded queue shared between the caller threads and the device's
//! real-time callback.

pub mod audio;
pub mod config;
pub mod error;
pub mod playback;

pub use audio::types::{AudioSpec, MAX_VOLUME};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use playback::{AudioEngine, Clip};
