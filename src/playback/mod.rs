//! The playback core: clip lifecycle, queue, mixer tick, and engine facade

pub mod clip;
pub mod engine;
pub mod mixer;
pub mod queue;

pub use clip::{Clip, ClipPhase};
pub use engine::AudioEngine;
pub use mixer::mix_tick;
pub use queue::PlaybackQueue;
