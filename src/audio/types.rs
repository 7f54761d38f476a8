//! Core audio data types
//!
//! The engine works in one fixed sample layout: interleaved stereo 16-bit
//! signed samples. Decoded clips carry an [`AudioSpec`] describing the rate
//! and channel count they were produced at so mismatches with the device
//! can be reported (the engine does not resample).

/// Maximum mix gain. A clip at this volume mixes at unity.
pub const MAX_VOLUME: u8 = 128;

/// Sample rate and channel layout of a PCM buffer or device stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSpec {
    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Channel count (2 = interleaved stereo)
    pub channels: u16,
}

impl AudioSpec {
    /// Duration in milliseconds of `sample_count` interleaved samples
    pub fn duration_ms(&self, sample_count: usize) -> u64 {
        let frames = sample_count as u64 / self.channels.max(1) as u64;
        frames * 1000 / self.sample_rate.max(1) as u64
    }
}
