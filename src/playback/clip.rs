//! Clip: one queued audio playback instance
//!
//! A clip pairs an immutable decoded PCM buffer with mutable per-playback
//! state: a cursor, a volume, and the loop/fade flags. The buffer itself is
//! shared by reference count — a clip created by decoding a file is the
//! first owner, clips cloned for the from-memory play path share the same
//! allocation with independent playback state, and the storage is released
//! when the last owner is destroyed. Borrowers never free.

use crate::audio::decode::decode_file;
use crate::audio::types::{AudioSpec, MAX_VOLUME};
use crate::error::Result;
use std::path::Path;
use std::sync::Arc;

/// What the mixer should do with a clip on this tick.
///
/// Derived from the loop/fade flags plus cursor exhaustion, so the mixer's
/// branching is an exhaustive match instead of nested boolean tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipPhase {
    /// Has remaining data and is not fading: mix normally
    Playing,

    /// Superseded music with remaining data: decay volume, then mix
    Fading,

    /// Exhausted music that should restart from the beginning
    Restarting,

    /// Finished one-shot, or music that faded to silence: remove
    Exhausted,
}

/// One unit of audio queued for playback.
///
/// Interleaved stereo i16 PCM plus playback state. Cheap to clone for the
/// from-memory play path: the sample buffer is shared, the state is fresh.
#[derive(Debug, Clone)]
pub struct Clip {
    /// Decoded PCM, immutable for the clip's lifetime
    samples: Arc<[i16]>,

    /// Format the samples were decoded at
    spec: AudioSpec,

    /// Read position within `samples`, advanced every mixer tick
    cursor: usize,

    /// true = music (restarts on exhaustion), false = one-shot
    looping: bool,

    /// Set when this music clip has been superseded; volume ramps to zero
    /// and the clip no longer restarts
    fading: bool,

    /// Current mix gain, 0 (silent) to MAX_VOLUME (unity)
    volume: u8,
}

impl Clip {
    /// Create a clip from raw interleaved stereo samples.
    pub fn from_samples(samples: Vec<i16>, spec: AudioSpec, looping: bool, volume: u8) -> Self {
        Self {
            samples: samples.into(),
            spec,
            cursor: 0,
            looping,
            fading: false,
            volume: volume.min(MAX_VOLUME),
        }
    }

    /// Decode a file into a new clip. The clip is the first owner of the
    /// decoded storage.
    ///
    /// # Errors
    /// `Error::Decode` on a bad path or unsupported format.
    pub fn load<P: AsRef<Path>>(path: P, looping: bool, volume: u8) -> Result<Self> {
        let decoded = decode_file(path)?;
        Ok(Self::from_samples(decoded.samples, decoded.spec, looping, volume))
    }

    /// Shallow-copy this clip's buffer for an independent playback.
    ///
    /// Shares the PCM storage; cursor, fade state, loop flag, and volume
    /// start fresh. The source clip is unaffected by anything the new
    /// playback does.
    pub fn clone_playback(&self, looping: bool, volume: u8) -> Self {
        Self {
            samples: Arc::clone(&self.samples),
            spec: self.spec,
            cursor: 0,
            looping,
            fading: false,
            volume: volume.min(MAX_VOLUME),
        }
    }

    /// Classify this clip for the current mixer tick.
    pub fn phase(&self) -> ClipPhase {
        if self.remaining() > 0 {
            if self.looping && self.fading {
                ClipPhase::Fading
            } else {
                ClipPhase::Playing
            }
        } else if self.looping && !self.fading {
            ClipPhase::Restarting
        } else {
            ClipPhase::Exhausted
        }
    }

    /// Samples left before the cursor reaches the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.samples.len() - self.cursor
    }

    /// Current cursor position in samples.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total buffer length in samples.
    pub fn len_samples(&self) -> usize {
        self.samples.len()
    }

    /// Format of the decoded buffer.
    pub fn spec(&self) -> AudioSpec {
        self.spec
    }

    /// Current mix gain.
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// true for music clips.
    pub fn is_music(&self) -> bool {
        self.looping
    }

    /// true while a superseded music clip ramps to silence.
    pub fn is_fading(&self) -> bool {
        self.fading
    }

    /// The unmixed window of up to `len` samples at the cursor.
    pub(crate) fn window(&self, len: usize) -> &[i16] {
        &self.samples[self.cursor..self.cursor + len.min(self.remaining())]
    }

    /// Advance the cursor after mixing `len` samples.
    pub(crate) fn advance(&mut self, len: usize) {
        debug_assert!(len <= self.remaining());
        self.cursor += len;
    }

    /// Mark this music clip as superseded.
    pub(crate) fn begin_fade(&mut self) {
        self.fading = true;
    }

    /// Decay volume by one fade step, floored at zero. Returns the volume
    /// after decay.
    pub(crate) fn decay(&mut self, step: u8) -> u8 {
        self.volume = self.volume.saturating_sub(step);
        self.volume
    }

    /// Force immediate eviction on the next tick: no remaining data, no gain.
    pub(crate) fn silence(&mut self) {
        self.cursor = self.samples.len();
        self.volume = 0;
    }

    /// Reset the cursor to the start of the buffer for another loop pass.
    pub(crate) fn restart(&mut self) {
        debug_assert!(self.looping && !self.fading);
        self.cursor = 0;
    }
}
