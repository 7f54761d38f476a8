//! Engine facade: lifecycle and the public play operations
//!
//! Owns the device output and the queue mutex. Construction opens the
//! device and starts the stream; if either fails the engine comes up
//! disabled and every subsequent operation is a reported no-op — the
//! worst-case failure mode is "no audio plays", never a crash.
//!
//! Concurrency model: the queue mutex is the single synchronization
//! primitive. The device callback locks it for the duration of each mixer
//! tick; callers lock it only for the brief append/stop. Decoding happens
//! on the caller's thread before the lock is taken.

use crate::audio::output::AudioOutput;
use crate::config::EngineConfig;
use crate::playback::clip::Clip;
use crate::playback::mixer::mix_tick;
use crate::playback::queue::PlaybackQueue;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Real-time audio mixing engine.
///
/// Plays overlapping one-shot sound effects and a single looping music
/// track. Queueing a new music track crossfades out the old one.
///
/// # Examples
///
/// ```ignore
/// let engine = AudioEngine::new(EngineConfig::default());
/// engine.play_music("music.wav", 100);
/// engine.play_sound("blip.wav", 80);
/// ```
pub struct AudioEngine {
    config: EngineConfig,

    /// The single shared mutable resource, locked by play calls and by
    /// the device callback
    queue: Arc<Mutex<PlaybackQueue>>,

    /// Device output; None once shut down
    output: Option<AudioOutput>,

    /// false when device open or stream start failed; all operations
    /// become no-ops
    enabled: bool,
}

impl AudioEngine {
    /// Construct the engine and open the audio device.
    ///
    /// Device-open or stream-start failure is reported and leaves the
    /// engine in a disabled, inert state rather than failing construction:
    /// play, pause, and resume calls then do nothing.
    pub fn new(config: EngineConfig) -> Self {
        let queue = Arc::new(Mutex::new(PlaybackQueue::new(config.max_sounds)));

        let mut output = match AudioOutput::open(&config) {
            Ok(output) => output,
            Err(e) => {
                warn!("Audio disabled: {}", e);
                return Self {
                    config,
                    queue,
                    output: None,
                    enabled: false,
                };
            }
        };

        let callback_queue = Arc::clone(&queue);
        let fade_step = config.fade_step;

        let started = output.start(move |out: &mut [i16]| {
            let mut queue = callback_queue.lock().unwrap();
            mix_tick(&mut queue, out, fade_step);
        });

        match started {
            Ok(()) => {
                info!(
                    "Audio engine ready: {} ({} Hz, {} ch)",
                    output.device_name(),
                    output.sample_rate(),
                    output.channels()
                );
                Self {
                    config,
                    queue,
                    output: Some(output),
                    enabled: true,
                }
            }
            Err(e) => {
                warn!("Audio disabled: {}", e);
                Self {
                    config,
                    queue,
                    output: None,
                    enabled: false,
                }
            }
        }
    }

    /// true when the device opened and the stream is running.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Play a one-shot sound effect from a file.
    ///
    /// Decodes on the calling thread, then appends under the queue lock.
    /// Silently dropped when the one-shot ceiling is reached; load
    /// failures are reported and ignored.
    pub fn play_sound<P: AsRef<Path>>(&self, path: P, volume: u8) {
        self.play_file(path.as_ref(), false, volume);
    }

    /// Play a looping music track from a file, fading out the current one.
    pub fn play_music<P: AsRef<Path>>(&self, path: P, volume: u8) {
        self.play_file(path.as_ref(), true, volume);
    }

    /// Play a one-shot sound effect from an already-loaded clip.
    ///
    /// No disk access: the clip's PCM storage is shared, playback state is
    /// fresh. The source clip is not affected.
    pub fn play_sound_from_memory(&self, clip: &Clip, volume: u8) {
        if !self.enabled {
            return;
        }
        self.enqueue(clip.clone_playback(false, volume));
    }

    /// Play a looping music track from an already-loaded clip, fading out
    /// the current one.
    pub fn play_music_from_memory(&self, clip: &Clip, volume: u8) {
        if !self.enabled {
            return;
        }
        self.enqueue(clip.clone_playback(true, volume));
    }

    /// Stop the currently playing music track, if any.
    ///
    /// The clip is evicted on the next mixer tick; one-shot sounds keep
    /// playing.
    pub fn stop_music(&self) {
        if !self.enabled {
            return;
        }
        self.queue.lock().unwrap().stop_music();
    }

    /// Suspend device playback. Idempotent; no-op when disabled.
    pub fn pause(&self) {
        if !self.enabled {
            return;
        }
        if let Some(output) = &self.output {
            if let Err(e) = output.pause() {
                warn!("Pause failed: {}", e);
            }
        }
    }

    /// Resume device playback. Idempotent; no-op when disabled.
    pub fn resume(&self) {
        if !self.enabled {
            return;
        }
        if let Some(output) = &self.output {
            if let Err(e) = output.resume() {
                warn!("Resume failed: {}", e);
            }
        }
    }

    /// Stop the device and destroy every queued clip.
    ///
    /// Also runs on Drop; calling it explicitly is useful for ordering
    /// shutdown relative to other subsystems.
    pub fn shutdown(&mut self) {
        if let Some(mut output) = self.output.take() {
            if let Err(e) = output.pause() {
                warn!("Pause during shutdown failed: {}", e);
            }
            self.queue.lock().unwrap().clear();
            if let Err(e) = output.stop() {
                warn!("Stream stop failed: {}", e);
            }
        }
        self.enabled = false;
    }

    fn play_file(&self, path: &Path, looping: bool, volume: u8) {
        if !self.enabled {
            return;
        }

        // Decode outside the lock; only the append is serialized against
        // the mixer callback
        let clip = match Clip::load(path, looping, volume) {
            Ok(clip) => clip,
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
                return;
            }
        };

        if clip.spec() != self.config.spec() {
            warn!(
                "{} decoded at {} Hz / {} ch, device wants {} Hz / {} ch; playing unresampled",
                path.display(),
                clip.spec().sample_rate,
                clip.spec().channels,
                self.config.sample_rate,
                self.config.channels
            );
        }

        self.enqueue(clip);
    }

    fn enqueue(&self, clip: Clip) {
        let mut queue = self.queue.lock().unwrap();
        if clip.is_music() {
            queue.push_music(clip);
        } else {
            let _ = queue.push_sound(clip);
        }
    }
}

impl Drop for AudioEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
