//! Playback queue: the active clips, in insertion order
//!
//! Append-at-tail, remove-from-anywhere. The mixer walks clips oldest
//! first each tick; insertion routes music through the crossfade pass so
//! at most one music clip is in the non-fading state at any time.
//!
//! The queue is the engine's single shared mutable resource. It is always
//! accessed under the engine's queue mutex — by callers for the brief
//! append/stop, and by the device callback for the whole mixer tick.

use crate::playback::clip::Clip;
use tracing::debug;

/// Queue of active clips plus the one-shot counter.
pub struct PlaybackQueue {
    /// Active clips, oldest first
    clips: Vec<Clip>,

    /// Currently queued one-shot clips; never exceeds `max_sounds`
    sound_count: usize,

    /// One-shot ceiling; requests beyond it are silently dropped
    max_sounds: usize,
}

impl PlaybackQueue {
    /// Create an empty queue with the given one-shot ceiling.
    pub fn new(max_sounds: usize) -> Self {
        Self {
            clips: Vec::new(),
            sound_count: 0,
            max_sounds,
        }
    }

    /// Append a one-shot clip at the tail.
    ///
    /// Enforces the one-shot ceiling: at capacity the clip is dropped and
    /// `false` is returned. This is not an error — it prevents mix
    /// overload under sound-effect spam.
    pub fn push_sound(&mut self, clip: Clip) -> bool {
        if self.sound_count >= self.max_sounds {
            debug!(
                "Sound dropped: one-shot ceiling reached ({})",
                self.max_sounds
            );
            return false;
        }

        self.sound_count += 1;
        self.clips.push(clip);
        true
    }

    /// Append a music clip at the tail, fading out whatever music is
    /// currently playing.
    ///
    /// Single pass over the queue: the active (non-fading) music clip is
    /// marked fading. If an older fade is still in flight, any active
    /// music found after it is a stale duplicate and is force-silenced so
    /// it is evicted on the next tick instead of fading audibly — only
    /// the single most-recently-superseded track should be heard fading.
    pub fn push_music(&mut self, clip: Clip) {
        let mut music_found = false;

        for existing in &mut self.clips {
            if !existing.is_music() {
                continue;
            }

            if !existing.is_fading() {
                if music_found {
                    // Transient inconsistency: more than one non-fading
                    // music clip. Should not arise under the queue lock.
                    existing.silence();
                }
                existing.begin_fade();
            } else {
                music_found = true;
            }
        }

        self.clips.push(clip);
    }

    /// Stop the currently playing music, if any.
    ///
    /// Marks the active non-fading music clip fading and zeroes its
    /// remaining data and volume so the mixer evicts it on the next tick
    /// instead of restarting it. Fading clips are already on their way
    /// out and are left alone.
    pub fn stop_music(&mut self) {
        for clip in &mut self.clips {
            if clip.is_music() && !clip.is_fading() {
                clip.begin_fade();
                clip.silence();
            }
        }
    }

    /// Destroy every queued clip.
    pub fn clear(&mut self) {
        self.clips.clear();
        self.sound_count = 0;
    }

    /// Number of queued clips.
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// true when no clips are queued.
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Currently queued one-shot count.
    pub fn sound_count(&self) -> usize {
        self.sound_count
    }

    /// Queued clips in insertion order.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Mutable access for the mixer walk.
    pub(crate) fn clips_mut(&mut self) -> &mut Vec<Clip> {
        &mut self.clips
    }

    /// Remove the clip at `index` during the mixer walk, keeping the
    /// one-shot counter consistent.
    pub(crate) fn evict(&mut self, index: usize) {
        let clip = self.clips.remove(index);
        if !clip.is_music() {
            debug_assert!(self.sound_count > 0);
            self.sound_count -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::types::AudioSpec;

    fn clip(looping: bool) -> Clip {
        let spec = AudioSpec {
            sample_rate: 48_000,
            channels: 2,
        };
        Clip::from_samples(vec![1; 8], spec, looping, 100)
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut queue = PlaybackQueue::new(25);
        let spec = AudioSpec {
            sample_rate: 48_000,
            channels: 2,
        };
        for volume in [10u8, 20, 30] {
            queue.push_sound(Clip::from_samples(vec![1; 4], spec, false, volume));
        }

        let volumes: Vec<u8> = queue.clips().iter().map(|c| c.volume()).collect();
        assert_eq!(volumes, [10, 20, 30]);
    }

    #[test]
    fn test_one_shot_ceiling() {
        let mut queue = PlaybackQueue::new(2);
        assert!(queue.push_sound(clip(false)));
        assert!(queue.push_sound(clip(false)));
        assert!(!queue.push_sound(clip(false)));

        assert_eq!(queue.sound_count(), 2);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_music_does_not_count_against_ceiling() {
        let mut queue = PlaybackQueue::new(1);
        assert!(queue.push_sound(clip(false)));
        queue.push_music(clip(true));

        assert_eq!(queue.sound_count(), 1);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_push_music_fades_active_track() {
        let mut queue = PlaybackQueue::new(25);
        queue.push_music(clip(true)); // A
        queue.push_music(clip(true)); // B supersedes A

        let clips = queue.clips();
        assert!(clips[0].is_fading(), "A should be fading");
        assert!(!clips[1].is_fading(), "B should be the active track");

        // Exactly one non-fading music clip
        let active = clips
            .iter()
            .filter(|c| c.is_music() && !c.is_fading())
            .count();
        assert_eq!(active, 1);
    }

    #[test]
    fn test_push_music_silences_stale_duplicate() {
        let mut queue = PlaybackQueue::new(25);
        queue.push_music(clip(true)); // A
        queue.push_music(clip(true)); // B: A now fading
        queue.push_music(clip(true)); // C: A's fade in flight, B is stale

        let clips = queue.clips();
        // A keeps fading audibly
        assert!(clips[0].is_fading());
        assert!(clips[0].remaining() > 0);

        // B was force-silenced, evicted next tick
        assert!(clips[1].is_fading());
        assert_eq!(clips[1].remaining(), 0);
        assert_eq!(clips[1].volume(), 0);

        // C is the single active track
        assert!(!clips[2].is_fading());
    }

    #[test]
    fn test_stop_music_silences_active_only() {
        let mut queue = PlaybackQueue::new(25);
        queue.push_music(clip(true)); // A
        queue.push_music(clip(true)); // B: A fading
        queue.stop_music();

        let clips = queue.clips();
        // A unaffected: already fading
        assert!(clips[0].remaining() > 0);
        // B stopped: fading so the mixer evicts it instead of restarting
        assert!(clips[1].is_fading());
        assert_eq!(clips[1].remaining(), 0);
        assert_eq!(clips[1].volume(), 0);
    }

    #[test]
    fn test_clear_resets_counter() {
        let mut queue = PlaybackQueue::new(25);
        queue.push_sound(clip(false));
        queue.push_music(clip(true));
        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.sound_count(), 0);
    }

    #[test]
    fn test_evict_decrements_one_shot_counter() {
        let mut queue = PlaybackQueue::new(25);
        queue.push_sound(clip(false));
        queue.push_music(clip(true));

        queue.evict(0);
        assert_eq!(queue.sound_count(), 0);

        queue.evict(0); // the music clip
        assert_eq!(queue.sound_count(), 0);
        assert!(queue.is_empty());
    }
}
