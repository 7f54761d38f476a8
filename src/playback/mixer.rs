//! The mixer tick: one buffer period of output
//!
//! Runs on the device's real-time thread once per buffer period, with the
//! queue mutex held by the calling stream callback. Walks the queue in
//! insertion order, mixes every active clip into the output buffer,
//! advances cursors, restarts exhausted music, and reclaims finished
//! clips. Performs no allocation and never blocks beyond the queue lock
//! the caller already holds.

use crate::audio::samples::mix_into;
use crate::playback::clip::ClipPhase;
use crate::playback::queue::PlaybackQueue;

/// Mix one buffer period of audio from the queue into `out`.
///
/// `out` is the device's interleaved i16 output buffer; it is zero-filled
/// first so an empty queue produces silence. `fade_step` is the volume
/// decrement applied to a fading music clip per tick.
///
/// While a superseded music clip is still audibly fading, the replacement
/// music clip is mixed at zero length — music never overlaps itself. The
/// replacement starts playing on the first tick after the fade finishes.
pub fn mix_tick(queue: &mut PlaybackQueue, out: &mut [i16], fade_step: u8) {
    out.fill(0);

    let mut music_active = false;
    let mut index = 0;

    while index < queue.len() {
        let phase = queue.clips()[index].phase();

        match phase {
            ClipPhase::Playing | ClipPhase::Fading => {
                let clip = &mut queue.clips_mut()[index];

                if phase == ClipPhase::Fading {
                    music_active = true;

                    if clip.volume() > 0 {
                        clip.decay(fade_step);
                    } else {
                        // Fade finished: nothing left to hear, evict next pass
                        clip.silence();
                    }
                }

                // A newly queued music clip stays muted while the old one
                // is still audibly fading out
                let gated = music_active && clip.is_music() && !clip.is_fading();
                let mix_len = if gated {
                    0
                } else {
                    out.len().min(clip.remaining())
                };

                mix_into(&mut out[..mix_len], clip.window(mix_len), clip.volume());
                clip.advance(mix_len);

                index += 1;
            }

            ClipPhase::Restarting => {
                // Music reached its end: reset the cursor. The clip stays
                // in place and is mixed again starting next tick.
                queue.clips_mut()[index].restart();
                index += 1;
            }

            ClipPhase::Exhausted => {
                // Finished one-shot or faded-out music: unlink and destroy
                queue.evict(index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::types::{AudioSpec, MAX_VOLUME};
    use crate::playback::clip::Clip;

    const FADE_STEP: u8 = 1;

    fn spec() -> AudioSpec {
        AudioSpec {
            sample_rate: 48_000,
            channels: 2,
        }
    }

    fn sound(samples: Vec<i16>, volume: u8) -> Clip {
        Clip::from_samples(samples, spec(), false, volume)
    }

    fn music(samples: Vec<i16>, volume: u8) -> Clip {
        Clip::from_samples(samples, spec(), true, volume)
    }

    #[test]
    fn test_empty_queue_outputs_silence() {
        let mut queue = PlaybackQueue::new(25);
        let mut out = [7i16; 8];
        mix_tick(&mut queue, &mut out, FADE_STEP);
        assert_eq!(out, [0; 8]);
    }

    #[test]
    fn test_partial_buffer_mix_advances_cursor() {
        // Queue empty -> one sound -> one tick shorter than the clip:
        // output holds the first `len` samples at volume, clip stays
        // queued with the remainder.
        let mut queue = PlaybackQueue::new(25);
        queue.push_sound(sound(vec![1000, 2000, 3000, 4000, 5000, 6000], 64));

        let mut out = [0i16; 4];
        mix_tick(&mut queue, &mut out, FADE_STEP);

        // Mixed at volume 64/128 = half
        assert_eq!(out, [500, 1000, 1500, 2000]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.clips()[0].remaining(), 2);
    }

    #[test]
    fn test_overlapping_sounds_mix_additively() {
        let mut queue = PlaybackQueue::new(25);
        queue.push_sound(sound(vec![100, 100], MAX_VOLUME));
        queue.push_sound(sound(vec![25, -25], MAX_VOLUME));

        let mut out = [0i16; 2];
        mix_tick(&mut queue, &mut out, FADE_STEP);
        assert_eq!(out, [125, 75]);
    }

    #[test]
    fn test_one_shot_evicted_same_tick_as_exhaustion() {
        let mut queue = PlaybackQueue::new(25);
        queue.push_sound(sound(vec![10, 10], MAX_VOLUME));
        assert_eq!(queue.sound_count(), 1);

        // Tick consumes the whole clip; remaining hits 0
        let mut out = [0i16; 4];
        mix_tick(&mut queue, &mut out, FADE_STEP);
        assert_eq!(out[..2], [10, 10]);
        assert_eq!(queue.clips()[0].remaining(), 0);

        // Next tick unlinks and destroys it, decrementing the counter
        mix_tick(&mut queue, &mut out, FADE_STEP);
        assert!(queue.is_empty());
        assert_eq!(queue.sound_count(), 0);
    }

    #[test]
    fn test_music_restarts_on_exhaustion() {
        let mut queue = PlaybackQueue::new(25);
        queue.push_music(music(vec![10, 20], MAX_VOLUME));

        let mut out = [0i16; 2];
        mix_tick(&mut queue, &mut out, FADE_STEP);
        assert_eq!(out, [10, 20]);
        assert_eq!(queue.clips()[0].remaining(), 0);

        // Restart pass: cursor resets, nothing mixed this tick
        mix_tick(&mut queue, &mut out, FADE_STEP);
        assert_eq!(out, [0, 0]);
        assert_eq!(queue.clips()[0].remaining(), 2);

        // And it plays again from the top
        mix_tick(&mut queue, &mut out, FADE_STEP);
        assert_eq!(out, [10, 20]);
    }

    #[test]
    fn test_crossfade_decays_old_and_gates_new() {
        // playMusic(A) then playMusic(B): A fades, B is muted while A is
        // still audible.
        let mut queue = PlaybackQueue::new(25);
        queue.push_music(music(vec![1000; 64], 100)); // A
        queue.push_music(music(vec![500; 64], 100)); // B

        let mut out = [0i16; 4];
        mix_tick(&mut queue, &mut out, FADE_STEP);

        // A decayed to 99 before mixing: 1000 * 99 / 128 = 773
        assert_eq!(queue.clips()[0].volume(), 99);
        assert_eq!(out, [773; 4]);

        // B contributed nothing and did not advance
        assert_eq!(queue.clips()[1].cursor(), 0);

        mix_tick(&mut queue, &mut out, FADE_STEP);
        assert_eq!(queue.clips()[0].volume(), 98);
        assert_eq!(queue.clips()[1].cursor(), 0);
    }

    #[test]
    fn test_faded_to_silence_music_is_evicted_then_new_music_plays() {
        let mut queue = PlaybackQueue::new(25);
        queue.push_music(music(vec![1000; 4096], 2)); // A, nearly silent already
        queue.push_music(music(vec![500; 64], 100)); // B

        let mut out = [0i16; 4];

        // Tick 1: A decays 2 -> 1, still audible; B gated
        mix_tick(&mut queue, &mut out, FADE_STEP);
        assert_eq!(queue.clips()[0].volume(), 1);

        // Tick 2: A decays 1 -> 0, mixes at zero gain; B gated
        mix_tick(&mut queue, &mut out, FADE_STEP);
        assert_eq!(queue.clips()[0].volume(), 0);
        assert_eq!(out, [0; 4]);

        // Tick 3: A's volume already 0 -> forced exhaustion; B still gated
        // because A's fade state was observed this tick
        mix_tick(&mut queue, &mut out, FADE_STEP);
        assert_eq!(queue.clips()[0].remaining(), 0);

        // Tick 4: A evicted, B finally mixes
        mix_tick(&mut queue, &mut out, FADE_STEP);
        assert_eq!(queue.len(), 1);
        assert!(!queue.clips()[0].is_fading());
        assert_eq!(out, [390; 4]); // 500 * 100 / 128
    }

    #[test]
    fn test_cursor_monotone_until_loop_reset() {
        let mut queue = PlaybackQueue::new(25);
        queue.push_music(music(vec![1; 6], MAX_VOLUME));

        let mut out = [0i16; 4];
        let mut last_remaining = queue.clips()[0].remaining();

        for _ in 0..2 {
            mix_tick(&mut queue, &mut out, FADE_STEP);
            let remaining = queue.clips()[0].remaining();
            assert!(remaining <= last_remaining);
            last_remaining = remaining;
        }
        assert_eq!(last_remaining, 0);

        // Reset only happens via the loop-restart pass
        mix_tick(&mut queue, &mut out, FADE_STEP);
        assert_eq!(queue.clips()[0].remaining(), 6);
    }

    #[test]
    fn test_stopped_music_evicted_next_tick() {
        let mut queue = PlaybackQueue::new(25);
        queue.push_music(music(vec![1000; 64], 100));
        queue.stop_music();

        let mut out = [0i16; 4];
        mix_tick(&mut queue, &mut out, FADE_STEP);
        assert!(queue.is_empty());
        assert_eq!(out, [0; 4]);
    }
}
