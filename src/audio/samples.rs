//! Sample mixing primitive
//!
//! Additive, saturating, volume-scaled combination of 16-bit PCM buffers.
//! This is the single arithmetic leaf the mixer tick is built on; it is
//! branch-free per sample and never allocates.

use crate::audio::types::MAX_VOLUME;

/// Mix `src` into `dst` at the given volume.
///
/// Each source sample is scaled by `volume / MAX_VOLUME` and added to the
/// destination with saturation at the i16 range. `volume` values above
/// [`MAX_VOLUME`] are treated as [`MAX_VOLUME`]. Only `dst.len().min(src.len())`
/// samples are touched.
pub fn mix_into(dst: &mut [i16], src: &[i16], volume: u8) {
    let volume = volume.min(MAX_VOLUME) as i32;

    for (d, &s) in dst.iter_mut().zip(src.iter()) {
        let scaled = s as i32 * volume / MAX_VOLUME as i32;
        let sum = *d as i32 + scaled;
        *d = sum.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_full_volume_adds() {
        let mut dst = [100i16, -200, 0, 50];
        let src = [10i16, 20, -30, 0];
        mix_into(&mut dst, &src, MAX_VOLUME);
        assert_eq!(dst, [110, -180, -30, 50]);
    }

    #[test]
    fn test_mix_half_volume_scales() {
        let mut dst = [0i16; 4];
        let src = [100i16, -100, 1000, -1000];
        mix_into(&mut dst, &src, MAX_VOLUME / 2);
        assert_eq!(dst, [50, -50, 500, -500]);
    }

    #[test]
    fn test_mix_zero_volume_is_noop() {
        let mut dst = [1i16, 2, 3];
        let src = [1000i16, 1000, 1000];
        mix_into(&mut dst, &src, 0);
        assert_eq!(dst, [1, 2, 3]);
    }

    #[test]
    fn test_mix_saturates() {
        let mut dst = [i16::MAX, i16::MIN];
        let src = [1000i16, -1000];
        mix_into(&mut dst, &src, MAX_VOLUME);
        assert_eq!(dst, [i16::MAX, i16::MIN]);
    }

    #[test]
    fn test_mix_respects_shorter_source() {
        let mut dst = [0i16; 4];
        let src = [5i16, 5];
        mix_into(&mut dst, &src, MAX_VOLUME);
        assert_eq!(dst, [5, 5, 0, 0]);
    }

    #[test]
    fn test_volume_above_max_is_clamped() {
        let mut dst = [0i16; 2];
        let src = [100i16, -100];
        mix_into(&mut dst, &src, 255);
        assert_eq!(dst, [100, -100]);
    }
}
