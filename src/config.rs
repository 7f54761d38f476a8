//! Engine configuration
//!
//! All values have defaults matching the fixed target format the engine
//! requests from the audio device: 48 kHz, stereo, 16-bit signed samples,
//! 4096-frame buffer periods. The device is allowed to negotiate different
//! actual parameters; see [`crate::audio::output`].

use crate::audio::types::AudioSpec;
use serde::Deserialize;

/// Audio engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Output device name (None = system default)
    pub device: Option<String>,

    /// Desired sample rate in Hz
    pub sample_rate: u32,

    /// Desired channel count (2 = stereo)
    pub channels: u16,

    /// Desired buffer period size in frames
    pub buffer_frames: u32,

    /// Ceiling on simultaneously queued one-shot sounds.
    /// Requests beyond this are silently dropped to prevent mix overload.
    pub max_sounds: usize,

    /// Volume units subtracted from a fading music clip per mixer tick
    pub fade_step: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: 48_000,
            channels: 2,
            buffer_frames: 4096,
            max_sounds: 25,
            fade_step: 1,
        }
    }
}

impl EngineConfig {
    /// The format the engine asks the device for
    pub fn spec(&self) -> AudioSpec {
        AudioSpec {
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.sample_rate, 48_000);
        assert_eq!(config.channels, 2);
        assert_eq!(config.buffer_frames, 4096);
        assert_eq!(config.max_sounds, 25);
        assert_eq!(config.fade_step, 1);
        assert!(config.device.is_none());
    }

    #[test]
    fn test_config_from_toml() {
        let config: EngineConfig = toml::from_str(
            r#"
            sample_rate = 44100
            max_sounds = 8
            "#,
        )
        .unwrap();

        // Overridden fields
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.max_sounds, 8);

        // Defaulted fields
        assert_eq!(config.channels, 2);
        assert_eq!(config.fade_step, 1);
    }
}
