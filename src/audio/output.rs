//! Audio output using cpal
//!
//! Opens an output device with the engine's desired format, allowing the
//! device to negotiate different actual parameters (rate, channels, sample
//! format, buffer size), and drives a fill callback on the device's
//! real-time thread once per buffer period.
//!
//! The fill callback always works in interleaved i16 samples. For devices
//! that want f32, samples are converted in place from a pre-allocated
//! scratch buffer so the real-time path performs no allocation.

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use tracing::{debug, error, info, warn};

/// Audio output device wrapper.
///
/// Owns the cpal stream; dropping the output stops playback.
pub struct AudioOutput {
    device: Device,
    config: StreamConfig,
    sample_format: SampleFormat,
    stream: Option<Stream>,
}

impl AudioOutput {
    /// List available audio output device names.
    pub fn list_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();

        let devices: Vec<String> = host
            .output_devices()
            .map_err(|e| Error::AudioOutput(format!("failed to enumerate devices: {}", e)))?
            .filter_map(|device| device.name().ok())
            .collect();

        debug!("Found {} output devices", devices.len());
        Ok(devices)
    }

    /// Open an output device for the desired engine format.
    ///
    /// Prefers the configured device name, falling back to the system
    /// default when it is missing. The desired sample rate and channel
    /// count are requested but not required; the actual negotiated
    /// parameters are readable via [`AudioOutput::sample_rate`] and
    /// [`AudioOutput::channels`].
    pub fn open(engine_config: &EngineConfig) -> Result<Self> {
        let host = cpal::default_host();

        let device = if let Some(name) = engine_config.device.as_ref() {
            let mut devices = host
                .output_devices()
                .map_err(|e| Error::AudioOutput(format!("failed to enumerate devices: {}", e)))?;

            match devices.find(|d| d.name().ok().as_ref() == Some(name)) {
                Some(dev) => {
                    info!("Found requested audio device: {}", name);
                    dev
                }
                None => {
                    warn!(
                        "Requested device '{}' not found, falling back to default device",
                        name
                    );
                    host.default_output_device().ok_or_else(|| {
                        Error::AudioOutput(format!(
                            "device '{}' not found and no default device available",
                            name
                        ))
                    })?
                }
            }
        } else {
            host.default_output_device()
                .ok_or_else(|| Error::AudioOutput("no default output device found".to_string()))?
        };

        let (mut config, sample_format) = Self::negotiate_config(&device, engine_config)?;
        config.buffer_size = cpal::BufferSize::Fixed(engine_config.buffer_frames);

        debug!(
            "Audio config: sample_rate={}, channels={}, format={:?}, buffer_size={:?}",
            config.sample_rate.0, config.channels, sample_format, config.buffer_size
        );

        Ok(Self {
            device,
            config,
            sample_format,
            stream: None,
        })
    }

    /// Pick the closest supported configuration to the desired format.
    fn negotiate_config(
        device: &Device,
        engine_config: &EngineConfig,
    ) -> Result<(StreamConfig, SampleFormat)> {
        let desired_rate = engine_config.sample_rate;
        let desired_channels = engine_config.channels;

        let mut supported = device
            .supported_output_configs()
            .map_err(|e| Error::AudioOutput(format!("failed to get device configs: {}", e)))?;

        // Look for an exact match on channels and rate, in a format we mix to directly
        let preferred = supported.find(|cfg| {
            cfg.channels() == desired_channels
                && cfg.min_sample_rate().0 <= desired_rate
                && cfg.max_sample_rate().0 >= desired_rate
                && matches!(cfg.sample_format(), SampleFormat::I16 | SampleFormat::F32)
        });

        if let Some(supported_config) = preferred {
            let sample_format = supported_config.sample_format();
            let config = supported_config
                .with_sample_rate(cpal::SampleRate(desired_rate))
                .config();
            return Ok((config, sample_format));
        }

        // Allow any change: fall back to whatever the device offers by default
        let supported_config = device
            .default_output_config()
            .map_err(|e| Error::AudioOutput(format!("failed to get default config: {}", e)))?;

        warn!(
            "Desired format unavailable, using device default: {} Hz, {} ch, {:?}",
            supported_config.sample_rate().0,
            supported_config.channels(),
            supported_config.sample_format()
        );

        let sample_format = supported_config.sample_format();
        Ok((supported_config.config(), sample_format))
    }

    /// Start the output stream with a fill callback.
    ///
    /// `fill` is invoked on the device's real-time thread once per buffer
    /// period with the interleaved i16 buffer to populate. It must not
    /// block or allocate; underruns produce silence rather than errors.
    pub fn start<F>(&mut self, fill: F) -> Result<()>
    where
        F: FnMut(&mut [i16]) + Send + 'static,
    {
        info!("Starting audio stream");

        let stream = match self.sample_format {
            SampleFormat::I16 => self.build_stream_i16(fill)?,
            SampleFormat::F32 => self.build_stream_f32(fill)?,
            sample_format => {
                return Err(Error::AudioOutput(format!(
                    "unsupported sample format: {:?}",
                    sample_format
                )));
            }
        };

        stream
            .play()
            .map_err(|e| Error::AudioOutput(format!("failed to start stream: {}", e)))?;

        self.stream = Some(stream);

        info!("Audio stream started successfully");
        Ok(())
    }

    /// Build an output stream for native i16 devices
    fn build_stream_i16<F>(&self, mut fill: F) -> Result<Stream>
    where
        F: FnMut(&mut [i16]) + Send + 'static,
    {
        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    fill(data);
                },
                move |err| {
                    error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| Error::AudioOutput(format!("failed to build stream: {}", e)))?;

        Ok(stream)
    }

    /// Build an output stream for f32 devices, converting from the i16 mix
    fn build_stream_f32<F>(&self, mut fill: F) -> Result<Stream>
    where
        F: FnMut(&mut [i16]) + Send + 'static,
    {
        // Scratch sized generously up front; resize within capacity is free
        let initial = self.config.channels as usize
            * match self.config.buffer_size {
                cpal::BufferSize::Fixed(frames) => frames as usize * 4,
                cpal::BufferSize::Default => 4096 * 4,
            };
        let mut scratch: Vec<i16> = Vec::with_capacity(initial);

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    scratch.resize(data.len(), 0);
                    fill(&mut scratch[..data.len()]);
                    for (out, &s) in data.iter_mut().zip(scratch.iter()) {
                        *out = s as f32 / 32768.0;
                    }
                },
                move |err| {
                    error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| Error::AudioOutput(format!("failed to build stream: {}", e)))?;

        Ok(stream)
    }

    /// Suspend the device's playback of the stream.
    pub fn pause(&self) -> Result<()> {
        if let Some(stream) = &self.stream {
            stream
                .pause()
                .map_err(|e| Error::AudioOutput(format!("failed to pause stream: {}", e)))?;
        }
        Ok(())
    }

    /// Resume a suspended stream.
    pub fn resume(&self) -> Result<()> {
        if let Some(stream) = &self.stream {
            stream
                .play()
                .map_err(|e| Error::AudioOutput(format!("failed to resume stream: {}", e)))?;
        }
        Ok(())
    }

    /// Stop playback and release the stream.
    pub fn stop(&mut self) -> Result<()> {
        info!("Stopping audio stream");

        if let Some(stream) = self.stream.take() {
            stream
                .pause()
                .map_err(|e| Error::AudioOutput(format!("failed to pause stream: {}", e)))?;
            drop(stream);
        }

        Ok(())
    }

    /// Device name.
    pub fn device_name(&self) -> String {
        self.device.name().unwrap_or_else(|_| "Unknown".to_string())
    }

    /// Negotiated sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Negotiated channel count.
    pub fn channels(&self) -> u16 {
        self.config.channels
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
