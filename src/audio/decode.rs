//! Audio file decoding using symphonia
//!
//! Decodes a WAV/PCM file into interleaved stereo 16-bit samples. Mono
//! files are duplicated to stereo; anything with more than two channels is
//! rejected. No resampling is performed here — a clip decoded at a rate
//! other than the device rate plays at the wrong pitch, and the caller is
//! expected to log the mismatch.

use crate::audio::types::AudioSpec;
use crate::error::{Error, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Fully decoded PCM audio
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Format the samples were produced at (channels is always 2)
    pub spec: AudioSpec,

    /// Interleaved stereo samples [L, R, L, R, ...]
    pub samples: Vec<i16>,
}

/// Decode an audio file into interleaved stereo i16 PCM.
///
/// # Errors
/// - `Error::Decode` if the file cannot be opened, probed, or decoded,
///   or if it has an unsupported channel layout.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<DecodedAudio> {
    let path = path.as_ref();

    let file = File::open(path)
        .map_err(|e| Error::Decode(format!("failed to open {}: {}", path.display(), e)))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::Decode(format!("unsupported format {}: {}", path.display(), e)))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| Error::Decode(format!("no audio track in {}", path.display())))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let sample_rate = codec_params.sample_rate.unwrap_or(48_000);

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| Error::Decode(format!("unsupported codec {}: {}", path.display(), e)))?;

    let mut samples: Vec<i16> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<i16>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break; // EOF
            }
            Err(e) => {
                return Err(Error::Decode(format!(
                    "read error in {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Recoverable per-packet corruption: skip and keep going
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => {
                return Err(Error::Decode(format!(
                    "decode error in {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count();

        if sample_buf.is_none() {
            sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
        }

        let buf = sample_buf.as_mut().unwrap();
        buf.copy_interleaved_ref(decoded);

        match channels {
            1 => {
                // Mono: duplicate each sample to both channels
                samples.reserve(buf.len() * 2);
                for &s in buf.samples() {
                    samples.push(s);
                    samples.push(s);
                }
            }
            2 => samples.extend_from_slice(buf.samples()),
            n => {
                return Err(Error::Decode(format!(
                    "unsupported channel count {} in {}",
                    n,
                    path.display()
                )));
            }
        }
    }

    if samples.is_empty() {
        return Err(Error::Decode(format!(
            "no audio data in {}",
            path.display()
        )));
    }

    Ok(DecodedAudio {
        spec: AudioSpec {
            sample_rate,
            channels: 2,
        },
        samples,
    })
}
