//! Device-facing audio concerns: decoding, the mix primitive, and output

pub mod decode;
pub mod output;
pub mod samples;
pub mod types;

pub use decode::{decode_file, DecodedAudio};
pub use output::AudioOutput;
pub use types::{AudioSpec, MAX_VOLUME};
