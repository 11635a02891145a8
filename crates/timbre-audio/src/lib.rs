#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod format;
mod mp3;
mod wav;

pub use error::AudioError;
pub use format::AudioFormat;
pub use mp3::wav_to_mp3;
pub use wav::{WavInfo, encode_wav, probe_wav, read_wav, write_wav};

/// Result alias for audio operations
pub type Result<T> = std::result::Result<T, AudioError>;
