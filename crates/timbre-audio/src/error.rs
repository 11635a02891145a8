use thiserror::Error;

/// Errors from audio decoding, encoding and transcoding
#[derive(Debug, Error)]
pub enum AudioError {
    /// Payload is not a parseable WAV container
    #[error("invalid audio payload: {0}")]
    InvalidWav(hound::Error),

    /// WAV encoding failed
    #[error("wav encoding failed: {0}")]
    Encode(hound::Error),

    /// Filesystem or pipe failure while moving audio around
    #[error("audio io failed: {0}")]
    Io(#[from] std::io::Error),

    /// ffmpeg could not be run or rejected the input
    #[error("mp3 transcode failed: {0}")]
    Transcode(String),

    /// Nothing to encode
    #[error("no audio samples to encode")]
    Empty,
}
