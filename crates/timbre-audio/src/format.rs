/// Negotiated wire format for synthesized audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
}

impl AudioFormat {
    /// Pick the output format from an HTTP `Accept` header
    ///
    /// Clients that ask for `audio/wav` (or the older `audio/wave` alias)
    /// get WAV; everything else, including a missing header, gets MP3.
    /// Matching is case-insensitive.
    pub fn from_accept(accept: Option<&str>) -> Self {
        match accept.map(str::to_lowercase) {
            Some(value) if value.contains("audio/wav") || value.contains("audio/wave") => Self::Wav,
            _ => Self::Mp3,
        }
    }

    /// Content type sent back with the audio body
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
        }
    }
}
