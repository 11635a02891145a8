use serde::{Deserialize, Serialize};

/// Voice-clone request carrying the reference recording inline
#[derive(Debug, Deserialize)]
pub struct CloneRequest {
    /// Base64-encoded WAV audio of the reference voice
    pub ref_audio_base64: String,
    /// Transcript of the reference recording
    pub ref_text: String,
    /// Text to synthesize
    pub syn_text: String,
    /// Synthesis language, `Auto` lets the model pick
    #[serde(default = "default_language")]
    pub syn_lang: String,
}

fn default_language() -> String {
    "Auto".to_string()
}

/// Voice-clone response
#[derive(Debug, Serialize, Deserialize)]
pub struct CloneResponse {
    /// Base64-encoded WAV audio
    pub audio_base64: String,
}

/// Speech request following the `OpenAI` TTS API format
///
/// The voice name selects a reference pair from the voice library by
/// filesystem convention.
#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    /// Model identifier, accepted and ignored
    pub model: String,
    /// Text to synthesize into speech
    pub input: String,
    /// Voice name (e.g. "vc_morgan")
    pub voice: String,
    /// Style instructions, accepted and ignored
    #[serde(default)]
    pub instructions: Option<String>,
}

/// Encoded audio ready to go on the wire
#[derive(Debug)]
pub struct EncodedAudio {
    /// Raw audio bytes
    pub bytes: Vec<u8>,
    /// Content type of the audio (e.g. "audio/mpeg")
    pub content_type: &'static str,
}

impl EncodedAudio {
    /// Convert the audio into an axum HTTP response
    pub fn into_response(self) -> axum::response::Response {
        axum::response::Response::builder()
            .header(http::header::CONTENT_TYPE, self.content_type)
            .body(axum::body::Body::from(self.bytes))
            .unwrap_or_else(|_| {
                axum::response::Response::builder()
                    .status(http::StatusCode::INTERNAL_SERVER_ERROR)
                    .body(axum::body::Body::empty())
                    .unwrap()
            })
    }
}
