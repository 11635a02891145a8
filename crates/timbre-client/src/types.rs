use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Voice-clone request body for `POST /clone`
#[derive(Debug, Clone, Serialize)]
pub struct CloneRequest {
    /// Base64-encoded WAV audio of the reference voice
    pub ref_audio_base64: String,
    /// Transcript of the reference recording
    pub ref_text: String,
    /// Text to synthesize
    pub syn_text: String,
    /// Synthesis language, `Auto` lets the model pick
    pub syn_lang: String,
}

/// Voice-clone response body
#[derive(Debug, Deserialize)]
pub struct CloneResponse {
    /// Base64-encoded WAV audio
    pub audio_base64: String,
}

impl CloneResponse {
    /// Decode the synthesized audio into raw WAV bytes
    ///
    /// # Errors
    ///
    /// Returns `Parse` if the server sent something that is not base64
    pub fn decode_audio(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.audio_base64)
            .map_err(|e| ClientError::Parse(format!("invalid base64 in response: {e}")))
    }
}
