use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tempfile::NamedTempFile;

use crate::error::SpeechError;

/// Decode the reference audio payload with strict base64
///
/// Strict means invalid characters, truncated groups and bad padding are
/// all rejected rather than decoded on a best-effort basis.
pub fn decode_audio_payload(payload: &str) -> crate::Result<Vec<u8>> {
    STANDARD.decode(payload).map_err(|_| SpeechError::InvalidBase64)
}

/// Encode synthesized audio for the JSON response
pub fn encode_audio_payload(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Write decoded reference audio to a scoped temp file
///
/// The file is deleted when the returned handle drops, so cleanup holds
/// on every exit path, including engine failures and timeouts.
pub fn materialize_temp_audio(bytes: &[u8]) -> crate::Result<NamedTempFile> {
    let file = tempfile::Builder::new()
        .suffix(".wav")
        .tempfile()
        .map_err(|e| SpeechError::Internal(format!("failed to create temp audio file: {e}")))?;
    std::fs::write(file.path(), bytes)
        .map_err(|e| SpeechError::Internal(format!("failed to write temp audio file: {e}")))?;
    Ok(file)
}
