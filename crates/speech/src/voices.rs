use std::path::{Path, PathBuf};

use crate::error::SpeechError;

/// Resolve a voice name to its reference pair in the voice library
///
/// Only the final path component of the requested name is honored, so a
/// name like `../../etc/shadow` degrades to `shadow` inside the library
/// and fails the existence check instead of escaping it. Both the `.wav`
/// recording and the `.txt` transcript must exist.
pub fn resolve_voice_reference(dir: &Path, voice: &str) -> crate::Result<(PathBuf, PathBuf)> {
    let safe_name = Path::new(voice)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let wav = dir.join(format!("{safe_name}.wav"));
    let txt = dir.join(format!("{safe_name}.txt"));

    if !wav.is_file() || !txt.is_file() {
        return Err(SpeechError::VoiceNotFound {
            voice: voice.to_string(),
            wav: format!("{safe_name}.wav"),
            txt: format!("{safe_name}.txt"),
        });
    }

    Ok((wav, txt))
}
