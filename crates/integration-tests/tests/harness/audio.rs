//! Reference audio fixtures

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// A short valid mono PCM WAV
pub fn wav_bytes() -> Vec<u8> {
    let samples: Vec<f32> = (0..256).map(|i| (i as f32 * 0.1).sin() * 0.3).collect();
    timbre_audio::encode_wav(&samples, 16000).expect("fixture encodes")
}

/// The same WAV as a base64 request payload
pub fn wav_payload() -> String {
    STANDARD.encode(wav_bytes())
}

/// Drop a `{name}.wav` + `{name}.txt` reference pair into a voice library
pub fn write_voice_pair(dir: &Path, name: &str, transcript: &str) {
    let samples: Vec<f32> = (0..256).map(|i| (i as f32 * 0.1).sin() * 0.3).collect();
    timbre_audio::write_wav(&dir.join(format!("{name}.wav")), &samples, 16000).expect("fixture encodes");
    std::fs::write(dir.join(format!("{name}.txt")), transcript).expect("fixture writes");
}
