use std::process::Command;

use crate::AudioError;

/// Transcode an in-memory WAV payload to MP3 with ffmpeg
///
/// Blocking: spawns ffmpeg and waits for it. Callers on an async runtime
/// run this on the blocking pool.
pub fn wav_to_mp3(wav_bytes: &[u8], ffmpeg: &str, sample_rate: u32) -> crate::Result<Vec<u8>> {
    let wav_file = tempfile::Builder::new().suffix(".wav").tempfile()?;
    std::fs::write(wav_file.path(), wav_bytes)?;

    let mp3_file = tempfile::Builder::new().suffix(".mp3").tempfile()?;

    let output = Command::new(ffmpeg)
        .arg("-y")
        .arg("-hide_banner")
        .arg("-loglevel")
        .arg("error")
        .arg("-i")
        .arg(wav_file.path())
        .arg("-ac")
        .arg("1")
        .arg("-ar")
        .arg(sample_rate.to_string())
        .arg("-codec:a")
        .arg("libmp3lame")
        .arg(mp3_file.path())
        .output()
        .map_err(|e| AudioError::Transcode(format!("failed to run {ffmpeg}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AudioError::Transcode(format!("{ffmpeg} exited with {}: {stderr}", output.status)));
    }

    Ok(std::fs::read(mp3_file.path())?)
}
