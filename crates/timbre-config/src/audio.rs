use serde::Deserialize;

/// Audio encoding configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AudioConfig {
    /// ffmpeg executable used for MP3 transcoding
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { ffmpeg: default_ffmpeg() }
    }
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}
