use std::path::PathBuf;

use serde::Deserialize;

/// Voice reference library configuration
///
/// A voice named `vc_male` is the pair `vc_male.wav` + `vc_male.txt`
/// under this directory.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoicesConfig {
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
}

impl Default for VoicesConfig {
    fn default() -> Self {
        Self { dir: default_dir() }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from("voices")
}
