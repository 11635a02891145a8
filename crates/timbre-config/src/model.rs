use serde::Deserialize;

/// Synthesis worker configuration
///
/// The worker is a separate process that hosts the pretrained checkpoint
/// and answers synthesis calls over a line protocol on its stdio. The
/// runner command is configuration so deployments can point at whatever
/// launcher wraps their inference runtime.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Worker command line; the first element is the executable
    #[serde(default = "default_runner")]
    pub runner: Vec<String>,
    /// Checkpoint directory or hub identifier handed to the worker
    #[serde(default = "default_model_dir")]
    pub model_dir: String,
    /// Preferred device, e.g. "cuda", "cuda:1" or "cpu"
    #[serde(default = "default_device")]
    pub device: String,
    /// Seconds to wait for the worker's ready handshake after spawn
    #[serde(default = "default_load_timeout_secs")]
    pub load_timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            runner: default_runner(),
            model_dir: default_model_dir(),
            device: default_device(),
            load_timeout_secs: default_load_timeout_secs(),
        }
    }
}

fn default_runner() -> Vec<String> {
    vec!["timbre-worker".to_string()]
}

fn default_model_dir() -> String {
    "Qwen/Qwen3-TTS-12Hz-1.7B-Base".to_string()
}

fn default_device() -> String {
    "cuda".to_string()
}

const fn default_load_timeout_secs() -> u64 {
    600
}
