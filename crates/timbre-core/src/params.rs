use serde::{Deserialize, Serialize};

/// Sampling parameters handed to the synthesis engine unchanged
///
/// The engine treats these as opaque knobs; defaults match the tuning the
/// pretrained checkpoint ships with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationParams {
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
    #[serde(default = "default_do_sample")]
    pub do_sample: bool,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_repetition_penalty")]
    pub repetition_penalty: f64,
    /// Parallel parameter set for the sub-talker decoding stage
    #[serde(default)]
    pub subtalker: SubtalkerParams,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: default_max_new_tokens(),
            do_sample: default_do_sample(),
            top_k: default_top_k(),
            top_p: default_top_p(),
            temperature: default_temperature(),
            repetition_penalty: default_repetition_penalty(),
            subtalker: SubtalkerParams::default(),
        }
    }
}

/// Sub-talker decoding parameters, forwarded alongside the main set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubtalkerParams {
    #[serde(default = "default_do_sample")]
    pub do_sample: bool,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

impl Default for SubtalkerParams {
    fn default() -> Self {
        Self {
            do_sample: default_do_sample(),
            top_k: default_top_k(),
            top_p: default_top_p(),
            temperature: default_temperature(),
        }
    }
}

const fn default_max_new_tokens() -> u32 {
    2048
}

const fn default_do_sample() -> bool {
    true
}

const fn default_top_k() -> u32 {
    50
}

const fn default_top_p() -> f64 {
    1.0
}

const fn default_temperature() -> f64 {
    0.9
}

const fn default_repetition_penalty() -> f64 {
    1.05
}
