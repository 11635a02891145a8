#![allow(clippy::must_use_candidate)]

pub mod audio;
mod env;
pub mod health;
mod loader;
pub mod model;
pub mod server;
pub mod voices;

use serde::Deserialize;
use timbre_core::GenerationParams;

pub use audio::*;
pub use health::*;
pub use model::*;
pub use server::*;
pub use voices::*;

/// Top-level timbre configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Synthesis model and worker configuration
    #[serde(default)]
    pub model: ModelConfig,
    /// Voice reference library configuration
    #[serde(default)]
    pub voices: VoicesConfig,
    /// Audio encoding configuration
    #[serde(default)]
    pub audio: AudioConfig,
    /// Sampling parameters applied to every synthesis call
    #[serde(default)]
    pub generation: GenerationParams,
}
