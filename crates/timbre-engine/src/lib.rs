#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod device;
mod engine;
mod error;
mod manager;
mod process;
mod threads;
mod types;

pub use device::{Device, DeviceParseError};
pub use engine::{EngineLoader, VoiceCloneEngine};
pub use error::EngineError;
pub use manager::ModelManager;
pub use process::WorkerLoader;
pub use threads::worker_threads;
pub use types::{CloneJob, DesignJob, SynthesisOutput, VoiceClonePrompt};

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
