use thiserror::Error;

use crate::Device;

/// Errors from model loading and synthesis
#[derive(Debug, Error)]
pub enum EngineError {
    /// The model could not be placed on the given device
    #[error("failed to load model on {device}: {reason}")]
    LoadFailed { device: Device, reason: String },

    /// Synthesis was requested before the model reached Ready
    #[error("model is not loaded yet")]
    NotReady,

    /// The engine accepted the call but could not produce audio
    #[error("synthesis failed: {0}")]
    Synthesis(String),

    /// The worker sent something the line protocol does not allow
    #[error("worker protocol error: {0}")]
    Protocol(String),

    /// The worker process died mid-conversation
    #[error("synthesis worker exited unexpectedly")]
    WorkerExited,

    /// Pipe or filesystem failure talking to the worker
    #[error("worker io failed: {0}")]
    Io(#[from] std::io::Error),

    /// Worker output could not be decoded as audio
    #[error(transparent)]
    Audio(#[from] timbre_audio::AudioError),
}
