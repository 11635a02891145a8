use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use timbre_engine::EngineError;

/// Result alias for speech operations
pub type Result<T> = std::result::Result<T, SpeechError>;

/// Errors surfaced to API consumers
///
/// Every validation and synthesis failure maps to 400; 503 is reserved
/// for the window before the model is Ready. The display string is the
/// wire-visible `detail` message.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The model has not reached Ready yet
    #[error("Model is not loaded yet.")]
    NotReady,

    /// Reference audio payload is not strict base64
    #[error("Invalid base64 audio data.")]
    InvalidBase64,

    /// Reference audio decoded fine but is not a WAV container
    #[error("Reference audio is not valid WAV data.")]
    InvalidAudio,

    /// A required text field is blank after trimming
    #[error("{0} must not be empty.")]
    EmptyText(&'static str),

    /// The voice library has no reference pair under that name
    #[error("Reference files not found for model '{voice}': {wav}, {txt}")]
    VoiceNotFound { voice: String, wav: String, txt: String },

    /// The engine accepted the request but could not produce audio
    #[error("{0}")]
    Synthesis(String),

    /// The request exceeded the synthesis time budget
    #[error("Synthesis timed out after {0} seconds.")]
    Timeout(u64),

    /// Local fault on our side of the engine
    #[error("Internal server error")]
    Internal(String),
}

impl SpeechError {
    /// HTTP status code for this error
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            Self::InvalidBase64
            | Self::InvalidAudio
            | Self::EmptyText(_)
            | Self::VoiceNotFound { .. }
            | Self::Synthesis(_)
            | Self::Timeout(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<EngineError> for SpeechError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotReady => Self::NotReady,
            err @ EngineError::LoadFailed { .. } => Self::Internal(err.to_string()),
            err => Self::Synthesis(err.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct Detail {
    detail: String,
}

/// Build the `{ "detail": ... }` error body used across the API
pub(crate) fn detail_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(Detail { detail: message.into() })).into_response()
}

impl IntoResponse for SpeechError {
    fn into_response(self) -> Response {
        if let Self::Internal(reason) = &self {
            tracing::error!("internal error: {reason}");
        }
        detail_response(self.status_code(), self.to_string())
    }
}
