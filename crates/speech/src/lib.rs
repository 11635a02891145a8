#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod decode;
mod error;
mod request;
mod service;
mod types;
mod voices;

use std::sync::Arc;
use std::time::Instant;

use axum::response::IntoResponse;
use axum::{Router, extract::State, routing::post};
use timbre_audio::AudioFormat;

pub use decode::{decode_audio_payload, encode_audio_payload};
pub use error::{Result, SpeechError};
pub use request::RequestContext;
pub use service::SpeechService;
pub use types::{CloneRequest, CloneResponse, EncodedAudio, SpeechRequest};
use request::ExtractPayload;

/// Create the endpoint router for synthesis
pub fn endpoint_router() -> Router<Arc<SpeechService>> {
    Router::new()
        .route("/clone", post(clone_voice))
        .route("/v1/audio/speech", post(synthesize))
}

/// Handle voice-clone requests
async fn clone_voice(
    State(service): State<Arc<SpeechService>>,
    ExtractPayload(context, request): ExtractPayload<CloneRequest>,
) -> Result<axum::response::Response> {
    tracing::debug!(
        "[{}] voice clone requested: ref_text={:?} syn_text={:?} lang={}",
        context.client_label(),
        request.ref_text,
        request.syn_text,
        request.syn_lang
    );

    let started = Instant::now();
    let response = service.clone_voice(request).await?;

    tracing::debug!(
        "[{}] voice clone complete in {:.2}s",
        context.client_label(),
        started.elapsed().as_secs_f64()
    );

    Ok(axum::Json(response).into_response())
}

/// Handle speech requests against the voice library, in the `OpenAI`
/// TTS API shape
async fn synthesize(
    State(service): State<Arc<SpeechService>>,
    ExtractPayload(context, request): ExtractPayload<SpeechRequest>,
) -> Result<axum::response::Response> {
    let format = AudioFormat::from_accept(context.accept());
    tracing::debug!(
        "[{}] speech requested: model={} voice={} format={} input={:?}",
        context.client_label(),
        request.model,
        request.voice,
        format.content_type(),
        request.input
    );

    let started = Instant::now();
    let audio = service.speak(request, format).await?;

    tracing::debug!(
        "[{}] speech synthesis complete in {:.2}s",
        context.client_label(),
        started.elapsed().as_secs_f64()
    );

    Ok(audio.into_response())
}
