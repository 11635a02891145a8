use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use timbre_audio::AudioFormat;
use timbre_config::Config;
use timbre_core::GenerationParams;
use timbre_engine::{CloneJob, EngineError, ModelManager, SynthesisOutput};

use crate::decode::{decode_audio_payload, encode_audio_payload, materialize_temp_audio};
use crate::error::SpeechError;
use crate::types::{CloneRequest, CloneResponse, EncodedAudio, SpeechRequest};
use crate::voices::resolve_voice_reference;

/// Drives validated requests through the shared model
///
/// Owns everything a request needs besides the model itself: the voice
/// library location, the sampling parameters, the synthesis time budget
/// and the transcoder. The model is shared through the manager.
pub struct SpeechService {
    manager: Arc<ModelManager>,
    voices_dir: PathBuf,
    params: GenerationParams,
    timeout: Duration,
    ffmpeg: String,
    body_limit: usize,
}

impl SpeechService {
    pub fn new(manager: Arc<ModelManager>, config: &Config) -> Self {
        Self {
            manager,
            voices_dir: config.voices.dir.clone(),
            params: config.generation.clone(),
            timeout: Duration::from_secs(config.server.synthesis_timeout_secs),
            ffmpeg: config.audio.ffmpeg.clone(),
            body_limit: config.server.body_limit_bytes,
        }
    }

    /// Maximum accepted JSON body size in bytes
    pub const fn body_limit(&self) -> usize {
        self.body_limit
    }

    /// Whether the model can take requests yet
    pub fn is_ready(&self) -> bool {
        self.manager.is_ready()
    }

    /// Clone the reference voice in the request and speak `syn_text`
    ///
    /// The decoded reference lives in a scoped temp file for exactly the
    /// duration of this call; RAII removes it on success, failure and
    /// timeout alike.
    pub async fn clone_voice(&self, request: CloneRequest) -> crate::Result<CloneResponse> {
        if !self.manager.is_ready() {
            return Err(SpeechError::NotReady);
        }
        if request.ref_text.trim().is_empty() {
            return Err(SpeechError::EmptyText("ref_text"));
        }
        if request.syn_text.trim().is_empty() {
            return Err(SpeechError::EmptyText("syn_text"));
        }

        let audio_bytes = decode_audio_payload(&request.ref_audio_base64)?;
        timbre_audio::probe_wav(&audio_bytes).map_err(|_| SpeechError::InvalidAudio)?;

        let temp_audio = materialize_temp_audio(&audio_bytes)?;
        let job = CloneJob {
            ref_audio: temp_audio.path().to_path_buf(),
            ref_text: request.ref_text,
            text: request.syn_text,
            language: request.syn_lang,
            params: self.params.clone(),
        };

        let output = self.bounded(self.manager.synthesize(job)).await?;
        let wav = encode_primary(&output)?;

        Ok(CloneResponse {
            audio_base64: encode_audio_payload(&wav),
        })
    }

    /// Speak `input` with a library voice, in the negotiated format
    pub async fn speak(&self, request: SpeechRequest, format: AudioFormat) -> crate::Result<EncodedAudio> {
        if !self.manager.is_ready() {
            return Err(SpeechError::NotReady);
        }
        if request.input.trim().is_empty() {
            return Err(SpeechError::EmptyText("Input text"));
        }

        let (ref_audio, ref_text_path) = resolve_voice_reference(&self.voices_dir, &request.voice)?;
        let ref_text = std::fs::read_to_string(&ref_text_path)
            .map_err(|e| SpeechError::Internal(format!("failed to read reference transcript: {e}")))?
            .trim()
            .to_string();

        let job = CloneJob {
            ref_audio,
            ref_text,
            text: request.input,
            language: "Auto".to_string(),
            params: self.params.clone(),
        };
        let output = self.bounded(self.manager.synthesize(job)).await?;
        let wav = encode_primary(&output)?;

        match format {
            AudioFormat::Wav => Ok(EncodedAudio {
                bytes: wav,
                content_type: format.content_type(),
            }),
            AudioFormat::Mp3 => {
                let ffmpeg = self.ffmpeg.clone();
                let sample_rate = output.sample_rate;
                let mp3 = tokio::task::spawn_blocking(move || timbre_audio::wav_to_mp3(&wav, &ffmpeg, sample_rate))
                    .await
                    .map_err(|e| SpeechError::Internal(format!("transcode task panicked: {e}")))?
                    .map_err(|e| SpeechError::Internal(e.to_string()))?;
                Ok(EncodedAudio {
                    bytes: mp3,
                    content_type: format.content_type(),
                })
            }
        }
    }

    /// Bound an engine call by the synthesis budget
    ///
    /// On timeout the in-flight call is not interrupted; it finishes on
    /// the blocking pool under the synthesis gate and its result is
    /// discarded.
    async fn bounded<T>(&self, call: impl Future<Output = Result<T, EngineError>>) -> crate::Result<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(SpeechError::Timeout(self.timeout.as_secs())),
        }
    }
}

fn encode_primary(output: &SynthesisOutput) -> crate::Result<Vec<u8>> {
    let primary = output
        .primary()
        .ok_or_else(|| SpeechError::Internal("engine returned no waveforms".to_string()))?;
    timbre_audio::encode_wav(primary, output.sample_rate).map_err(|e| SpeechError::Internal(e.to_string()))
}
