use std::path::PathBuf;

use timbre_core::GenerationParams;

/// One voice-clone synthesis call
///
/// `ref_audio` is a filesystem path because the worker reads the reference
/// itself; upstream layers own decoding and temp-file lifetime.
#[derive(Debug, Clone)]
pub struct CloneJob {
    /// Reference recording of the voice to clone
    pub ref_audio: PathBuf,
    /// Transcript of the reference recording
    pub ref_text: String,
    /// Text to synthesize in the cloned voice
    pub text: String,
    /// Language tag, `Auto` lets the model pick
    pub language: String,
    /// Sampling parameters, forwarded unchanged
    pub params: GenerationParams,
}

/// One voice-design synthesis call
///
/// Instead of cloning a reference voice, the model invents one from a
/// natural-language description.
#[derive(Debug, Clone)]
pub struct DesignJob {
    pub text: String,
    /// Description of the voice to invent
    pub instruct: String,
    pub language: String,
    pub params: GenerationParams,
}

/// Waveforms produced by one synthesis call
///
/// Every waveform is mono and shares `sample_rate`. Single-shot callers
/// use the first waveform; batch callers write all of them.
#[derive(Debug, Clone)]
pub struct SynthesisOutput {
    pub waveforms: Vec<Vec<f32>>,
    pub sample_rate: u32,
}

impl SynthesisOutput {
    /// The first waveform, if the engine produced any
    pub fn primary(&self) -> Option<&[f32]> {
        self.waveforms.first().map(Vec::as_slice)
    }
}

/// Opaque handle to a reference voice the engine has already analyzed
///
/// Deriving the prompt is the expensive part of cloning; batch drivers
/// derive once and synthesize many lines against the same prompt. The
/// handle stays valid until the engine that issued it is dropped.
#[derive(Debug, Clone)]
pub struct VoiceClonePrompt {
    id: String,
    x_vector_only: bool,
}

impl VoiceClonePrompt {
    pub fn new(id: impl Into<String>, x_vector_only: bool) -> Self {
        Self { id: id.into(), x_vector_only }
    }

    /// Engine-assigned identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the prompt carries only the speaker embedding, without
    /// in-context audio tokens
    pub const fn x_vector_only(&self) -> bool {
        self.x_vector_only
    }
}
